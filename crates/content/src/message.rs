use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainResult, Entity, MessageId, UserId, validate};

/// A message left through the portfolio's contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    pub sender_name: String,
    pub subject: String,
    pub message: String,
    /// Portfolio owner the message was addressed to, when one was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Message {
    type Id = MessageId;
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMessage {
    pub sender_name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender_name: String,
    pub subject: String,
    pub message: String,
}

const MIN_CHARS: usize = 2;

impl NewMessage {
    pub fn validate(self) -> DomainResult<MessageDraft> {
        const INCOMPLETE: &str = "Please Fill Full Form!";
        let sender_name = validate::required(self.sender_name.as_deref(), INCOMPLETE)?;
        let subject = validate::required(self.subject.as_deref(), INCOMPLETE)?;
        let message = validate::required(self.message.as_deref(), INCOMPLETE)?;

        validate::min_chars(&sender_name, MIN_CHARS, "Name Must Contain At Least 2 Characters!")?;
        validate::min_chars(&subject, MIN_CHARS, "Subject Must Contain At Least 2 Characters!")?;
        validate::min_chars(&message, MIN_CHARS, "Message Must Contain At Least 2 Characters!")?;

        Ok(MessageDraft {
            sender_name,
            subject,
            message,
        })
    }
}

impl Message {
    pub fn create(draft: MessageDraft, recipient: Option<UserId>, now: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            sender_name: draft.sender_name,
            subject: draft.subject,
            message: draft.message,
            recipient,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::DomainError;

    fn input(name: &str, subject: &str, body: &str) -> NewMessage {
        NewMessage {
            sender_name: Some(name.to_string()),
            subject: Some(subject.to_string()),
            message: Some(body.to_string()),
        }
    }

    #[test]
    fn valid_message_is_addressed_to_recipient() {
        let owner = UserId::new();
        let draft = input("Ada", "Hello", "Nice portfolio").validate().unwrap();
        let msg = Message::create(draft, Some(owner), Utc::now());
        assert_eq!(msg.sender_name, "Ada");
        assert_eq!(msg.recipient, Some(owner));
    }

    #[test]
    fn missing_field_reports_incomplete_form() {
        let err = NewMessage {
            subject: None,
            ..input("Ada", "Hello", "Hi")
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, DomainError::validation("Please Fill Full Form!"));
    }

    #[test]
    fn one_character_name_is_rejected() {
        let err = input("A", "Hello", "Hi there").validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Name Must Contain At Least 2 Characters!")
        );
    }

    #[test]
    fn recipient_is_omitted_when_absent() {
        let msg = Message::create(input("Ada", "Hi", "Yo").validate().unwrap(), None, Utc::now());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("recipient").is_none());
        assert_eq!(json["senderName"], "Ada");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any form with every field of two or more visible characters is accepted
            /// and stored trimmed.
            #[test]
            fn well_formed_forms_are_accepted(
                name in "[A-Za-z]{2,30}",
                subject in "[A-Za-z0-9 ]{0,10}[A-Za-z0-9]{2}",
                body in "[A-Za-z0-9 .,!?]{0,200}[a-z]{2}",
            ) {
                let draft = input(&format!("  {name} "), &subject, &body).validate().unwrap();
                prop_assert_eq!(draft.sender_name, name);
                prop_assert_eq!(draft.subject, subject.trim().to_string());
                prop_assert_eq!(draft.message, body.trim().to_string());
            }

            /// Property: a single visible character in any field is never accepted.
            #[test]
            fn single_character_fields_are_rejected(c in "[A-Za-z]", field in 0usize..3) {
                let mut fields = ["Ada".to_string(), "Hello".to_string(), "Hi there".to_string()];
                fields[field] = c;
                let result = input(&fields[0], &fields[1], &fields[2]).validate();
                prop_assert!(matches!(result, Err(DomainError::Validation(_))));
            }
        }
    }
}
