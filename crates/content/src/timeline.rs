use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainResult, Entity, TimelineId, validate};

/// Start/end of a timeline entry, as free-form labels (usually years).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// A dated entry on the portfolio's timeline (education, jobs, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(rename = "_id")]
    pub id: TimelineId,
    pub title: String,
    pub description: String,
    pub timeline: Period,
    pub created_at: DateTime<Utc>,
}

impl Entity for Timeline {
    type Id = TimelineId;
    const COLLECTION: &'static str = "timelines";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Request: add a timeline entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTimeline {
    pub title: Option<String>,
    pub description: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A validated [`NewTimeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineDraft {
    pub title: String,
    pub description: String,
    pub period: Period,
}

impl NewTimeline {
    pub fn validate(self) -> DomainResult<TimelineDraft> {
        let title = validate::required(self.title.as_deref(), "Title Required!")?;
        let description = validate::required(self.description.as_deref(), "Description Required!")?;
        let from = validate::required(
            self.from.as_deref(),
            "Timeline Starting Date is Required!",
        )?;

        Ok(TimelineDraft {
            title,
            description,
            period: Period {
                from,
                to: validate::optional(self.to.as_deref()),
            },
        })
    }
}

impl Timeline {
    pub fn create(draft: TimelineDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: TimelineId::new(),
            title: draft.title,
            description: draft.description,
            timeline: draft.period,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::DomainError;

    fn input() -> NewTimeline {
        NewTimeline {
            title: Some("BSc Computer Science".to_string()),
            description: Some("University of Somewhere".to_string()),
            from: Some("2018".to_string()),
            to: Some("2022".to_string()),
        }
    }

    #[test]
    fn valid_input_creates_entry() {
        let draft = input().validate().unwrap();
        let entry = Timeline::create(draft, Utc::now());
        assert_eq!(entry.title, "BSc Computer Science");
        assert_eq!(entry.timeline.from, "2018");
        assert_eq!(entry.timeline.to.as_deref(), Some("2022"));
    }

    #[test]
    fn end_date_is_optional() {
        let draft = NewTimeline { to: Some("  ".to_string()), ..input() }.validate().unwrap();
        assert_eq!(draft.period.to, None);
    }

    #[test]
    fn missing_title_is_rejected() {
        let err = NewTimeline { title: None, ..input() }.validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Title Required!"));
    }

    #[test]
    fn missing_start_is_rejected() {
        let err = NewTimeline { from: Some(String::new()), ..input() }.validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Timeline Starting Date is Required!"));
    }

    #[test]
    fn serializes_with_document_field_names() {
        let entry = Timeline::create(input().validate().unwrap(), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["_id"], entry.id.to_string());
        assert_eq!(json["timeline"]["from"], "2018");
        assert!(json.get("createdAt").is_some());
    }
}
