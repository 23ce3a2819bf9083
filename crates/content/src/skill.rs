use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainError, DomainResult, Entity, MediaAsset, SkillId, validate};

/// A skill badge: title, self-rated proficiency and an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: SkillId,
    pub title: String,
    /// Percentage, 0..=100.
    pub proficiency: u8,
    pub svg: MediaAsset,
    pub created_at: DateTime<Utc>,
}

impl Entity for Skill {
    type Id = SkillId;
    const COLLECTION: &'static str = "skills";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Numeric field that may arrive as a JSON number or as form text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSkill {
    pub title: Option<String>,
    pub proficiency: Option<NumberOrText>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDraft {
    pub title: String,
    pub proficiency: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSkill {
    pub proficiency: Option<NumberOrText>,
}

fn parse_proficiency(raw: &NumberOrText) -> DomainResult<u8> {
    let text = raw.as_text();
    if text.is_empty() {
        return Err(DomainError::validation("Proficiency Required!"));
    }
    match text.parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(DomainError::validation(
            "Proficiency Must Be A Whole Number Between 0 And 100!",
        )),
    }
}

impl NewSkill {
    pub fn validate(self) -> DomainResult<SkillDraft> {
        let title = validate::required(self.title.as_deref(), "Please Fill Form!")?;
        let proficiency = self
            .proficiency
            .as_ref()
            .ok_or_else(|| DomainError::validation("Please Fill Form!"))
            .and_then(parse_proficiency)?;
        Ok(SkillDraft { title, proficiency })
    }
}

impl UpdateSkill {
    pub fn validate(self) -> DomainResult<u8> {
        let raw = self
            .proficiency
            .ok_or_else(|| DomainError::validation("Proficiency Required!"))?;
        parse_proficiency(&raw)
    }
}

impl Skill {
    pub fn create(draft: SkillDraft, svg: MediaAsset, now: DateTime<Utc>) -> Self {
        Self {
            id: SkillId::new(),
            title: draft.title,
            proficiency: draft.proficiency,
            svg,
            created_at: now,
        }
    }

    pub fn set_proficiency(&mut self, proficiency: u8) {
        self.proficiency = proficiency;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg() -> MediaAsset {
        MediaAsset::new("skills/rust.svg", "http://localhost/uploads/skills/rust.svg")
    }

    #[test]
    fn accepts_proficiency_from_form_text() {
        let input: NewSkill =
            serde_json::from_value(serde_json::json!({"title": "Rust", "proficiency": "85"})).unwrap();
        let skill = Skill::create(input.validate().unwrap(), svg(), Utc::now());
        assert_eq!(skill.proficiency, 85);
    }

    #[test]
    fn accepts_proficiency_from_json_number() {
        let input: UpdateSkill = serde_json::from_value(serde_json::json!({"proficiency": 40})).unwrap();
        assert_eq!(input.validate().unwrap(), 40);
    }

    #[test]
    fn rejects_out_of_range_or_fractional_values() {
        for raw in [serde_json::json!(101), serde_json::json!(-1), serde_json::json!(12.5), serde_json::json!("lots")] {
            let input: UpdateSkill = serde_json::from_value(serde_json::json!({ "proficiency": raw })).unwrap();
            assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn missing_title_is_rejected() {
        let input = NewSkill {
            title: None,
            proficiency: Some(NumberOrText::Text("50".to_string())),
        };
        assert_eq!(input.validate().unwrap_err(), DomainError::validation("Please Fill Form!"));
    }

    #[test]
    fn update_changes_only_proficiency() {
        let mut skill = Skill::create(
            SkillDraft { title: "Go".to_string(), proficiency: 10 },
            svg(),
            Utc::now(),
        );
        let before = skill.clone();
        skill.set_proficiency(70);
        assert_eq!(skill.proficiency, 70);
        assert_eq!(skill.title, before.title);
        assert_eq!(skill.svg, before.svg);
    }
}
