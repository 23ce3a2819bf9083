use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainResult, Entity, MediaAsset, SoftwareApplicationId, validate};

/// A tool or application the portfolio owner uses, shown with its icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplication {
    #[serde(rename = "_id")]
    pub id: SoftwareApplicationId,
    pub name: String,
    pub svg: MediaAsset,
    pub created_at: DateTime<Utc>,
}

impl Entity for SoftwareApplication {
    type Id = SoftwareApplicationId;
    const COLLECTION: &'static str = "software_applications";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSoftwareApplication {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareApplicationDraft {
    pub name: String,
}

impl NewSoftwareApplication {
    pub fn validate(self) -> DomainResult<SoftwareApplicationDraft> {
        let name = validate::required(self.name.as_deref(), "Please Provide Software's Name!")?;
        Ok(SoftwareApplicationDraft { name })
    }
}

impl SoftwareApplication {
    pub fn create(draft: SoftwareApplicationDraft, svg: MediaAsset, now: DateTime<Utc>) -> Self {
        Self {
            id: SoftwareApplicationId::new(),
            name: draft.name,
            svg,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::DomainError;

    #[test]
    fn name_is_required() {
        let err = NewSoftwareApplication { name: Some(" ".into()) }.validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Please Provide Software's Name!"));
    }

    #[test]
    fn creates_application_with_icon() {
        let draft = NewSoftwareApplication { name: Some("VS Code".into()) }.validate().unwrap();
        let svg = MediaAsset::new("software-applications/a.svg", "http://x/a.svg");
        let app = SoftwareApplication::create(draft, svg.clone(), Utc::now());
        assert_eq!(app.name, "VS Code");
        assert_eq!(app.svg, svg);
    }
}
