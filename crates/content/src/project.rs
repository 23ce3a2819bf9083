use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainError, DomainResult, Entity, MediaAsset, ProjectId, validate};

/// A showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub project_banner: MediaAsset,
    pub created_at: DateTime<Utc>,
}

impl Entity for Project {
    type Id = ProjectId;
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub git_repo_link: Option<String>,
    pub project_link: Option<String>,
    pub technologies: Option<String>,
    pub stack: Option<String>,
    pub deployed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub git_repo_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
}

impl NewProject {
    pub fn validate(self) -> DomainResult<ProjectDraft> {
        const INCOMPLETE: &str = "Please Provide All Details!";
        Ok(ProjectDraft {
            title: validate::required(self.title.as_deref(), INCOMPLETE)?,
            description: validate::required(self.description.as_deref(), INCOMPLETE)?,
            git_repo_link: validate::required(self.git_repo_link.as_deref(), INCOMPLETE)?,
            project_link: validate::required(self.project_link.as_deref(), INCOMPLETE)?,
            technologies: validate::required(self.technologies.as_deref(), INCOMPLETE)?,
            stack: validate::required(self.stack.as_deref(), INCOMPLETE)?,
            deployed: validate::required(self.deployed.as_deref(), INCOMPLETE)?,
        })
    }
}

/// Request: partial project update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub git_repo_link: Option<String>,
    pub project_link: Option<String>,
    pub technologies: Option<String>,
    pub stack: Option<String>,
    pub deployed: Option<String>,
}

fn replace(target: &mut String, value: Option<String>, field: &str) -> DomainResult<()> {
    if let Some(value) = value {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation(format!("{field} Cannot Be Empty!")));
        }
        *target = value.to_string();
    }
    Ok(())
}

impl Project {
    pub fn create(draft: ProjectDraft, banner: MediaAsset, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::new(),
            title: draft.title,
            description: draft.description,
            git_repo_link: draft.git_repo_link,
            project_link: draft.project_link,
            technologies: draft.technologies,
            stack: draft.stack,
            deployed: draft.deployed,
            project_banner: banner,
            created_at: now,
        }
    }

    /// Apply a partial update; on error the project is left unchanged.
    pub fn apply_update(&mut self, update: UpdateProject) -> DomainResult<()> {
        let mut next = self.clone();
        replace(&mut next.title, update.title, "Title")?;
        replace(&mut next.description, update.description, "Description")?;
        replace(&mut next.git_repo_link, update.git_repo_link, "Git Repo Link")?;
        replace(&mut next.project_link, update.project_link, "Project Link")?;
        replace(&mut next.technologies, update.technologies, "Technologies")?;
        replace(&mut next.stack, update.stack, "Stack")?;
        replace(&mut next.deployed, update.deployed, "Deployed")?;
        *self = next;
        Ok(())
    }

    /// Swap the banner, returning the previous one so it can be deleted.
    pub fn replace_banner(&mut self, banner: MediaAsset) -> MediaAsset {
        std::mem::replace(&mut self.project_banner, banner)
    }
}
