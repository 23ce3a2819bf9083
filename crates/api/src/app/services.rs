//! Infrastructure wiring shared by every handler.

use std::sync::Arc;

use folio_auth::{Hs256JwtCodec, JwtValidator};
use folio_content::{Message, Project, Skill, SoftwareApplication, Timeline, User};
use folio_infra::{
    AppConfig, Collection, DocumentStore, InMemoryDocumentStore, LocalMediaStore, LogMailer,
    Mailer, MediaStore, PostgresDocumentStore, StoreError,
};

use crate::middleware::AuthState;

#[derive(Clone)]
pub struct AppServices {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<Hs256JwtCodec>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
    pub users: Collection<User>,
    pub timelines: Collection<Timeline>,
    pub messages: Collection<Message>,
    pub skills: Collection<Skill>,
    pub software_applications: Collection<SoftwareApplication>,
    pub projects: Collection<Project>,
}

impl AppServices {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        media: Arc<dyn MediaStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let tokens = Arc::new(Hs256JwtCodec::new(
            config.jwt_secret.as_bytes(),
            config.jwt_expires,
        ));
        Self {
            config: Arc::new(config),
            tokens,
            media,
            mailer,
            users: Collection::new(store.clone()),
            timelines: Collection::new(store.clone()),
            messages: Collection::new(store.clone()),
            skills: Collection::new(store.clone()),
            software_applications: Collection::new(store.clone()),
            projects: Collection::new(store),
        }
    }

    /// Create per-collection backend structures (indexes).
    pub async fn ensure_collections(&self) -> Result<(), StoreError> {
        self.users.ensure().await?;
        self.timelines.ensure().await?;
        self.messages.ensure().await?;
        self.skills.ensure().await?;
        self.software_applications.ensure().await?;
        self.projects.ensure().await
    }

    pub fn auth_state(&self) -> AuthState {
        let jwt: Arc<dyn JwtValidator> = self.tokens.clone();
        AuthState {
            jwt,
            users: self.users.clone(),
        }
    }

    /// The user whose portfolio is public: `PORTFOLIO_USER_ID`, else the first registered.
    pub async fn portfolio_owner(&self) -> Result<Option<User>, StoreError> {
        match self.config.portfolio_user_id {
            Some(id) => self.users.get(id).await,
            None => Ok(self.users.list().await?.into_iter().next()),
        }
    }
}

pub async fn build_services(config: AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn DocumentStore> = if config.use_persistent_stores {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let store = PostgresDocumentStore::connect(url).await?;
        store.ensure_schema().await?;
        tracing::info!("using postgres document store");
        Arc::new(store)
    } else {
        tracing::info!("using in-memory document store");
        Arc::new(InMemoryDocumentStore::new())
    };

    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        config.upload_dir.clone(),
        config.public_base_url.clone(),
    ));

    let services = AppServices::new(config, store, media, Arc::new(LogMailer));
    services.ensure_collections().await?;
    Ok(services)
}
