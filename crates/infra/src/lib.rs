//! Infrastructure layer: document storage, media files, mail, config.

pub mod config;
pub mod document_store;
pub mod mailer;
pub mod media;

pub use config::{AppConfig, ConfigError};
pub use document_store::{
    Collection, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreError,
};
pub use mailer::{Email, InMemoryMailer, LogMailer, MailError, Mailer};
pub use media::{InMemoryMediaStore, LocalMediaStore, MediaError, MediaFolder, MediaStore, Upload};
