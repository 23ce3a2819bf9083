//! `folio-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod media;
pub mod validate;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{MessageId, ProjectId, SkillId, SoftwareApplicationId, TimelineId, UserId};
pub use media::MediaAsset;
