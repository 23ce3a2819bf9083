//! Portfolio content domain module.
//!
//! This crate contains the documents the portfolio serves and the validation
//! rules for creating and updating them, implemented as plain deterministic
//! logic (no IO, no HTTP, no storage).
//!
//! Request inputs (`New*`, `Update*`) carry optional strings so the same types
//! can be filled from JSON bodies or multipart text fields.

pub mod message;
pub mod project;
pub mod skill;
pub mod software_application;
pub mod timeline;
pub mod user;

pub use message::{Message, MessageDraft, NewMessage};
pub use project::{NewProject, Project, ProjectDraft, UpdateProject};
pub use skill::{NewSkill, NumberOrText, Skill, SkillDraft, UpdateSkill};
pub use software_application::{
    NewSoftwareApplication, SoftwareApplication, SoftwareApplicationDraft,
};
pub use timeline::{NewTimeline, Period, Timeline, TimelineDraft};
pub use user::{
    ChangePassword, ForgotPassword, Login, Profile, RegisterUser, Registration, ResetPassword,
    SocialLinks, UpdateProfile, User, UserProfile,
};
