// src/types/mod.rs
pub mod ai;
pub mod application;
pub mod common;
pub mod job;
pub mod notification;
pub mod org;
pub mod user;

pub use application::{Application, ApplicationCreate, ApplicationStatus, ApplicationUpdate};
pub use common::{ListQuery, Paged, PagedBody};
pub use job::{Job, JobDraft};
pub use notification::Notification;
pub use org::{Org, OrgDraft};
pub use user::{AiUser, AiUserPatch, NewAiUser, Role, User};
