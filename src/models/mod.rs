//! Data models
//!
//! This module contains all data structures used throughout the Media Ranker
//! service. Models represent:
//! - Database entities (User, Session, Work, Vote)
//! - Input types validated at the service boundary

mod session;
mod user;
mod vote;
mod work;

pub use session::Session;
pub use user::User;
pub use vote::Vote;
pub use work::{Category, FieldError, Work, WorkInput, WorkWithVotes, CATEGORIES};
