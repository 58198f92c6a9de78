//! Services layer - business logic
//!
//! Services sit between the API handlers and the repositories. Each service
//! owns its error enum; repositories only ever report `anyhow` errors.

pub mod password;
pub mod user;
pub mod vote;
pub mod work;

pub use user::{LoginInput, UserService, UserServiceError};
pub use vote::{VoteService, VoteServiceError};
pub use work::{WorkService, WorkServiceError};
