//! Database repositories
//!
//! Each repository exposes a trait describing its data access interface and
//! a SQLx-backed implementation. Services depend on the traits only.

mod session;
mod user;
mod vote;
mod work;

pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use vote::{SqlxVoteRepository, VoteRepository};
pub use work::{SqlxWorkRepository, WorkRepository};
