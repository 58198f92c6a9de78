//! Database layer
//!
//! Connection pool management, code-based migrations, and the repository
//! implementations over SQLite.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
