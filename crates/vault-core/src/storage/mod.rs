//! User storage backends
//!
//! This module provides two backends behind the [`UserStore`] trait:
//! 1. In-memory (tests, ephemeral deployments)
//! 2. JSON file rewritten atomically on every change

mod json_file;
mod memory;
mod traits;
mod types;

pub use json_file::JsonFileUserStore;
pub use memory::MemoryUserStore;
pub use traits::UserStore;
pub use types::{CredentialFields, User};
