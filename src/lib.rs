// src/lib.rs

pub mod config;
pub mod db;
pub mod error;

// Re-export
pub use crate::config::GitHubArtifactConfig;
pub use crate::db::{
    DirectoryBasedDatabase, ExampleDatabase, GitHubArtifactDatabase, InMemoryDatabase,
    MultiplexedDatabase, ReadOnlyDatabase, choose_database,
};
pub use crate::error::ExemplaError;
