//! # topicsync-github
//!
//! GitHub REST implementation of [`topicsync_core::RepositoryHost`].

pub mod client;
pub mod error;

pub use client::{GithubClient, DEFAULT_API_URL};
pub use error::GithubError;
