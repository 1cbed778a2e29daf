//! GitHub - pushes exported design tokens through the repository contents API

pub mod client;
pub mod config;
pub mod error;
pub mod publisher;
pub mod repository;

pub use client::{ContentFile, GithubClient, RepositoryInfo};
pub use config::GithubConfig;
pub use error::{GithubError, Result};
pub use publisher::GithubPublisher;
pub use repository::Repository;
