//! Jira API client and types.
//!
//! This module provides the read-only interface to the Jira REST API across
//! the Cloud (v3) and Server/Data Center (v2) generations.

pub mod auth;
pub mod avatar;
pub mod client;
pub mod error;
pub mod negotiate;
pub mod types;

pub use auth::{normalize_server, Auth, Credentials};
pub use avatar::AvatarImage;
pub use client::JiraClient;
pub use error::ApiError;
pub use negotiate::ApiGeneration;
pub use types::{AvatarUrls, Profile, Project};
