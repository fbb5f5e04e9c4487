//! repojira - link local source repositories to Jira projects.
//!
//! The core is a read-only Jira client that works against both Jira Cloud
//! (REST v3) and Jira Server/Data Center (REST v2): it validates credentials,
//! lists projects, reads the current user's profile and downloads avatars as
//! data URIs. Around it sit a keyring credential store, a file-backed
//! repository registry and the [`Integration`] facade that front ends use.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod integration;
pub mod logging;
pub mod registry;

pub use error::{AppError, Result};
pub use integration::Integration;
