//! Core engine for relsync
//!
//! - **config**: relsync.toml parsing and validation
//! - **context**: repository root + config, passed to every component
//! - **error**: error taxonomy with contextual help messages
//! - **vcs**: version-control seam (`ReleaseVcs`) and the system git backend

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
