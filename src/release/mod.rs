//! Release metadata engine
//!
//! # Architecture
//!
//! - **version**: validated `ReleaseVersion` and its `v`-prefixed `ReleaseTag`
//! - **locations**: the configured version locations resolved against the repository
//! - **validator**: reads every location and invariant into a `CheckReport`
//! - **aligner**: rewrites locations and invariants to one version (idempotent)
//! - **orchestrator**: the `check` / `prepare` / `cut` state machine
//!
//! # Example relsync.toml
//!
//! ```toml
//! [packaging]
//! updater_endpoint = "https://releases.example.com/app/latest.json"
//!
//! [[locations]]
//! path = "package.json"
//! format = "object-field"
//!
//! [[locations]]
//! path = "src-tauri/Cargo.toml"
//! format = "section-field"
//!
//! [[locations]]
//! path = "src-tauri/Cargo.lock"
//! format = "keyed-record"
//! record = "app"
//! ```

pub mod aligner;
pub mod locations;
pub mod orchestrator;
pub mod validator;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use orchestrator::{CheckOptions, ReleaseOrchestrator};
pub use validator::CheckReport;
pub use version::ReleaseVersion;
