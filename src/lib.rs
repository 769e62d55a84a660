//! Assembles bundled agent integrations into an install tree.
//!
//! Library exports for the binary and for integration tests. See
//! [`pipeline`] for the order of operations.

pub mod backend;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod layout;
pub mod pipeline;
pub mod platform;
pub mod preflight;
pub mod process;
pub mod requirements;
pub mod stage;
pub mod timing;

pub use backend::BuildBackend;
pub use config::Config;
pub use pipeline::{BuildReport, Pipeline};
pub use platform::TargetOs;
