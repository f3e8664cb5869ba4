// NetCommand - Shared Models
// SPDX-License-Identifier: MIT

//! Shared types and models:
//!
//! - **Adapter**: OS adapter snapshots and link status
//! - **Outcome**: step/best-effort result types for configuration operations
//! - **Status**: connectivity, identity, and snapshot types
//! - **Config**: application configuration
//! - **Error**: shared error types

pub mod adapter;
pub mod config;
pub mod error;
pub mod outcome;
pub mod status;

pub use adapter::{Adapter, LinkStatus};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use outcome::{BestEffort, StepOutcome, StepStatus};
pub use status::{ConnectivityStats, LocationInfo, StatusSnapshot};

/// Configuration directory name (under the platform config dir).
pub const CONFIG_DIR_NAME: &str = "netcommand";
