// NetCommand - Operation Outcomes
// SPDX-License-Identifier: MIT

//! Outcome types for configuration operations.
//!
//! Network commands fail routinely (disconnected adapters reject metric
//! changes, DHCP renew fails offline) and those failures are reported, not
//! raised. Every operation produces a [`StepOutcome`]; operations with a
//! best-effort second step produce a [`BestEffort`] pair so the secondary
//! result is dropped explicitly by the caller rather than lost implicitly.

/// Status of a single operation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Success,
    /// Step failed; the failure is reported, not fatal.
    Error,
    /// Step was not attempted.
    Skipped,
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of a single operation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: StepStatus,
    /// Short human-readable status line.
    pub message: String,
    /// Raw failure detail from the underlying command (if any).
    pub detail: Option<String>,
}

impl StepOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Success,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            status: StepStatus::Error,
            message: message.into(),
            detail: (!detail.is_empty()).then_some(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status line with the failure detail appended when present.
    pub fn display_line(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {}", self.message, detail),
            None => self.message.clone(),
        }
    }
}

/// A primary step plus an optional best-effort secondary step.
///
/// The secondary is only ever attempted after the primary succeeds; its
/// failure does not taint the overall result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestEffort {
    pub primary: StepOutcome,
    pub secondary: Option<StepOutcome>,
}

impl BestEffort {
    pub fn primary_only(primary: StepOutcome) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Overall success tracks the primary step alone.
    pub fn is_success(&self) -> bool {
        self.primary.is_success()
    }
}
