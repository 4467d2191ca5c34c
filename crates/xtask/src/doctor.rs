//! Development shell verification
//!
//! Checks that the shell provides the build inputs the flake declares and
//! that RUSTFLAGS carries the wasm target features.

use crate::XtaskError;
use crate::pack::missing_target_features;
use crate::runner::CommandRunner;

/// Programs the development shell must provide
pub const SHELL_INPUTS: [&str; 6] = ["rustc", "cargo", "wasm-pack", "wasm-opt", "node", "python3"];

/// Result of inspecting a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub missing_tools: Vec<String>,
    pub missing_features: Vec<String>,
}

impl DoctorReport {
    pub fn is_healthy(&self) -> bool {
        self.missing_tools.is_empty() && self.missing_features.is_empty()
    }

    /// Turn an unhealthy report into the first relevant error
    pub fn into_result(self) -> Result<(), XtaskError> {
        if self.is_healthy() {
            return Ok(());
        }
        if !self.missing_tools.is_empty() {
            return Err(XtaskError::MissingTools(self.missing_tools));
        }
        if !self.missing_features.is_empty() {
            return Err(XtaskError::MissingTargetFeatures(self.missing_features));
        }
        Ok(())
    }
}

/// Probe every shell input and inspect `rustflags`
pub fn inspect(runner: &dyn CommandRunner, rustflags: Option<&str>) -> DoctorReport {
    let missing_tools: Vec<String> = SHELL_INPUTS
        .iter()
        .filter(|tool| {
            let present = runner.has(tool);
            if present {
                log::info!("found {}", tool);
            } else {
                log::warn!("missing {}", tool);
            }
            !present
        })
        .map(|tool| tool.to_string())
        .collect();

    let missing_features = missing_target_features(rustflags.unwrap_or_default());
    if !missing_features.is_empty() {
        log::warn!("RUSTFLAGS lacks {}", missing_features.join(", "));
    }

    DoctorReport {
        missing_tools,
        missing_features,
    }
}
