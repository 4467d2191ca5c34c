use thiserror::Error;

/// Errors from build tasks
#[derive(Debug, Error)]
pub enum XtaskError {
    /// A command could not be started at all
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A command ran and exited unsuccessfully
    #[error("`{command}` failed with {}", exit_description(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// A tool is still missing after its install step ran
    #[error("{tool} is not available after installing it")]
    InstallIneffective { tool: String },

    /// Development shell is missing declared build inputs
    #[error("missing build inputs: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    /// RUSTFLAGS lacks required target features
    #[error("RUSTFLAGS is missing target features: {}", .0.join(", "))]
    MissingTargetFeatures(Vec<String>),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
