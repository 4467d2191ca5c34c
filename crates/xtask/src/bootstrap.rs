//! Idempotent tool installation
//!
//! Each required tool has a presence probe and an install command. The
//! install only runs when the probe fails, so bootstrapping an already
//! provisioned machine runs no installs at all.

use crate::XtaskError;
use crate::runner::{CommandRunner, CommandSpec};

/// Toolchain used for shared-memory wasm builds (`-Z build-std` is nightly-only)
pub const NIGHTLY: &str = "nightly";

/// Compilation target of the browser build
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Component holding the standard library sources
pub const RUST_SRC: &str = "rust-src";

/// How to tell whether a tool is present
#[derive(Debug, Clone)]
pub enum Presence {
    /// The command exits successfully
    Succeeds(CommandSpec),
    /// The command's output has `entry` on a line of its own
    Listed { command: CommandSpec, entry: String },
}

impl Presence {
    pub fn check(&self, runner: &dyn CommandRunner) -> bool {
        match self {
            Presence::Succeeds(command) => runner.probe(command),
            Presence::Listed { command, entry } => runner
                .output(command)
                .is_some_and(|out| out.lines().any(|line| line.trim() == entry)),
        }
    }
}

/// A tool the build needs, with how to detect and install it
#[derive(Debug, Clone)]
pub struct RequiredTool {
    pub name: String,
    pub probe: Presence,
    pub install: CommandSpec,
}

impl RequiredTool {
    /// The wasm packager, installed from crates.io
    pub fn wasm_pack() -> Self {
        Self {
            name: "wasm-pack".to_string(),
            probe: Presence::Succeeds(CommandSpec::new("wasm-pack").arg("--version")),
            install: CommandSpec::new("cargo").args(["install", "wasm-pack"]),
        }
    }

    /// A rustup-managed nightly with std sources and the wasm target
    pub fn nightly_toolchain() -> Self {
        Self {
            name: format!("{} toolchain", NIGHTLY),
            probe: Presence::Succeeds(
                CommandSpec::new("rustup").args(["run", NIGHTLY, "rustc", "--version"]),
            ),
            install: CommandSpec::new("rustup").args([
                "toolchain",
                "install",
                NIGHTLY,
                "--profile",
                "minimal",
                "--component",
                RUST_SRC,
                "--target",
                WASM_TARGET,
            ]),
        }
    }

    /// Standard library sources for `-Z build-std`
    ///
    /// An existing nightly may lack them, so they are checked on their own.
    pub fn rust_src() -> Self {
        let toolchain = format!("+{}", NIGHTLY);
        Self {
            name: format!("{} component", RUST_SRC),
            probe: Presence::Listed {
                command: CommandSpec::new("rustup")
                    .args([toolchain.as_str(), "component", "list", "--installed"]),
                entry: RUST_SRC.to_string(),
            },
            install: CommandSpec::new("rustup")
                .args(["component", "add", RUST_SRC, "--toolchain", NIGHTLY]),
        }
    }

    /// The wasm target for the nightly toolchain
    pub fn wasm_target() -> Self {
        let toolchain = format!("+{}", NIGHTLY);
        Self {
            name: format!("{} target", WASM_TARGET),
            probe: Presence::Listed {
                command: CommandSpec::new("rustup")
                    .args([toolchain.as_str(), "target", "list", "--installed"]),
                entry: WASM_TARGET.to_string(),
            },
            install: CommandSpec::new("rustup")
                .args(["target", "add", WASM_TARGET, "--toolchain", NIGHTLY]),
        }
    }
}

/// Tools to provision on this machine
///
/// Inside the Nix shell the compiler comes from the flake and rustup is
/// absent, so only the packager is checked there.
pub fn required_tools(rustup_managed: bool) -> Vec<RequiredTool> {
    let mut tools = Vec::new();
    if rustup_managed {
        tools.push(RequiredTool::nightly_toolchain());
        tools.push(RequiredTool::rust_src());
        tools.push(RequiredTool::wasm_target());
    }
    tools.push(RequiredTool::wasm_pack());
    tools
}

/// Install whichever tools are missing. Returns the names of those installed.
pub fn ensure_tools(
    runner: &dyn CommandRunner,
    tools: &[RequiredTool],
) -> Result<Vec<String>, XtaskError> {
    let mut installed = Vec::new();

    for tool in tools {
        if tool.probe.check(runner) {
            log::info!("{} already present", tool.name);
            continue;
        }

        log::info!("{} not found, installing", tool.name);
        runner.run(&tool.install)?;

        if !tool.probe.check(runner) {
            return Err(XtaskError::InstallIneffective {
                tool: tool.name.clone(),
            });
        }
        installed.push(tool.name.clone());
    }

    Ok(installed)
}
