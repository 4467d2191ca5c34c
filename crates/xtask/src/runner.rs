//! Command execution port
//!
//! Tasks describe commands as `CommandSpec` values and hand them to a
//! `CommandRunner`. The system runner spawns real processes; tests swap in a
//! recording fake.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::XtaskError;

/// A program invocation with arguments and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Port for running external commands
pub trait CommandRunner {
    /// Run a command quietly and report whether it succeeded
    ///
    /// Used for presence checks like `wasm-pack --version`. A command that
    /// cannot be started counts as a failure.
    fn probe(&self, spec: &CommandSpec) -> bool;

    /// Run a command quietly and capture its stdout
    ///
    /// Returns None when the command cannot be started or exits non-zero.
    fn output(&self, spec: &CommandSpec) -> Option<String>;

    /// Run a command with inherited stdio, failing on a non-zero exit
    fn run(&self, spec: &CommandSpec) -> Result<(), XtaskError>;

    /// Shorthand for probing `<program> --version`
    fn has(&self, program: &str) -> bool {
        self.probe(&CommandSpec::new(program).arg("--version"))
    }
}

/// Runs commands as child processes
///
/// `$HOME/.cargo/bin` is put first on the children's `PATH`, which is what
/// sourcing `$HOME/.cargo/env` does for a shell, so tools installed by rustup
/// or `cargo install` earlier in the same run are found.
pub struct SystemRunner {
    path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        let cargo_bin = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cargo").join("bin"));
        let path = cargo_bin.and_then(|bin| {
            let current = std::env::var_os("PATH").unwrap_or_default();
            let mut dirs = vec![bin];
            dirs.extend(std::env::split_paths(&current));
            std::env::join_paths(dirs).ok()
        });
        Self { path }
    }

    fn command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(path) = &self.path {
            cmd.env("PATH", path);
        }
        for (key, value) in &spec.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn probe(&self, spec: &CommandSpec) -> bool {
        let status = self
            .command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) => status.success(),
            Err(e) => {
                log::debug!("`{}` could not be started: {}", spec, e);
                false
            }
        }
    }

    fn output(&self, spec: &CommandSpec) -> Option<String> {
        let output = match self.command(spec).stdin(Stdio::null()).stderr(Stdio::null()).output() {
            Ok(output) => output,
            Err(e) => {
                log::debug!("`{}` could not be started: {}", spec, e);
                return None;
            }
        };
        if !output.status.success() {
            log::debug!("`{}` exited with {}", spec, output.status);
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, spec: &CommandSpec) -> Result<(), XtaskError> {
        log::info!("Running `{}`", spec);
        let status = self
            .command(spec)
            .status()
            .map_err(|source| XtaskError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(XtaskError::CommandFailed {
                command: spec.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording runner for task tests

    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    use super::*;

    /// What running a scripted command changes
    #[derive(Debug, Clone)]
    pub enum Effect {
        /// The probe starts succeeding
        Available(String),
        /// `entry` appears as a line in the output of `listing`
        Listed { listing: String, entry: String },
    }

    /// Fake runner with a scripted environment
    ///
    /// Probes succeed for command lines in `available`, and `listings` holds
    /// the stdout of output commands. Running a command listed in `effects`
    /// applies its effects afterwards, which models an install. Commands
    /// whose line starts with an entry in `failing` exit with code 1.
    #[derive(Default)]
    pub struct FakeRunner {
        pub available: RefCell<HashSet<String>>,
        pub listings: RefCell<HashMap<String, Vec<String>>>,
        pub effects: HashMap<String, Vec<Effect>>,
        pub failing: Vec<String>,
        pub ran: RefCell<Vec<CommandSpec>>,
    }

    impl FakeRunner {
        pub fn with_available(self, probe: &str) -> Self {
            self.available.borrow_mut().insert(probe.to_string());
            self
        }

        pub fn with_listed(self, listing: &str, entry: &str) -> Self {
            self.list(listing, entry);
            self
        }

        pub fn with_effect(mut self, command: &str, probe: &str) -> Self {
            self.effects
                .entry(command.to_string())
                .or_default()
                .push(Effect::Available(probe.to_string()));
            self
        }

        pub fn with_listing_effect(mut self, command: &str, listing: &str, entry: &str) -> Self {
            self.effects
                .entry(command.to_string())
                .or_default()
                .push(Effect::Listed {
                    listing: listing.to_string(),
                    entry: entry.to_string(),
                });
            self
        }

        pub fn with_failing(mut self, prefix: &str) -> Self {
            self.failing.push(prefix.to_string());
            self
        }

        /// Command lines run so far, in order
        pub fn ran_lines(&self) -> Vec<String> {
            self.ran.borrow().iter().map(ToString::to_string).collect()
        }

        fn list(&self, listing: &str, entry: &str) {
            self.listings
                .borrow_mut()
                .entry(listing.to_string())
                .or_default()
                .push(entry.to_string());
        }

        fn fails(&self, line: &str) -> bool {
            self.failing.iter().any(|prefix| line.starts_with(prefix))
        }
    }

    impl CommandRunner for FakeRunner {
        fn probe(&self, spec: &CommandSpec) -> bool {
            self.available.borrow().contains(&spec.to_string())
        }

        fn output(&self, spec: &CommandSpec) -> Option<String> {
            let line = spec.to_string();
            if self.fails(&line) {
                return None;
            }
            let listings = self.listings.borrow();
            Some(listings.get(&line).map(|entries| entries.join("\n")).unwrap_or_default())
        }

        fn run(&self, spec: &CommandSpec) -> Result<(), XtaskError> {
            let line = spec.to_string();
            self.ran.borrow_mut().push(spec.clone());

            if self.fails(&line) {
                return Err(XtaskError::CommandFailed {
                    command: line,
                    code: Some(1),
                });
            }
            for effect in self.effects.get(&line).into_iter().flatten() {
                match effect {
                    Effect::Available(probe) => {
                        self.available.borrow_mut().insert(probe.clone());
                    }
                    Effect::Listed { listing, entry } => self.list(listing, entry),
                }
            }
            Ok(())
        }
    }
}
