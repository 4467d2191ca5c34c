//! Browser package build via wasm-pack

use std::path::PathBuf;

use crate::XtaskError;
use crate::bootstrap::{self, NIGHTLY};
use crate::runner::{CommandRunner, CommandSpec};

/// Wasm target features the browser build is compiled with
pub const TARGET_FEATURES: [&str; 3] = ["+atomics", "+bulk-memory", "+mutable-globals"];

/// Crate packaged for the browser, relative to the workspace root
pub const WEB_CRATE: &str = "crates/particulate";

/// `RUSTFLAGS` enabling shared memory in the wasm module
pub fn rustflags() -> String {
    format!("-C target-feature={}", TARGET_FEATURES.join(","))
}

/// Options for `xtask build`
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Optimised build (`--release`) rather than `--dev`
    pub release: bool,
    /// Output directory for the generated package (wasm-pack's `--out-dir`)
    pub out_dir: Option<PathBuf>,
    /// Skip installing missing tools
    pub skip_install: bool,
    /// RUSTFLAGS already present in the environment (e.g. from the Nix shell)
    pub inherited_rustflags: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            release: true,
            out_dir: None,
            skip_install: false,
            inherited_rustflags: None,
        }
    }
}

/// What a build did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Tools installed during this build
    pub installed: Vec<String>,
    /// Whether the build ran on the rustup-managed nightly
    pub rustup_nightly: bool,
}

/// Provision tools and package the browser crate
pub fn build(runner: &dyn CommandRunner, options: &BuildOptions) -> Result<BuildSummary, XtaskError> {
    let rustup_nightly = runner.has("rustup");
    let tools = bootstrap::required_tools(rustup_nightly);

    let installed = if options.skip_install {
        Vec::new()
    } else {
        bootstrap::ensure_tools(runner, &tools)?
    };

    runner.run(&wasm_pack_command(options, rustup_nightly))?;
    log::info!("Browser package built from {}", WEB_CRATE);

    Ok(BuildSummary {
        installed,
        rustup_nightly,
    })
}

/// The wasm-pack invocation for these options
pub fn wasm_pack_command(options: &BuildOptions, rustup_nightly: bool) -> CommandSpec {
    let mut cmd = CommandSpec::new("wasm-pack").args(["build", WEB_CRATE, "--target", "web"]);
    cmd = cmd.arg(if options.release { "--release" } else { "--dev" });
    if let Some(out_dir) = &options.out_dir {
        cmd = cmd.arg("--out-dir").arg(out_dir.display().to_string());
    }

    // Atomics need a std rebuilt with the same target features
    cmd = cmd.args(["--", "-Z", "build-std=panic_abort,std"]);

    cmd = cmd.env("RUSTFLAGS", merged_rustflags(options.inherited_rustflags.as_deref()));
    if rustup_nightly {
        cmd = cmd.env("RUSTUP_TOOLCHAIN", NIGHTLY);
    }
    cmd
}

/// Feature lists from every `target-feature` codegen option in a RUSTFLAGS value
///
/// Accepts `-C target-feature=..`, `-Ctarget-feature=..`,
/// `--codegen target-feature=..` and `--codegen=target-feature=..`.
fn target_feature_lists(rustflags: &str) -> Vec<&str> {
    rustflags
        .split_whitespace()
        .filter_map(|flag| {
            let option = flag
                .strip_prefix("--codegen=")
                .or_else(|| flag.strip_prefix("-C"))
                .unwrap_or(flag);
            option.strip_prefix("target-feature=")
        })
        .collect()
}

/// Target features missing from a RUSTFLAGS value
pub fn missing_target_features(rustflags: &str) -> Vec<String> {
    let enabled: Vec<&str> = target_feature_lists(rustflags)
        .into_iter()
        .flat_map(|list| list.split(','))
        .collect();

    TARGET_FEATURES
        .iter()
        .filter(|feature| !enabled.contains(*feature))
        .map(|feature| feature.to_string())
        .collect()
}

/// Keep inherited flags and add ours if any feature is missing
fn merged_rustflags(inherited: Option<&str>) -> String {
    match inherited.map(str::trim).filter(|flags| !flags.is_empty()) {
        Some(flags) if missing_target_features(flags).is_empty() => flags.to_string(),
        Some(flags) => format!("{} {}", flags, rustflags()),
        None => rustflags(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::RequiredTool;
    use crate::runner::fake::FakeRunner;

    const PACK: &str = "wasm-pack build crates/particulate --target web --release -- -Z build-std=panic_abort,std";

    const COMPONENTS: &str = "rustup +nightly component list --installed";
    const TARGETS: &str = "rustup +nightly target list --installed";

    fn provisioned() -> FakeRunner {
        FakeRunner::default()
            .with_available("rustup --version")
            .with_available("rustup run nightly rustc --version")
            .with_listed(COMPONENTS, "rust-src")
            .with_listed(TARGETS, "wasm32-unknown-unknown")
            .with_available("wasm-pack --version")
    }

    #[test]
    fn test_rustflags() {
        assert_eq!(
            rustflags(),
            "-C target-feature=+atomics,+bulk-memory,+mutable-globals"
        );
    }

    #[test]
    fn test_missing_target_features() {
        assert!(missing_target_features(&rustflags()).is_empty());
        assert_eq!(
            missing_target_features("-C target-feature=+atomics"),
            vec!["+bulk-memory", "+mutable-globals"]
        );
        assert_eq!(missing_target_features("").len(), 3);
        // Split across several flags
        assert!(
            missing_target_features(
                "-C target-feature=+atomics -C target-feature=+bulk-memory,+mutable-globals"
            )
            .is_empty()
        );
    }

    #[test]
    fn test_codegen_option_spellings() {
        for flags in [
            "-Ctarget-feature=+atomics,+bulk-memory,+mutable-globals",
            "--codegen target-feature=+atomics,+bulk-memory,+mutable-globals",
            "--codegen=target-feature=+atomics,+bulk-memory,+mutable-globals",
            "-Copt-level=3 -Ctarget-feature=+atomics -C target-feature=+bulk-memory,+mutable-globals",
        ] {
            assert!(missing_target_features(flags).is_empty(), "{flags}");
        }
        assert_eq!(
            missing_target_features("-Ctarget-cpu=native"),
            vec!["+atomics", "+bulk-memory", "+mutable-globals"]
        );

        // Already complete, so nothing is appended
        let compact = "-Ctarget-feature=+atomics,+bulk-memory,+mutable-globals";
        assert_eq!(merged_rustflags(Some(compact)), compact);
    }

    #[test]
    fn test_wasm_pack_command() {
        let cmd = wasm_pack_command(&BuildOptions::default(), true);
        assert_eq!(cmd.to_string(), PACK);
        assert!(cmd.envs.contains(&("RUSTFLAGS".to_string(), rustflags())));
        assert!(cmd.envs.contains(&("RUSTUP_TOOLCHAIN".to_string(), "nightly".to_string())));

        let dev = BuildOptions {
            release: false,
            out_dir: Some(PathBuf::from("dist")),
            ..BuildOptions::default()
        };
        let cmd = wasm_pack_command(&dev, false);
        assert!(cmd.args.contains(&"--dev".to_string()));
        assert!(cmd.to_string().contains("--out-dir dist"));
        assert!(!cmd.envs.iter().any(|(k, _)| k == "RUSTUP_TOOLCHAIN"));
    }

    #[test]
    fn test_inherited_rustflags_are_kept() {
        let shell = BuildOptions {
            inherited_rustflags: Some(rustflags()),
            ..BuildOptions::default()
        };
        let cmd = wasm_pack_command(&shell, false);
        assert!(cmd.envs.contains(&("RUSTFLAGS".to_string(), rustflags())));

        let partial = BuildOptions {
            inherited_rustflags: Some("-C debuginfo=1".to_string()),
            ..BuildOptions::default()
        };
        let cmd = wasm_pack_command(&partial, false);
        let flags = &cmd.envs.iter().find(|(k, _)| k == "RUSTFLAGS").unwrap().1;
        assert!(flags.starts_with("-C debuginfo=1 "));
        assert!(missing_target_features(flags).is_empty());
    }

    #[test]
    fn test_build_on_provisioned_machine_installs_nothing() {
        let runner = provisioned();
        let summary = build(&runner, &BuildOptions::default()).unwrap();
        assert!(summary.installed.is_empty());
        assert!(summary.rustup_nightly);
        assert_eq!(runner.ran_lines(), vec![PACK.to_string()]);
    }

    #[test]
    fn test_building_twice_installs_once() {
        let nightly_install = RequiredTool::nightly_toolchain().install.to_string();
        let runner = FakeRunner::default()
            .with_available("rustup --version")
            .with_effect(&nightly_install, "rustup run nightly rustc --version")
            .with_listing_effect(&nightly_install, COMPONENTS, "rust-src")
            .with_listing_effect(&nightly_install, TARGETS, "wasm32-unknown-unknown")
            .with_effect("cargo install wasm-pack", "wasm-pack --version");

        let first = build(&runner, &BuildOptions::default()).unwrap();
        assert_eq!(first.installed, vec!["nightly toolchain", "wasm-pack"]);

        let ran_after_first = runner.ran_lines().len();
        let second = build(&runner, &BuildOptions::default()).unwrap();
        assert!(second.installed.is_empty());

        // Only the package build ran the second time
        assert_eq!(runner.ran_lines()[ran_after_first..], [PACK.to_string()]);
    }

    #[test]
    fn test_failing_packager_fails_the_build() {
        let runner = provisioned().with_failing("wasm-pack build");
        let err = build(&runner, &BuildOptions::default()).unwrap_err();
        match err {
            XtaskError::CommandFailed { command, code } => {
                assert_eq!(command, PACK);
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_existing_nightly_missing_target_gets_it() {
        let add_target = "rustup target add wasm32-unknown-unknown --toolchain nightly";
        let runner = FakeRunner::default()
            .with_available("rustup --version")
            .with_available("rustup run nightly rustc --version")
            .with_listed(COMPONENTS, "rust-src")
            .with_available("wasm-pack --version")
            .with_listing_effect(add_target, TARGETS, "wasm32-unknown-unknown");

        let summary = build(&runner, &BuildOptions::default()).unwrap();
        assert_eq!(summary.installed, vec!["wasm32-unknown-unknown target"]);
        assert_eq!(runner.ran_lines(), vec![add_target.to_string(), PACK.to_string()]);
    }

    #[test]
    fn test_skip_install() {
        let runner = FakeRunner::default();
        let options = BuildOptions {
            skip_install: true,
            ..BuildOptions::default()
        };
        let summary = build(&runner, &options).unwrap();
        assert!(summary.installed.is_empty());
        assert_eq!(runner.ran_lines().len(), 1);
    }
}
