//! Build tasks for Particulate
//!
//! Run through the cargo alias: `cargo xtask <build|doctor|serve>`.

mod bootstrap;
mod doctor;
mod error;
mod pack;
mod runner;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::XtaskError;

use crate::pack::BuildOptions;
use crate::runner::SystemRunner;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Install missing tools, then build the browser package with wasm-pack
    Build {
        /// Unoptimised build
        #[arg(long)]
        dev: bool,

        /// Output directory for the generated package
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Fail instead of installing missing tools
        #[arg(long)]
        no_install: bool,
    },

    /// Check the development shell provides every declared build input
    Doctor,

    /// Serve the repository with cross-origin isolation headers
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Directory to serve
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let runner = SystemRunner::new();

    match cli.command {
        Task::Build {
            dev,
            out_dir,
            no_install,
        } => {
            let options = BuildOptions {
                release: !dev,
                out_dir,
                skip_install: no_install,
                inherited_rustflags: std::env::var("RUSTFLAGS").ok(),
            };
            let summary = pack::build(&runner, &options)?;
            if summary.rustup_nightly {
                log::info!("Built with the rustup {} toolchain", bootstrap::NIGHTLY);
            }
            if summary.installed.is_empty() {
                log::info!("Build finished; all tools were already present");
            } else {
                log::info!("Build finished; installed {}", summary.installed.join(", "));
            }
        }
        Task::Doctor => {
            let rustflags = std::env::var("RUSTFLAGS").ok();
            doctor::inspect(&runner, rustflags.as_deref()).into_result()?;
            log::info!("Development shell is complete");
        }
        Task::Serve { port, root } => {
            serve::serve(&root, port)?;
        }
    }

    Ok(())
}
