//! deskwrap runner: entry point.
//!
//! This binary is copied into every packaged application.  It reads the
//! `config.json` next to itself and opens a window showing the configured
//! target: a remote URL directly, or local files through a loopback static
//! file server on an OS-assigned port.
//!
//! # Usage
//!
//! ```text
//! deskwrap-runner [OPTIONS]
//!
//! Options:
//!   --config     <PATH>  Configuration record [default: config.json beside the executable]
//!   --serve-root <DIR>   Directory to serve local content from
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Description                          |
//! |-----------------------|--------------------------------------|
//! | `DESKWRAP_CONFIG`     | Same as `--config`                   |
//! | `DESKWRAP_SERVE_ROOT` | Same as `--serve-root`               |
//! | `RUST_LOG`            | Log filter, e.g. `debug` [`info`]    |
//!
//! # Threads
//!
//! Native windowing toolkits must own the main thread, so the Tokio runtime
//! is built by hand instead of with `#[tokio::main]`.  The content server
//! runs on the runtime's worker threads while the main thread drives the
//! window.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use deskwrap_runner::application::{prepare_launch, LaunchOptions};
use deskwrap_runner::infrastructure::presentation::native_host;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Opens the packaged application's window.
#[derive(Debug, Parser)]
#[command(
    name = "deskwrap-runner",
    about = "Shows a web application in a native window",
    version
)]
struct Cli {
    /// Configuration record to load instead of `config.json` beside the
    /// executable.
    #[arg(long, env = "DESKWRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to serve local content from, instead of the one computed
    /// from the executable's location.
    #[arg(long, env = "DESKWRAP_SERVE_ROOT")]
    serve_root: Option<PathBuf>,
}

impl Cli {
    /// Combines the parsed arguments with the executable's own path.
    fn into_launch_options(self, executable: PathBuf) -> LaunchOptions {
        LaunchOptions {
            config_path: self.config,
            serve_root: self.serve_root,
            ..LaunchOptions::for_executable(executable)
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let executable =
        std::env::current_exe().context("cannot determine the runner's own location")?;
    let options = cli.into_launch_options(executable);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("deskwrap-worker")
        .build()
        .context("failed to start the async runtime")?;

    let plan = runtime
        .block_on(prepare_launch(&options))
        .context("startup failed")?;
    info!("presenting {}", plan.address);

    let host = native_host(runtime.handle().clone());
    plan.present(host.as_ref()).context("window failed")?;

    info!("deskwrap runner stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_paths_computed() {
        // Arrange: parse with no arguments
        let cli = Cli::parse_from(["deskwrap-runner"]);

        // Act
        let options = cli.into_launch_options(PathBuf::from("/opt/demo/runner"));

        // Assert
        assert!(options.config_path.is_none());
        assert!(options.serve_root.is_none());
        assert_eq!(options.executable, PathBuf::from("/opt/demo/runner"));
    }

    #[test]
    fn test_cli_config_override() {
        let cli = Cli::parse_from(["deskwrap-runner", "--config", "/tmp/dev.json"]);

        let options = cli.into_launch_options(PathBuf::from("/opt/demo/runner"));

        assert_eq!(options.config_path(), PathBuf::from("/tmp/dev.json"));
    }

    #[test]
    fn test_cli_serve_root_override() {
        let cli = Cli::parse_from(["deskwrap-runner", "--serve-root", "./site"]);

        let options = cli.into_launch_options(PathBuf::from("/opt/demo/runner"));

        assert_eq!(options.serve_root(), PathBuf::from("./site"));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["deskwrap-runner", "--port", "80"]).is_err());
    }
}
