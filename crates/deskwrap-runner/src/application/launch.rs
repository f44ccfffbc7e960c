//! The launch sequence: load → resolve → serve → present.

use std::path::PathBuf;

use deskwrap_core::{
    classify_target, serving_root, AppConfiguration, BundleNesting, ConfigError, ResolvedAddress,
    ServingMode,
};
use thiserror::Error;
use tracing::info;

use crate::domain::{ServerConfig, WindowSpec};
use crate::infrastructure::{
    load_config, LocalContentServer, PresentationError, PresentationHost, ServeError,
    ServerHandle,
};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Fatal startup failures.  Each one ends the process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The configuration record is missing or unparseable.
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(#[source] ConfigError),

    /// The local content server could not be started.
    #[error("local content server failed to start: {0}")]
    Serve(#[from] ServeError),

    /// The window could not be shown.
    #[error("presentation failed: {0}")]
    Presentation(#[from] PresentationError),
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Where to look for things at startup.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Path of the running executable.
    pub executable: PathBuf,
    /// Explicit configuration record; defaults to `config.json` beside the
    /// executable.
    pub config_path: Option<PathBuf>,
    /// Explicit serving root; defaults to the directory computed from the
    /// executable path and `nestings`.
    pub serve_root: Option<PathBuf>,
    /// Bundle layouts the executable may be packaged inside.
    pub nestings: &'static [BundleNesting],
    pub server: ServerConfig,
}

impl LaunchOptions {
    /// Defaults for `executable` on the current platform.
    pub fn for_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            config_path: None,
            serve_root: None,
            nestings: BundleNesting::for_current_platform(),
            server: ServerConfig::default(),
        }
    }

    /// The configuration record to load.
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| AppConfiguration::path_beside(&self.executable))
    }

    /// The directory local content is served from.
    pub fn serve_root(&self) -> PathBuf {
        self.serve_root
            .clone()
            .unwrap_or_else(|| serving_root(&self.executable, self.nestings))
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Everything needed to show the window, including the running server for
/// local content.
///
/// Dropping the plan stops the server.
#[derive(Debug)]
pub struct LaunchPlan {
    pub config: AppConfiguration,
    pub address: ResolvedAddress,
    server: Option<ServerHandle>,
}

impl LaunchPlan {
    /// The window to present for this plan.
    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec::new(&self.config, self.address.clone())
    }

    /// The local content server, or `None` for a remote target.
    pub fn server(&self) -> Option<&ServerHandle> {
        self.server.as_ref()
    }

    /// Shows the window on `host` and blocks until it is closed.
    ///
    /// The local content server stays up for the whole call and stops when
    /// it returns.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Presentation`] if the host fails.
    pub fn present<H>(self, host: &H) -> Result<(), LaunchError>
    where
        H: PresentationHost + ?Sized,
    {
        host.present(self.window_spec())?;
        if let Some(server) = &self.server {
            server.shutdown();
        }
        Ok(())
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// Loads the configuration record and resolves it into a [`LaunchPlan`].
///
/// For a local target this starts the content server, so it must run inside
/// a Tokio runtime that outlives the plan.
///
/// # Errors
///
/// - [`LaunchError::ConfigUnavailable`] if the record cannot be loaded.
/// - [`LaunchError::Serve`] if the local content server cannot start.
pub async fn prepare_launch(options: &LaunchOptions) -> Result<LaunchPlan, LaunchError> {
    let config_path = options.config_path();
    let config = load_config(&config_path)
        .await
        .map_err(LaunchError::ConfigUnavailable)?;
    info!(
        "loaded '{}' ({}x{}) from {}",
        config.title,
        config.width,
        config.height,
        config_path.display()
    );

    let (address, server) = resolve_address(&config, options).await?;
    Ok(LaunchPlan {
        config,
        address,
        server,
    })
}

/// Turns the configured target into the address the window navigates to.
///
/// Remote targets are passed through and no server is started.  Anything
/// else starts a local content server over the serving root.
///
/// # Errors
///
/// Returns [`ServeError`] if the local content server cannot start.
pub async fn resolve_address(
    config: &AppConfiguration,
    options: &LaunchOptions,
) -> Result<(ResolvedAddress, Option<ServerHandle>), ServeError> {
    match classify_target(&config.target) {
        ServingMode::Remote { address } => {
            info!("remote target; loading {address} directly");
            Ok((address, None))
        }
        ServingMode::Local { entry } => {
            let root = options.serve_root();
            info!(
                "local target '{}'; serving {}",
                config.target,
                root.display()
            );
            let server = LocalContentServer::start(&options.server, root, entry).await?;
            Ok((server.address().clone(), Some(server)))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
