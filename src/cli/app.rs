// ABOUTME: Main application orchestration for the taskflow CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::{anyhow, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use super::commands::{self, RunOptions};
use super::{Args, Commands, Config};

/// Name, version and description shown by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: "A declarative task automation tool for developers and ops teams",
        }
    }
}

pub struct App {
    config: Config,
    info: AppInfo,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, info: AppInfo) -> Self {
        Self { config, info }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration. Logs go to stderr so the
    /// summary on stdout stays clean.
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(!no_color)
            .with_target(false);

        let installed = match self.config.logging.format.as_str() {
            "compact" => builder.compact().try_init(),
            "json" => builder.json().try_init(),
            _ => builder.pretty().try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args, cancel: CancellationToken) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting {} v{}", self.info.name, self.info.version);
        debug!("Configuration loaded from: {:?}", args.config);

        match args.command {
            Commands::Run {
                workflow,
                vars,
                dry_run,
                output,
                max_concurrent,
            } => {
                let options = RunOptions {
                    workflow,
                    variables: Args::parse_variables(&vars)?,
                    dry_run,
                    output,
                    max_concurrent: max_concurrent.unwrap_or(self.config.max_concurrent_tasks),
                };
                commands::run_workflow(options, &self.config, cancel).await
            }

            Commands::Validate { workflow } => commands::validate_workflow(workflow).await,
        }
    }

    /// Create application from command line arguments
    pub fn from_args(info: AppInfo) -> Result<(Self, Args)> {
        let args = Args::parse_with(&info);
        let config = Config::load(args.config.clone())?;
        Ok((Self::new(config, info), args))
    }
}

/// Cancel the token on the first Ctrl-C
pub fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling running tasks");
            cancel.cancel();
        }
    });
}
