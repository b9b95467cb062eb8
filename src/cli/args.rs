// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the run and validate subcommands

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use super::app::AppInfo;

#[derive(Parser, Debug)]
#[command(name = "taskflow")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workflow from a YAML file
    Run {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,

        #[arg(
            short = 'V',
            long = "var",
            help = "Override workflow variables (key=value)"
        )]
        vars: Vec<String>,

        #[arg(long, help = "Show the execution plan without running any task")]
        dry_run: bool,

        #[arg(short, long, help = "Write the run report to this file (.json or .yaml)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Maximum number of parallel tasks running at once")]
        max_concurrent: Option<usize>,
    },

    /// Check a workflow file without executing it
    Validate {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,
    },
}

impl Args {
    /// Parse the process arguments, with name, version and about text taken from `info`
    pub fn parse_with(info: &AppInfo) -> Self {
        let matches = Self::command_with(info).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Parse an explicit argument list
    pub fn try_parse_with<I, T>(info: &AppInfo, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command_with(info).try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    fn command_with(info: &AppInfo) -> clap::Command {
        Self::command()
            .version(info.version)
            .about(info.description)
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> Result<HashMap<String, String>> {
        let mut variables = HashMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                variables.insert(key.to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
