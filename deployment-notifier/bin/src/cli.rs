use std::{io, io::Write, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use snafu::ResultExt;

use crate::{
    command::{self, RunOptions},
    config::Config,
    error::{self, Result},
    shadow,
};

#[derive(Debug, Parser)]
#[command(author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about,
    long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long = "config",
        short = 'c',
        env = "DEPLOYMENT_NOTIFIER_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completion { shell: Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Handle one deployment event and mail its notification")]
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(
        long = "inputs",
        short = 'i',
        default_value = "-",
        help = "Invocation inputs as JSON, `-` reads them from stdin"
    )]
    inputs: PathBuf,

    #[arg(long = "dry-run", help = "Gather and render the notification without mailing it")]
    dry_run: bool,

    #[arg(long = "html-output", help = "Also write the rendered email body to this file")]
    html_output: Option<PathBuf>,

    #[arg(long = "log-filters", help = "Override the configured log filter directives")]
    log_filters: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<(), Box<error::Error>> {
        match self.command {
            Command::Version => {
                io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .context(error::WriteStdoutSnafu)?;
            }
            Command::Completion { shell } => {
                let mut command = Self::command();
                let bin_name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, bin_name, &mut io::stdout());
            }
            Command::DefaultConfig => {
                let config_text = serde_yaml::to_string(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                io::stdout().write_all(config_text.as_bytes()).context(error::WriteStdoutSnafu)?;
            }
            Command::Run(RunArgs { inputs, dry_run, html_output, log_filters }) => {
                let mut config = Self::load_config(self.config_file_path)?;
                if let Some(log_filters) = log_filters {
                    config.log = config.log.with_log_filters(log_filters);
                }
                command::run(config, RunOptions { inputs, dry_run, html_output })?;
            }
        }

        Ok(())
    }

    fn load_config(config_file_path: Option<PathBuf>) -> Result<Config> {
        match config_file_path {
            Some(path) => Ok(Config::load(path)?),
            None => Ok(Config::discover(Config::search_paths())?),
        }
    }
}
