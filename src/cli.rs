use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::{
    commands::{ClearCommand, CompletionsCommand, EnvCommand},
    config::Settings,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "aws-switchrole", version, about = "Set AWS credentials from a CLI profile, caching the session between runs", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "AWS_SWITCHROLE_PROFILE",
        default_value = "default",
        help = "AWS CLI profile name"
    )]
    pub profile: String,

    #[arg(
        long,
        global = true,
        env = "AWS_SWITCHROLE_CACHE_DIR",
        value_name = "DIR",
        help = "Directory holding cached sessions [default: ~/.aws/cli/cache]"
    )]
    pub cache_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "AWS_SWITCHROLE_EXPIRY_WINDOW",
        value_name = "SECS",
        help = "Refresh cached sessions that expire within this many seconds [default: 60]"
    )]
    pub expiry_window: Option<u64>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Print credentials for the profile, refreshing the cache if needed")]
    Env(EnvCommand),
    #[command(about = "Delete the cached session for the profile")]
    Clear(ClearCommand),
    #[command(about = "Generate shell completion scripts for aws-switchrole")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let command = self
            .command
            .unwrap_or(Commands::Env(EnvCommand::default()));

        let settings = || Settings::resolve(self.cache_dir.clone(), self.expiry_window);

        match command {
            Commands::Env(cmd) => cmd.execute(&self.profile, &settings()?).await,
            Commands::Clear(cmd) => cmd.execute(&self.profile, &settings()?).await,
            Commands::Completions(cmd) => {
                cmd.execute();
                Ok(())
            }
        }
    }
}
