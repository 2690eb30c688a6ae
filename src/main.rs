//! Telegram cleanup CLI - main entry point
//!
//! Deletes all direct messages and leaves all groups and channels of the
//! logged-in account.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tg_cleanup::commands::{self, CleanupArgs};
use tg_cleanup::Config;

#[derive(Parser)]
#[command(name = "tg_cleanup")]
#[command(about = "Delete all Telegram DMs and leave all groups and channels", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML config file (defaults to ./config.yml, then ../config.yml)
    #[arg(long, env = "TG_CLEANUP_CONFIG")]
    config_file: Option<PathBuf>,

    /// Where API credentials are saved
    #[arg(long)]
    credentials_file: Option<PathBuf>,

    /// Session name; the session is stored in <name>.session
    #[arg(long)]
    session_name: Option<String>,

    /// Phone number with country code, used when a login is needed
    #[arg(long)]
    phone: Option<String>,

    /// Direct messages processed concurrently per batch
    #[arg(long)]
    dm_batch_size: Option<usize>,

    /// Groups and channels processed concurrently per batch
    #[arg(long)]
    group_batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    #[arg(long)]
    batch_pause_ms: Option<u64>,

    /// Reuse saved credentials instead of prompting for them
    #[arg(long, default_value_t = false)]
    reuse_credentials: bool,

    /// Only list the dialogs that would be processed
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => Config::load_from_file(path)?,
            None => Config::new(),
        };

        if let Some(path) = &self.credentials_file {
            config.credentials_file = path.clone();
        }
        if let Some(name) = &self.session_name {
            config.session_name = name.clone();
            config.lock_file = format!("{}.lock", name);
        }
        if let Some(phone) = &self.phone {
            config.phone = Some(phone.clone());
        }
        if let Some(size) = self.dm_batch_size {
            config.dm_batch_size = size;
        }
        if let Some(size) = self.group_batch_size {
            config.group_batch_size = size;
        }
        if let Some(ms) = self.batch_pause_ms {
            config.batch_pause = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("tg_cleanup=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let args = CleanupArgs {
        reuse_credentials: cli.reuse_credentials,
        dry_run: cli.dry_run,
    };

    println!("🚀 Starting Telegram clean-up...");
    commands::cleanup_run(&config, &args).await?;
    println!("\n✨ Clean-up completed! ✨");

    Ok(())
}
