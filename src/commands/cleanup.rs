//! Cleanup command: log in, list every dialog, erase DMs and leave groups.

use std::io;
use std::time::Instant;

use grammers_client::SignInError;
use tracing::{error, info};

use crate::cleanup::{self, render_summary, BatchSettings, CleanupTotals};
use crate::client::SessionClient;
use crate::config::Config;
use crate::credentials::{self, prompt_line, Credentials};
use crate::entity::Dialog;
use crate::error::{Error, Result};
use crate::session::{open_session, SessionLock, TelegramClient};

/// Options that change how the run behaves.
#[derive(Debug, Clone, Default)]
pub struct CleanupArgs {
    /// Reuse the saved credential file instead of prompting every time.
    pub reuse_credentials: bool,
    /// List what would be processed and stop.
    pub dry_run: bool,
}

/// Run the whole cleanup. Any error is logged here before it is returned.
pub async fn run(config: &Config, args: &CleanupArgs) -> Result<CleanupTotals> {
    let result = start(config, args).await;
    if let Err(ref err) = result {
        error!("❌ An error occurred: {}", err);
    }
    result
}

async fn start(config: &Config, args: &CleanupArgs) -> Result<CleanupTotals> {
    let started = Instant::now();

    println!("\n🧹 TELEGRAM CLEANUP TOOL 🧹");
    println!("----------------------------");

    let credentials = if args.reuse_credentials {
        credentials::get_or_reuse_credentials(&config.credentials_file)?
    } else {
        credentials::get_credentials(&config.credentials_file)?
    };
    let api_id = credentials.api_id_number()?;

    // Acquire session lock
    let _lock = SessionLock::acquire(&config.lock_file)?;
    let session = open_session(&config.session_file())?;

    println!("\n📲 Connecting to Telegram...");
    let mut client = TelegramClient::connect(session, api_id).await?;

    let result = match authorize(&client, config, &credentials).await {
        Ok(()) => {
            println!("✅ Logged in successfully!");
            clean(&client, config, args, started).await
        }
        Err(err) => Err(err),
    };

    finish(&mut client, result).await
}

/// List the dialogs and process them, or only print them on a dry run.
pub async fn clean<C: SessionClient>(
    client: &C,
    config: &Config,
    args: &CleanupArgs,
    started: Instant,
) -> Result<CleanupTotals> {
    println!("\n📚 Fetching all conversations...");
    let dialogs = client.list_dialogs().await?;
    println!("📊 Found {} total conversations", dialogs.len());
    info!(dialogs = dialogs.len(), "Dialogs fetched");

    if args.dry_run {
        print_plan(&dialogs);
        return Ok(CleanupTotals::default());
    }

    let settings = BatchSettings::from(config);
    let totals = cleanup::run(client, dialogs, &settings).await;

    println!("{}", render_summary(&totals, started.elapsed()));
    Ok(totals)
}

/// Disconnect regardless of `result`, then hand it back.
pub async fn finish<C: SessionClient, T>(client: &mut C, result: Result<T>) -> Result<T> {
    client.disconnect().await;
    println!("\n👋 Disconnected from Telegram");
    result
}

/// Log in interactively unless the session is already authorized.
async fn authorize(client: &TelegramClient, config: &Config, credentials: &Credentials) -> Result<()> {
    if client.is_authorized().await? {
        return Ok(());
    }

    println!("⚠️ You need to log in first!");
    let phone = match &config.phone {
        Some(phone) => phone.clone(),
        None => ask("Enter your phone number with country code: ")?,
    };

    let token = client
        .request_login_code(&phone, &credentials.api_hash)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

    let code = ask("Enter the code you received: ")?;

    match client.sign_in(&token, &code).await {
        Ok(_) => Ok(()),
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none").to_string();
            let password = ask(&format!("Enter your 2FA password (hint: {}): ", hint))?;
            client
                .check_password(password_token, password.trim())
                .await
                .map_err(|e| Error::TelegramError(format!("Failed to check password: {}", e)))?;
            Ok(())
        }
        Err(e) => Err(Error::TelegramError(format!("Failed to sign in: {}", e))),
    }
}

fn ask(label: &str) -> Result<String> {
    let answer = prompt_line(&mut io::stdin().lock(), &mut io::stdout(), label)?;
    if answer.is_empty() {
        return Err(Error::AuthorizationRequired);
    }
    Ok(answer)
}

fn print_plan<P>(dialogs: &[Dialog<P>]) {
    println!("\n🔎 Dry run, nothing will be deleted:");
    for dialog in dialogs {
        let label = dialog
            .kind
            .leave_kind()
            .map(|kind| kind.as_str())
            .unwrap_or("DM");
        println!("  - [{}] {}", label, dialog.name);
    }
}
