//! API credential store
//!
//! Credentials are prompted on every run and written to a JSON file. A failed
//! write is logged and otherwise ignored; the run continues with the values
//! that were typed in.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Telegram API credentials as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_id: String,
    pub api_hash: String,
}

impl Credentials {
    pub fn new(api_id: impl Into<String>, api_hash: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            api_hash: api_hash.into(),
        }
    }

    /// Numeric API id as required by the sender pool.
    pub fn api_id_number(&self) -> Result<i32> {
        self.api_id.trim().parse::<i32>().map_err(|_| {
            Error::InvalidArgument(format!("API ID must be a number, got '{}'", self.api_id))
        })
    }

    /// Read credentials from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite the file with these credentials.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Prompt on stdin/stdout, then persist to `path`.
pub fn get_credentials(path: &Path) -> Result<Credentials> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt_and_save(&mut stdin.lock(), &mut stdout, path)
}

/// Like [`get_credentials`], but reuse a readable saved file when present.
pub fn get_or_reuse_credentials(path: &Path) -> Result<Credentials> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    reuse_or_prompt(&mut stdin.lock(), &mut stdout, path)
}

/// Load `path` if it holds valid credentials, otherwise prompt and save.
pub fn reuse_or_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    path: &Path,
) -> Result<Credentials> {
    match Credentials::load(path) {
        Ok(saved) => {
            debug!(path = %path.display(), "Reusing saved credentials");
            Ok(saved)
        }
        Err(err) => {
            debug!(path = %path.display(), "No usable saved credentials: {}", err);
            prompt_and_save(input, output, path)
        }
    }
}

/// Ask for the API id and hash, then try to save them.
///
/// Only reading the answers can fail; save errors are logged and dropped.
pub fn prompt_and_save<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    path: &Path,
) -> Result<Credentials> {
    writeln!(output, "Please enter your Telegram API credentials.")?;
    let api_id = prompt_line(input, output, "API ID: ")?;
    let api_hash = prompt_line(input, output, "API Hash: ")?;

    let credentials = Credentials::new(api_id, api_hash);
    if let Err(err) = credentials.save(path) {
        error!(path = %path.display(), "Error saving config file: {}", err);
    }

    Ok(credentials)
}

/// Print `label`, read one line and return it trimmed.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
