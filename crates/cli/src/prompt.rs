//! Terminal prompts.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::warn;

use adala_client::Confirm;

/// Print `label` and read one trimmed line from stdin.
pub fn ask(label: &str) -> anyhow::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{label}: ").context("failed to write prompt")?;
    stdout.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Read a secret without echoing it. The value is returned exactly as
/// typed, surrounding spaces included.
pub fn ask_secret(label: &str) -> anyhow::Result<String> {
    rpassword::prompt_password(format!("{label}: ")).context("failed to read from the terminal")
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "نعم" | "ن"
    )
}

/// Asks on the terminal; anything but an explicit yes declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        match ask(&format!("{message} [y/N]")) {
            Ok(answer) => is_yes(&answer),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "could not read confirmation");
                false
            }
        }
    }
}

/// `--yes`: every prompt is accepted.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
