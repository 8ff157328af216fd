use std::io::{self, BufRead, Write};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::pages::Confirm;

/// Asks on stderr and reads `s`/`si`/`y`/`yes` from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let question = format!("{} [s/N] ", prompt);
        match ask(question).await {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("could not read confirmation: {}", e);
                false
            }
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

/// Prints `question` to stderr and reads one line from stdin.
pub async fn ask(question: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", question)?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await
    .context("prompt task failed")?
}

/// Reads a JSON document from stdin (the body of a create/update form).
pub async fn read_stdin_json() -> anyhow::Result<Value> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("failed to read JSON from stdin")?;

    if raw.trim().is_empty() {
        anyhow::bail!("expected a JSON object on stdin");
    }
    serde_json::from_str(&raw).context("stdin is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_spanish_and_english_yes() {
        for answer in ["s", "Si", "sí\n", " y ", "YES"] {
            assert!(is_yes(answer), "{answer}");
        }
        for answer in ["", "n", "no", "nope"] {
            assert!(!is_yes(answer), "{answer}");
        }
    }
}
