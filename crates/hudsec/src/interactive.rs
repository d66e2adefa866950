// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive mode: read one token per line and decrypt it immediately.

use std::io::{self, Write};

use hudsec_core::error::HudsecError;
use hudsec_crypto::ConfidentialityKey;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};

use crate::recover::{recover_token, Tally};

pub const PROMPT: &str = "Encrypted secret: ";

/// Source of input lines. `Ok(None)` ends the session.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, HudsecError>;
}

/// Terminal input through rustyline. Tokens are not added to history.
pub struct TerminalLines {
    editor: DefaultEditor,
}

impl TerminalLines {
    pub fn new() -> Result<Self, HudsecError> {
        let editor = DefaultEditor::new()
            .map_err(|e| HudsecError::Internal(format!("failed to initialize readline: {e}")))?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalLines {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, HudsecError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(HudsecError::Internal(format!("readline error: {e}"))),
        }
    }
}

/// Prompt for tokens until the source is exhausted.
///
/// Blank lines re-prompt without output. Every other line is decrypted and
/// its secret printed, including an empty line for an empty secret.
pub fn run<L: LineSource, W: Write, E: Write>(
    lines: &mut L,
    key: &ConfidentialityKey,
    out: &mut W,
    err: &mut E,
) -> Result<Tally, HudsecError> {
    let mut tally = Tally::default();

    while let Some(line) = lines.read_line(PROMPT)? {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        debug!(token_len = token.len(), "decrypting interactive input");

        let outcome = recover_token(token, key, true, out, err).map_err(io_error)?;
        tally.record(outcome);
        out.flush().map_err(io_error)?;
    }

    info!(
        recovered = tally.recovered,
        failed = tally.failed,
        "interactive session ended"
    );
    Ok(tally)
}

fn io_error(e: io::Error) -> HudsecError {
    HudsecError::Internal(format!("failed writing output: {e}"))
}
