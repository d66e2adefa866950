// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decrypting tokens and rendering the results.
//!
//! Recovered secrets go to `out` and every diagnostic goes to `err`, so that
//! stdout carries nothing but plaintext when the binary wires these to the
//! standard streams.

use std::io::{self, Write};

use colored::Colorize;
use hudsec_core::error::HudsecError;
use hudsec_crypto::{decrypt, ConfidentialityKey, DecryptedSecret};
use hudsec_extract::TokenExtractor;
use tracing::{debug, info, warn};

/// Result of processing one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A secret was printed.
    Recovered,
    /// Decryption produced no bytes and nothing was printed.
    Empty,
    /// The token could not be decoded or decrypted.
    Failed,
}

/// Counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub recovered: usize,
    pub empty: usize,
    pub failed: usize,
}

impl Tally {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Recovered => self.recovered += 1,
            Outcome::Empty => self.empty += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Extract every candidate token from `document` and print what decrypts.
///
/// Empty secrets are skipped. A token that fails is reported on `err` and the
/// remaining tokens are still processed.
pub fn recover_document<W: Write, E: Write>(
    document: &str,
    extractor: &TokenExtractor,
    key: &ConfidentialityKey,
    out: &mut W,
    err: &mut E,
) -> io::Result<Tally> {
    let tokens = extractor.extract(document);
    info!(tokens = tokens.len(), "extracted candidate tokens");

    let mut tally = Tally::default();
    for token in &tokens {
        tally.record(recover_token(token, key, false, out, err)?);
    }

    info!(
        recovered = tally.recovered,
        empty = tally.empty,
        failed = tally.failed,
        "document processed"
    );
    Ok(tally)
}

/// Decrypt a single token and print the secret or the failure.
///
/// With `print_empty` an empty secret is written as an empty line, which is
/// what an interactive user expects after submitting a token.
pub fn recover_token<W: Write, E: Write>(
    token: &str,
    key: &ConfidentialityKey,
    print_empty: bool,
    out: &mut W,
    err: &mut E,
) -> io::Result<Outcome> {
    match decrypt(token, key) {
        Ok(secret) if secret.is_empty() && !print_empty => {
            debug!(token_len = token.len(), "secret is empty, skipping");
            Ok(Outcome::Empty)
        }
        Ok(secret) => {
            render_secret(&secret, out, err)?;
            Ok(Outcome::Recovered)
        }
        Err(error) => {
            warn!(token_len = token.len(), error = %error, "token not recovered");
            report_failure(&error, err)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Print a secret verbatim, or as `hex:` when it is not UTF-8.
fn render_secret<W: Write, E: Write>(
    secret: &DecryptedSecret,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    match secret.as_utf8() {
        Ok(text) => writeln!(out, "{text}"),
        Err(utf8) => {
            writeln!(
                err,
                "{}: secret of {} bytes is not valid UTF-8 ({utf8}), printing as hex",
                "note".yellow(),
                secret.len()
            )?;
            writeln!(out, "hex:{}", hex::encode(secret.as_bytes()))
        }
    }
}

fn report_failure<E: Write>(error: &HudsecError, err: &mut E) -> io::Result<()> {
    writeln!(err, "{}: {error}", "error".red())?;

    if let HudsecError::TokenDecode { token, .. } = error {
        writeln!(
            err,
            "If your input was quite large and exceeded the terminal's 4096 char input limit \
             then you might want to increase it using stty -icanon"
        )?;
        writeln!(err, "{token}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hudsec_test_utils::{encrypt_new_format, encrypt_old_format};

    const KEY: [u8; 16] = *b"0123456789abcdef";
    const IV: [u8; 16] = [7u8; 16];

    fn key() -> ConfidentialityKey {
        ConfidentialityKey::from_bytes(KEY)
    }

    fn run_token(token: &str, print_empty: bool) -> (Outcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = recover_token(token, &key(), print_empty, &mut out, &mut err).unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn new_format_secret_is_printed_on_its_own_line() {
        let token = encrypt_new_format(&KEY, &IV, b"hunter2");
        let (outcome, out, err) = run_token(&token, false);
        assert_eq!(outcome, Outcome::Recovered);
        assert_eq!(out, "hunter2\n");
        assert!(err.is_empty());
    }

    #[test]
    fn old_format_secret_is_printed() {
        let token = encrypt_old_format(&KEY, b"hunter2");
        let (outcome, out, _) = run_token(&token, false);
        assert_eq!(outcome, Outcome::Recovered);
        assert_eq!(out, "hunter2\n");
    }

    #[test]
    fn empty_secret_is_skipped_in_batch() {
        let token = encrypt_new_format(&KEY, &IV, b"");
        let (outcome, out, _) = run_token(&token, false);
        assert_eq!(outcome, Outcome::Empty);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_secret_prints_blank_line_when_asked() {
        let token = encrypt_new_format(&KEY, &IV, b"");
        let (outcome, out, _) = run_token(&token, true);
        assert_eq!(outcome, Outcome::Recovered);
        assert_eq!(out, "\n");
    }

    #[test]
    fn non_utf8_secret_is_rendered_as_hex() {
        let token = encrypt_new_format(&KEY, &IV, &[0xff, 0xfe, 0x00, 0x41]);
        let (outcome, out, err) = run_token(&token, false);
        assert_eq!(outcome, Outcome::Recovered);
        assert_eq!(out, "hex:fffe0041\n");
        assert!(err.contains("not valid UTF-8"));
    }

    #[test]
    fn base64_failure_prints_note_and_token() {
        let (outcome, out, err) = run_token("not*base64", false);
        assert_eq!(outcome, Outcome::Failed);
        assert!(out.is_empty());
        assert!(err.contains("failed base64 decoding the input"));
        assert!(err.contains("stty -icanon"));
        assert!(err.lines().any(|l| l == "not*base64"));
    }

    #[test]
    fn decryption_failure_does_not_print_token_note() {
        // Decodes to a single zero byte: old format, not block aligned.
        let (outcome, out, err) = run_token("AA==", false);
        assert_eq!(outcome, Outcome::Failed);
        assert!(out.is_empty());
        assert!(!err.contains("stty"));
    }

    #[test]
    fn document_with_bad_token_keeps_going() {
        let good_a = encrypt_new_format(&KEY, &IV, b"alpha");
        let good_b = encrypt_old_format(&KEY, b"bravo");
        let document = format!(
            "<list>\
               <password>{{{good_a}}}</password>\
               <secret>{{AAAA}}</secret>\
               <passphrase>{good_b}</passphrase>\
             </list>"
        );

        let mut out = Vec::new();
        let mut err = Vec::new();
        let extractor = TokenExtractor::with_default_tags();
        let tally = recover_document(&document, &extractor, &key(), &mut out, &mut err).unwrap();

        let out = String::from_utf8(out).unwrap();
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, ["alpha", "bravo"]);
        assert_eq!(
            tally,
            Tally {
                recovered: 2,
                empty: 0,
                failed: 1
            }
        );
        assert!(!err.is_empty());
    }

    #[test]
    fn duplicate_tokens_are_printed_once() {
        let token = encrypt_new_format(&KEY, &IV, b"once");
        let document = format!(
            "<a><password>{{{token}}}</password><password>{{{token}}}</password></a>"
        );

        let mut out = Vec::new();
        let mut err = Vec::new();
        let extractor = TokenExtractor::with_default_tags();
        recover_document(&document, &extractor, &key(), &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "once\n");
    }
}
