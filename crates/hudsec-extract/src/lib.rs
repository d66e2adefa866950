// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate secret extraction from server configuration documents.
//!
//! Two complementary mechanisms:
//! 1. **Known tags**: `<tag>{...}</tag>` or `<tag>...</tag>` for every
//!    configured field name (new format wraps the value in braces, old
//!    format stores it bare).
//! 2. **Generic**: any `>{base64}</` element body, to catch fields whose
//!    names are not in the tag list.
//!
//! Results are merged into a set. Extraction is permissive on purpose; the
//! codec decides which candidates are real secrets.

use std::collections::BTreeSet;
use std::sync::LazyLock;

pub use hudsec_core::DEFAULT_FIELD_TAGS;

use hudsec_core::HudsecError;
use regex::Regex;
use tracing::debug;

/// Brace-wrapped base64 element body under any tag name.
static GENERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\{([A-Za-z0-9+/=]*)\}</").unwrap());

/// Scans documents for encrypted secret tokens.
///
/// Patterns are compiled once in [`TokenExtractor::new`]; [`extract`] only
/// reads the document.
///
/// [`extract`]: TokenExtractor::extract
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    tags: Vec<String>,
    patterns: Vec<Regex>,
}

impl TokenExtractor {
    /// Compile one pattern per tag. Duplicate tags are collapsed.
    ///
    /// Tags must be non-empty and free of whitespace and markup characters.
    pub fn new<I, S>(tags: I) -> Result<Self, HudsecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut unique = Vec::new();
        let mut patterns = Vec::new();

        for tag in tags {
            let tag = tag.as_ref();
            validate_tag(tag)?;
            if !seen.insert(tag.to_string()) {
                continue;
            }

            let escaped = regex::escape(tag);
            let pattern = Regex::new(&format!(r"<{escaped}>\{{?(.*?)\}}?</{escaped}>"))
                .map_err(|e| HudsecError::Config(format!("field tag `{tag}`: {e}")))?;
            unique.push(tag.to_string());
            patterns.push(pattern);
        }

        Ok(Self {
            tags: unique,
            patterns,
        })
    }

    /// Extractor over [`DEFAULT_FIELD_TAGS`].
    pub fn with_default_tags() -> Self {
        Self::new(DEFAULT_FIELD_TAGS).unwrap()
    }

    /// The tags this extractor looks for, in configuration order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Every distinct non-empty candidate token in `document`.
    pub fn extract(&self, document: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();

        for pattern in self.patterns.iter().chain(std::iter::once(&*GENERIC_PATTERN)) {
            for caps in pattern.captures_iter(document) {
                if let Some(m) = caps.get(1)
                    && !m.as_str().is_empty()
                {
                    tokens.insert(m.as_str().to_string());
                }
            }
        }

        debug!(
            tags = self.tags.len(),
            candidates = tokens.len(),
            "extracted candidate tokens"
        );
        tokens
    }
}

fn validate_tag(tag: &str) -> Result<(), HudsecError> {
    if tag.is_empty() {
        return Err(HudsecError::Config("field tag must not be empty".to_string()));
    }
    if let Some(c) = tag
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/'))
    {
        return Err(HudsecError::Config(format!(
            "field tag `{tag}` contains invalid character {c:?}"
        )));
    }
    Ok(())
}
