//! Localized captions with `{{variable}}` placeholders.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Languages tried, in order, when the requested one has no text.
const FALLBACK_LANGUAGES: &[&str] = &["af", "en"];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap());

/// Caption text keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caption(BTreeMap<String, String>);

impl Caption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(language, text)` pairs.
    pub fn localized<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(lang, text)| (lang.to_string(), text.to_string()))
                .collect(),
        )
    }

    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(language.into(), text.into());
        self
    }

    /// Raw text for `language`, falling back to `af`, `en`, then any entry.
    pub fn text(&self, language: &str) -> &str {
        std::iter::once(language)
            .chain(FALLBACK_LANGUAGES.iter().copied())
            .find_map(|lang| self.0.get(lang))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Text with placeholders filled from session variables. Unset
    /// variables render as empty text.
    pub fn render(&self, language: &str, session: &Session) -> String {
        fill(self.text(language), |name| {
            session.value(name).map(|v| v.to_string())
        })
    }

    /// Text with placeholders filled from an explicit parameter map.
    pub fn render_params(&self, language: &str, params: &BTreeMap<&str, String>) -> String {
        fill(self.text(language), |name| params.get(name).cloned())
    }
}

fn fill(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}
