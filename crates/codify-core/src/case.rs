//! Case-style conversion for wire keys.
//!
//! An identifier is split into lowercase tokens and re-joined in the
//! requested style.
//!
//! # Tokenization
//!
//! - `_` and `-` are boundaries and are dropped
//! - an uppercase letter directly after a lowercase letter starts a new token
//! - every token is lowercased before styling
//!
//! # Supported Styles
//!
//! | Tag | Example (`httpStatusCode`) |
//! |-----|----------------------------|
//! | `camelCase` | `httpStatusCode` |
//! | `flatCase` | `httpstatuscode` |
//! | `PascalCase` | `HttpStatusCode` |
//! | `UPPERCASE` | `HTTPSTATUSCODE` |
//! | `snake_case` | `http_status_code` |
//! | `camel_Snake_Case` | `http_Status_Code` |
//! | `Pascal_Snake_Case` | `Http_Status_Code` |
//! | `SCREAMING_SNAKE_CASE` | `HTTP_STATUS_CODE` |
//! | `kebab-case` | `http-status-code` |
//! | `camel-Kebab-Case` | `http-Status-Code` |
//! | `Pascal-Kebab-Case` | `Http-Status-Code` |
//! | `SCREAMING-KEBAB-CASE` | `HTTP-STATUS-CODE` |
//! | `noChange` | `httpStatusCode` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A key naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CaseStyle {
    Camel,
    Flat,
    Pascal,
    Upper,
    Snake,
    CamelSnake,
    PascalSnake,
    ScreamingSnake,
    Kebab,
    CamelKebab,
    PascalKebab,
    ScreamingKebab,
    NoChange,
}

/// Error returned when a tag does not name a [`CaseStyle`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown case style `{0}`")]
pub struct UnknownCaseStyle(pub String);

/// How individual tokens are capitalized.
#[derive(Clone, Copy)]
enum Casing {
    Lower,
    Upper,
    Capitalized,
    /// First token lowercase, the rest capitalized
    Camel,
}

impl CaseStyle {
    /// Every style, in tag-table order
    pub const ALL: [CaseStyle; 13] = [
        CaseStyle::Camel,
        CaseStyle::Flat,
        CaseStyle::Pascal,
        CaseStyle::Upper,
        CaseStyle::Snake,
        CaseStyle::CamelSnake,
        CaseStyle::PascalSnake,
        CaseStyle::ScreamingSnake,
        CaseStyle::Kebab,
        CaseStyle::CamelKebab,
        CaseStyle::PascalKebab,
        CaseStyle::ScreamingKebab,
        CaseStyle::NoChange,
    ];

    /// The attribute tag for this style (e.g. `"snake_case"`)
    pub const fn tag(self) -> &'static str {
        match self {
            CaseStyle::Camel => "camelCase",
            CaseStyle::Flat => "flatCase",
            CaseStyle::Pascal => "PascalCase",
            CaseStyle::Upper => "UPPERCASE",
            CaseStyle::Snake => "snake_case",
            CaseStyle::CamelSnake => "camel_Snake_Case",
            CaseStyle::PascalSnake => "Pascal_Snake_Case",
            CaseStyle::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            CaseStyle::Kebab => "kebab-case",
            CaseStyle::CamelKebab => "camel-Kebab-Case",
            CaseStyle::PascalKebab => "Pascal-Kebab-Case",
            CaseStyle::ScreamingKebab => "SCREAMING-KEBAB-CASE",
            CaseStyle::NoChange => "noChange",
        }
    }

    /// Comma-separated list of every accepted tag, for hints
    pub fn all_tags() -> String {
        Self::ALL
            .iter()
            .map(|style| style.tag())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn layout(self) -> Option<(&'static str, Casing)> {
        let layout = match self {
            CaseStyle::Camel => ("", Casing::Camel),
            CaseStyle::Flat => ("", Casing::Lower),
            CaseStyle::Pascal => ("", Casing::Capitalized),
            CaseStyle::Upper => ("", Casing::Upper),
            CaseStyle::Snake => ("_", Casing::Lower),
            CaseStyle::CamelSnake => ("_", Casing::Camel),
            CaseStyle::PascalSnake => ("_", Casing::Capitalized),
            CaseStyle::ScreamingSnake => ("_", Casing::Upper),
            CaseStyle::Kebab => ("-", Casing::Lower),
            CaseStyle::CamelKebab => ("-", Casing::Camel),
            CaseStyle::PascalKebab => ("-", Casing::Capitalized),
            CaseStyle::ScreamingKebab => ("-", Casing::Upper),
            CaseStyle::NoChange => return None,
        };
        Some(layout)
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CaseStyle {
    type Err = UnknownCaseStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStyle::ALL
            .into_iter()
            .find(|style| style.tag() == s)
            .ok_or_else(|| UnknownCaseStyle(s.to_string()))
    }
}

impl TryFrom<String> for CaseStyle {
    type Error = UnknownCaseStyle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CaseStyle> for String {
    fn from(style: CaseStyle) -> Self {
        style.tag().to_string()
    }
}

/// Apply `style` to `identifier`.
///
/// # Examples
///
/// ```
/// use codify_core::case::{transform, CaseStyle};
///
/// assert_eq!(transform("userName", CaseStyle::Snake), "user_name");
/// assert_eq!(transform("user_name_id", CaseStyle::Camel), "userNameId");
/// assert_eq!(transform("httpStatusCode", CaseStyle::Kebab), "http-status-code");
/// ```
pub fn transform(identifier: &str, style: CaseStyle) -> String {
    let Some((separator, casing)) = style.layout() else {
        return identifier.to_string();
    };

    tokenize(identifier)
        .iter()
        .enumerate()
        .map(|(index, token)| match casing {
            Casing::Lower => token.clone(),
            Casing::Upper => token.to_uppercase(),
            Casing::Capitalized => capitalize(token),
            Casing::Camel if index == 0 => token.clone(),
            Casing::Camel => capitalize(token),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split an identifier into lowercase tokens.
pub fn tokenize(identifier: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in identifier.chars() {
        if c == '_' || c == '-' {
            flush(&mut tokens, &mut current);
            previous = None;
            continue;
        }
        if c.is_uppercase() && previous.is_some_and(char::is_lowercase) {
            flush(&mut tokens, &mut current);
        }
        current.extend(c.to_lowercase());
        previous = Some(c);
    }
    flush(&mut tokens, &mut current);

    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Uppercase the first character of a token.
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
