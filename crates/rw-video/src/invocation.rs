//! Raw directive input.
//!
//! A [`DirectiveInvocation`] is what the host hands to a directive: the
//! bracketed argument, the option bag from `{...}`, and any body lines.

use std::collections::BTreeMap;

use crate::VideoError;

/// Raw option value as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare word in the attribute list: `{controls loop}`.
    Flag,
    /// `key=value`, `key="value"` or `key='value'`.
    Value(String),
}

impl OptionValue {
    /// String value, or `None` for a flag.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Value(v) => Some(v.as_str()),
        }
    }
}

/// One occurrence of a directive in document source.
///
/// # Example
///
/// ```
/// use rw_video::{DirectiveInvocation, OptionValue};
///
/// let inv = DirectiveInvocation::parse("youtube", "anwy2MPT5RE", r#"#intro width=560 align="center""#, 3).unwrap();
/// assert_eq!(inv.argument, "anwy2MPT5RE");
/// assert_eq!(inv.get("divid"), Some("intro"));
/// assert_eq!(inv.get("width"), Some("560"));
/// assert_eq!(inv.line, 3);
///
/// let inv = DirectiveInvocation::parse("video", "d1", "controls thumb=_static/t.png", 1).unwrap();
/// assert_eq!(inv.option("controls"), Some(&OptionValue::Flag));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveInvocation {
    /// Directive name (`video`, `youtube`, `vimeo`).
    pub name: String,
    /// Required argument from brackets: `[argument]` (empty if absent).
    pub argument: String,
    /// Options from braces, keyed by name.
    pub options: BTreeMap<String, OptionValue>,
    /// Body lines of a container directive.
    pub content: Vec<String>,
    /// Line of the directive in the source document (1-indexed).
    pub line: usize,
}

impl DirectiveInvocation {
    /// Create an invocation with no options or content.
    #[must_use]
    pub fn new(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: argument.into(),
            ..Default::default()
        }
    }

    /// Parse the argument and the attribute string (without braces).
    ///
    /// `#id` is stored as the `divid` option and `.class` entries are dropped.
    /// A quoted value without its closing quote is an
    /// [`InvalidOption`](VideoError::InvalidOption).
    pub fn parse(
        name: &str,
        argument: &str,
        attrs_str: &str,
        line: usize,
    ) -> Result<Self, VideoError> {
        let mut inv = Self {
            name: name.to_owned(),
            argument: argument.trim().to_owned(),
            line,
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();
            if remaining.is_empty() {
                break;
            }

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = word_end(rest);
                inv.options
                    .insert("divid".to_owned(), OptionValue::Value(rest[..end].to_owned()));
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                remaining = &rest[word_end(rest)..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining)? {
                inv.options
                    .insert(key.to_owned(), OptionValue::Value(value.to_owned()));
                remaining = rest;
            } else {
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                let word = &remaining[..end];
                if is_option_name(word) {
                    inv.options.insert(word.to_owned(), OptionValue::Flag);
                }
                remaining = &remaining[end..];
            }
        }

        Ok(inv)
    }

    /// Add an option, builder style.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options
            .insert(key.into(), OptionValue::Value(value.into()));
        self
    }

    /// Add a flag option, builder style.
    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.options.insert(key.into(), OptionValue::Flag);
        self
    }

    /// Add a content line, builder style.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.content.push(line.into());
        self
    }

    /// Raw option entry.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Option string value (`None` for absent keys and flags).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(OptionValue::as_str)
    }

    /// Whether the option key is present at all.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}

fn word_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

fn is_option_name(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse `key="value"`, `key='value'` or `key=value` from the front of `s`.
fn parse_key_value(s: &str) -> Result<Option<(&str, &str, &str)>, VideoError> {
    let word_len = s.find(char::is_whitespace).unwrap_or(s.len());
    let Some(eq_pos) = s[..word_len].find('=') else {
        return Ok(None);
    };
    let key = &s[..eq_pos];

    if !is_option_name(key) {
        return Ok(None);
    }

    let after_eq = &s[eq_pos + 1..];

    let Some(quote) = after_eq.chars().next().filter(|&c| c == '"' || c == '\'') else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        return Ok(Some((key, &after_eq[..end], &after_eq[end..])));
    };

    let quoted = &after_eq[1..];
    let end_quote = quoted
        .find(quote)
        .ok_or_else(|| VideoError::invalid_option(key, after_eq, "missing closing quote"))?;
    Ok(Some((key, &quoted[..end_quote], &quoted[end_quote + 1..])))
}
