//! Lexical splitting of multi-statement SQL scripts.
//!
//! The scanner walks the script one code point at a time and only treats the
//! delimiter as a statement boundary outside string literals, comments and
//! dollar-quoted bodies. It never fails: an unterminated construct protects
//! everything up to the end of the script.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default statement delimiter
pub const DEFAULT_DELIMITER: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelimiterError {
    #[error("Statement delimiter cannot be empty")]
    Empty,
    #[error("Statement delimiter cannot contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Statement delimiter, compared case-insensitively against the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delimiter {
    text: String,
    chars: Vec<char>,
}

impl Delimiter {
    pub fn new(text: impl Into<String>) -> Result<Self, DelimiterError> {
        let text = text.into();
        if text.is_empty() {
            return Err(DelimiterError::Empty);
        }
        if text.chars().any(char::is_whitespace) {
            return Err(DelimiterError::Whitespace(text));
        }

        let chars = text.chars().collect();
        Ok(Self { text, chars })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of code points the delimiter spans
    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    fn matches_at(&self, chars: &[(usize, char)], index: usize) -> bool {
        let Some(window) = chars.get(index..index + self.chars.len()) else {
            return false;
        };

        window
            .iter()
            .zip(&self.chars)
            .all(|((_, c), d)| c.to_lowercase().eq(d.to_lowercase()))
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self {
            text: DEFAULT_DELIMITER.to_string(),
            chars: vec![';'],
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = DelimiterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Delimiter> for String {
    fn from(value: Delimiter) -> Self {
        value.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    /// `# ` up to end of line
    Hash,
    /// `--` up to end of line
    DoubleDash,
    /// `/* ... */`
    Block,
}

impl CommentKind {
    fn opening(c: char, next: Option<char>) -> Option<Self> {
        match (c, next) {
            ('#', Some(' ')) => Some(Self::Hash),
            ('-', Some('-')) => Some(Self::DoubleDash),
            ('/', Some('*')) => Some(Self::Block),
            _ => None,
        }
    }

    /// Whether `c` (followed by `next`) ends a comment of this kind.
    fn closes_at(self, c: char, next: Option<char>) -> bool {
        match self {
            Self::Hash | Self::DoubleDash => c == '\n',
            Self::Block => c == '*' && next == Some('/'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Normal,
    InString(char),
    InComment(CommentKind),
}

/// Matches `$[a-zA-Z]*$` at the start of `chars`, returning its length.
fn dollar_tag_len(chars: &[(usize, char)]) -> Option<usize> {
    let (_, '$') = chars.first()? else {
        return None;
    };

    let body = chars[1..]
        .iter()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .count();

    match chars.get(body + 1) {
        Some((_, '$')) => Some(body + 2),
        _ => None,
    }
}

fn tag_text(chars: &[(usize, char)]) -> String {
    chars.iter().map(|(_, c)| *c).collect()
}

/// Splits SQL scripts into statements on a configurable delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementSplitter {
    delimiter: Delimiter,
}

impl StatementSplitter {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Split `script` into trimmed, non-empty statements in source order.
    ///
    /// Each statement keeps its trailing delimiter. A piece holding nothing but
    /// the delimiter (as produced by `;;`) is dropped.
    pub fn split(&self, script: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = script.char_indices().collect();
        let mut statements = Vec::new();
        let mut start = 0;

        loop {
            let rest = &chars[start..];
            let rest_offset = rest.first().map(|(offset, _)| *offset).unwrap_or(script.len());

            let Some(cut) = self.find_boundary(rest) else {
                self.push_statement(&mut statements, &script[rest_offset..]);
                break;
            };

            let end = chars
                .get(start + cut)
                .map(|(offset, _)| *offset)
                .unwrap_or(script.len());
            self.push_statement(&mut statements, &script[rest_offset..end]);

            start += cut;
            if script[end..].trim().is_empty() {
                break;
            }
        }

        tracing::debug!(
            "Split script of {} bytes into {} statement(s)",
            script.len(),
            statements.len()
        );

        statements
    }

    /// Split an optional script; absent input yields no statements.
    pub fn split_optional(&self, script: Option<&str>) -> Vec<String> {
        script.map(|s| self.split(s)).unwrap_or_default()
    }

    fn push_statement(&self, statements: &mut Vec<String>, piece: &str) {
        let statement = piece.trim();
        let body = statement
            .get(..statement.len().saturating_sub(self.delimiter.as_str().len()))
            .filter(|_| self.ends_with_delimiter(statement))
            .unwrap_or(statement);

        if !body.trim().is_empty() {
            statements.push(statement.to_string());
        }
    }

    fn ends_with_delimiter(&self, statement: &str) -> bool {
        let chars: Vec<(usize, char)> = statement.char_indices().collect();
        chars.len() >= self.delimiter.char_len()
            && self
                .delimiter
                .matches_at(&chars, chars.len() - self.delimiter.char_len())
    }

    /// Index just past the first unprotected delimiter in `chars`, if any.
    fn find_boundary(&self, chars: &[(usize, char)]) -> Option<usize> {
        let mut mode = ScanMode::Normal;
        let mut open_tag: Option<String> = None;
        let mut index = 0;

        while index < chars.len() {
            let c = chars[index].1;
            let previous = index.checked_sub(1).map(|i| chars[i].1);
            let next = chars.get(index + 1).map(|(_, c)| *c);

            match mode {
                ScanMode::InString(quote) => {
                    if c == quote && previous != Some('\\') {
                        mode = ScanMode::Normal;
                    }
                    index += 1;
                }
                ScanMode::InComment(kind) => {
                    // A nested opener takes over the comment, so `--` inside
                    // `/* */` leaves only a newline to end it.
                    if let Some(reopened) = CommentKind::opening(c, next) {
                        mode = ScanMode::InComment(reopened);
                    } else if kind.closes_at(c, next) {
                        mode = ScanMode::Normal;
                    }
                    index += 1;
                }
                ScanMode::Normal => {
                    if (c == '\'' || c == '"') && previous != Some('\\') {
                        mode = ScanMode::InString(c);
                        index += 1;
                        continue;
                    }

                    if let Some(kind) = CommentKind::opening(c, next) {
                        mode = ScanMode::InComment(kind);
                        index += 1;
                        continue;
                    }

                    // Every `$` is tried as a tag start, including the ones
                    // inside a tag just matched.
                    if let Some(len) = dollar_tag_len(&chars[index..]) {
                        let tag = tag_text(&chars[index..index + len]);
                        let closes = open_tag.as_deref() == Some(tag.as_str());
                        if open_tag.is_none() {
                            open_tag = Some(tag);
                        } else if closes {
                            open_tag = None;
                        }
                    }

                    if open_tag.is_none() && self.delimiter.matches_at(chars, index) {
                        return Some(index + self.delimiter.char_len());
                    }

                    index += 1;
                }
            }
        }

        if mode != ScanMode::Normal || open_tag.is_some() {
            tracing::debug!(
                "Script ends inside {:?} (open tag: {:?}), keeping remainder as one statement",
                mode,
                open_tag
            );
        }

        None
    }
}

/// Split `script` on the default `;` delimiter.
pub fn split_statements(script: &str) -> Vec<String> {
    StatementSplitter::default().split(script)
}
