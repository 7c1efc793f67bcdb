//! PostgreSQL identifier quoting for generated SQL.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest identifier PostgreSQL keeps without truncation (NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("Identifier cannot be empty")]
    Empty,
    #[error("Identifier is too long ({len} characters, maximum is 63)")]
    TooLong { len: usize },
    #[error("Identifier contains a null character")]
    NullCharacter,
}

/// Anything that can be escaped by its display label.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for str {
    fn label(&self) -> &str {
        self
    }
}

impl Labeled for String {
    fn label(&self) -> &str {
        self
    }
}

impl<T: Labeled + ?Sized> Labeled for &T {
    fn label(&self) -> &str {
        (**self).label()
    }
}

/// A table, optionally qualified by database and schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub label: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl TableRef {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

impl Labeled for TableRef {
    fn label(&self) -> &str {
        &self.label
    }
}

impl From<&str> for TableRef {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A column as shown in the explorer: name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub label: String,
    pub data_type: String,
}

impl ColumnRef {
    pub fn new(label: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_type: data_type.into(),
        }
    }
}

impl Labeled for ColumnRef {
    fn label(&self) -> &str {
        &self.label
    }
}

fn needs_quoting(name: &str) -> bool {
    name.chars()
        .any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
}

/// Escape an identifier, quoting it only when it holds anything outside `[a-z0-9_]`.
pub fn escape_identifier<L: Labeled + ?Sized>(item: &L) -> Result<String, EscapeError> {
    let name = item.label();

    if name.is_empty() {
        return Err(EscapeError::Empty);
    }
    let len = name.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(EscapeError::TooLong { len });
    }
    if name.contains('\0') {
        return Err(EscapeError::NullCharacter);
    }

    if needs_quoting(name) {
        Ok(format!("\"{}\"", name.replace('"', "\"\"")))
    } else {
        Ok(name.to_string())
    }
}

/// Escape a possibly qualified table name as `database.schema.table`.
pub fn escape_table_name(table: &TableRef) -> Result<String, EscapeError> {
    let mut parts = Vec::with_capacity(3);
    if let Some(database) = table.database.as_deref().filter(|d| !d.is_empty()) {
        parts.push(escape_identifier(database)?);
    }
    if let Some(schema) = table.schema.as_deref().filter(|s| !s.is_empty()) {
        parts.push(escape_identifier(schema)?);
    }
    parts.push(escape_identifier(table)?);

    Ok(parts.join("."))
}

/// Build an INSERT statement with one editor placeholder per column.
pub fn insert_snippet(table: &TableRef, columns: &[ColumnRef]) -> Result<String, EscapeError> {
    let table_name = escape_table_name(table)?;
    let column_names = columns
        .iter()
        .map(|col| escape_identifier(col))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    let placeholders = columns
        .iter()
        .enumerate()
        .map(|(index, col)| format!("'${{{}:{}:{}}}'", index + 1, col.label, col.data_type))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table_name, column_names, placeholders
    ))
}
