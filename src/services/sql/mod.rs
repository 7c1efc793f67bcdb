//! SQL text support module.
//!
//! This module provides:
//! - `splitter` - lexical splitting of scripts into statements
//! - `escape` - identifier quoting for generated SQL

mod escape;
mod splitter;

pub use escape::{
    ColumnRef, EscapeError, Labeled, MAX_IDENTIFIER_LEN, TableRef, escape_identifier,
    escape_table_name, insert_snippet,
};
pub use splitter::{
    DEFAULT_DELIMITER, Delimiter, DelimiterError, StatementSplitter, split_statements,
};
