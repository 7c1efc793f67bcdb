use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One result set as handed back by the client library, in array row mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResult {
    /// Command tag reported by the server (`SELECT`, `INSERT`, ...)
    pub command: String,
    /// Rows returned or affected, when the server reports it
    pub row_count: Option<u64>,
    /// Result field names in column order
    #[serde(default)]
    pub fields: Vec<String>,
    /// Positional row values
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// A result set labeled with the statement text that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementResult {
    pub result_id: Uuid,
    /// Source statement; absent when the script yielded fewer statements than results
    pub query: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub messages: Vec<String>,
    pub error: bool,
}

/// Details of a failed script execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
    /// 1-based character position reported by the server
    pub position: Option<u32>,
    /// Server routine that raised the error
    pub routine: Option<String>,
}
