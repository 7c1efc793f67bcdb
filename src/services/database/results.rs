use serde_json::{Map, Value};
use uuid::Uuid;

use crate::services::sql::StatementSplitter;

use super::types::{ErrorDetails, RawResult, StatementResult};

/// Routine PostgreSQL reports for lexer-level syntax errors
const SCANNER_ERROR_ROUTINE: &str = "scanner_yyerror";

/// Label the results of an executed script with the statements that produced them.
///
/// The client returns one result per statement, so result `i` pairs with
/// statement `i` of the split script.
pub fn annotate_results(
    splitter: &StatementSplitter,
    script: &str,
    results: Vec<RawResult>,
    notices: &[String],
) -> Vec<StatementResult> {
    let statements = splitter.split(script);

    if statements.len() != results.len() {
        tracing::warn!(
            "Script produced {} result(s) but splits into {} statement(s)",
            results.len(),
            statements.len()
        );
    }

    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            let columns = unique_column_names(&result.fields);
            let mut messages = notices.to_vec();
            messages.push(execution_message(&result.command, result.row_count));

            StatementResult {
                result_id: Uuid::new_v4(),
                query: statements.get(index).cloned(),
                rows: map_rows(result.rows, &columns),
                columns,
                messages,
                error: false,
            }
        })
        .collect()
}

/// Build the single result shown when a script fails as a whole.
pub fn error_result(script: &str, error: &ErrorDetails, notices: &[String]) -> StatementResult {
    let mut message = error.message.clone();
    if error.routine.as_deref() == Some(SCANNER_ERROR_ROUTINE) {
        if let Some(position) = error.position {
            message = format!("{} at character {}", message, position);
        }
    }

    let mut messages = notices.to_vec();
    messages.push(message);

    StatementResult {
        result_id: Uuid::new_v4(),
        query: Some(script.to_string()),
        columns: vec![],
        rows: vec![],
        messages,
        error: true,
    }
}

/// Disambiguate repeated field names as `name (n)`.
pub fn unique_column_names<S: AsRef<str>>(fields: &[S]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        let name = field.as_ref();
        let count = names.iter().filter(|n| n.as_str() == name).count();
        if count > 0 {
            names.push(format!("{} ({})", name, count));
        } else {
            names.push(name.to_string());
        }
    }
    names
}

/// Key positional rows by column name. Values past the last column are dropped.
pub fn map_rows(rows: Vec<Vec<Value>>, columns: &[String]) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .map(|row| columns.iter().cloned().zip(row).collect())
        .collect()
}

pub fn execution_message(command: &str, row_count: Option<u64>) -> String {
    let mut message = format!("{} successfully executed.", command);
    if !command.eq_ignore_ascii_case("select") {
        if let Some(rows) = row_count {
            message.push_str(&format!(" {} rows were affected.", rows));
        }
    }
    message
}
