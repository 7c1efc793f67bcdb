mod results;
mod types;

pub use results::{annotate_results, error_result, execution_message, map_rows, unique_column_names};
pub use types::{ErrorDetails, RawResult, StatementResult};
