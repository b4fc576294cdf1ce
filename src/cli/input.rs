//! Reading JSON documents from files or stdin

use std::io::Read;
use std::path::PathBuf;

use serde_json::{Deserializer, Value};

use super::error::CliError;

/// Load input content from file or stdin (`-`)
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Split input into documents
///
/// Accepts a stream of whitespace separated JSON values (including JSON
/// lines). A lone top-level array is treated as a list of documents.
pub fn parse_documents(content: &str) -> Result<Vec<Value>, CliError> {
    let mut documents = Deserializer::from_str(content)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    if documents.len() == 1 && documents[0].is_array() {
        if let Some(Value::Array(items)) = documents.pop() {
            return Ok(items);
        }
    }
    Ok(documents)
}
