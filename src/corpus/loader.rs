//! Readers for labeled training sources.
//!
//! Two tabular formats are supported, chosen by file extension:
//!
//! - CSV with a header row containing a `text` column (other columns are
//!   ignored):
//!   ```csv
//!   title,text,subject
//!   Budget passes,The senate reported a vote on the budget,politics
//!   ```
//! - JSONL with one object per line carrying a `text` string:
//!   ```jsonl
//!   {"title": "Budget passes", "text": "The senate reported a vote on the budget"}
//!   ```
//!
//! Rows whose `text` is empty or whitespace are skipped with a warning. A row
//! or record missing `text` altogether is a malformed source and fails the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, warn};
use serde_json::Value;

use crate::error::{Result, VerityError};

/// Name of the column/field holding article text.
pub const TEXT_FIELD: &str = "text";

/// A reader that extracts article texts from a training source.
pub trait CorpusLoader {
    /// Read every non-blank article text from `path`, in file order.
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>>;
}

/// Loader for comma-separated files with a header row.
#[derive(Debug, Clone, Default)]
pub struct CsvCorpusLoader;

impl CsvCorpusLoader {
    pub fn new() -> Self {
        CsvCorpusLoader
    }
}

impl CorpusLoader for CsvCorpusLoader {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let column = headers
            .iter()
            .position(|name| name.trim() == TEXT_FIELD)
            .ok_or_else(|| {
                VerityError::corpus(format!(
                    "{}: no '{TEXT_FIELD}' column in CSV header",
                    path.display()
                ))
            })?;

        let mut texts = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = row + 2;
            match record.get(column) {
                Some(text) if !text.trim().is_empty() => texts.push(text.to_string()),
                Some(_) => warn!("{}:{line}: skipping row with empty text", path.display()),
                None => {
                    return Err(VerityError::corpus(format!(
                        "{}:{line}: row has no '{TEXT_FIELD}' field",
                        path.display()
                    )));
                }
            }
        }

        debug!("loaded {} texts from {}", texts.len(), path.display());
        Ok(texts)
    }
}

/// Loader for JSON Lines files.
#[derive(Debug, Clone, Default)]
pub struct JsonlCorpusLoader;

impl JsonlCorpusLoader {
    pub fn new() -> Self {
        JsonlCorpusLoader
    }
}

impl CorpusLoader for JsonlCorpusLoader {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut texts = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                VerityError::corpus(format!(
                    "{}:{line_number}: invalid JSON: {e}",
                    path.display()
                ))
            })?;

            match value.get(TEXT_FIELD) {
                Some(Value::String(text)) if !text.trim().is_empty() => texts.push(text.clone()),
                Some(Value::String(_)) | Some(Value::Null) => warn!(
                    "{}:{line_number}: skipping record with empty text",
                    path.display()
                ),
                Some(_) => {
                    return Err(VerityError::corpus(format!(
                        "{}:{line_number}: '{TEXT_FIELD}' is not a string",
                        path.display()
                    )));
                }
                None => {
                    return Err(VerityError::corpus(format!(
                        "{}:{line_number}: record has no '{TEXT_FIELD}' field",
                        path.display()
                    )));
                }
            }
        }

        debug!("loaded {} texts from {}", texts.len(), path.display());
        Ok(texts)
    }
}

/// Load article texts, picking the format from the file extension.
///
/// `.jsonl`/`.ndjson` files are read as JSON Lines, everything else as CSV.
pub fn load_texts<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jsonl") | Some("ndjson") => JsonlCorpusLoader::new().load(path),
        _ => CsvCorpusLoader::new().load(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_text_column() {
        let file = temp_file(
            ".csv",
            "title,text,subject\n\
             A,\"Senate reported, again\",politics\n\
             B,   ,news\n\
             C,Shocking cure,health\n",
        );

        let texts = CsvCorpusLoader::new().load(file.path()).unwrap();
        assert_eq!(texts, vec!["Senate reported, again", "Shocking cure"]);
    }

    #[test]
    fn test_csv_missing_column() {
        let file = temp_file(".csv", "title,body\nA,B\n");
        let result = CsvCorpusLoader::new().load(file.path());
        assert!(matches!(result, Err(VerityError::Corpus(_))));
    }

    #[test]
    fn test_csv_truncated_row_fails() {
        let file = temp_file(
            ".csv",
            "title,text\nA,shocking hoax\nB\nC,miracle cure\n",
        );
        let err = load_texts(file.path()).unwrap_err();
        assert!(matches!(&err, VerityError::Corpus(msg) if msg.contains(":3:")));
    }

    #[test]
    fn test_jsonl_loading() {
        let file = temp_file(
            ".jsonl",
            "{\"title\": \"A\", \"text\": \"Senate reported\"}\n\
             \n\
             {\"text\": \"  \"}\n\
             {\"text\": \"Shocking cure\", \"year\": 2024}\n",
        );

        let texts = JsonlCorpusLoader::new().load(file.path()).unwrap();
        assert_eq!(texts, vec!["Senate reported", "Shocking cure"]);
    }

    #[test]
    fn test_jsonl_missing_field() {
        let file = temp_file(".jsonl", "{\"body\": \"no text here\"}\n");
        let result = JsonlCorpusLoader::new().load(file.path());
        assert!(matches!(result, Err(VerityError::Corpus(_))));
    }

    #[test]
    fn test_jsonl_invalid_line() {
        let file = temp_file(".jsonl", "{\"text\": \"ok\"}\nnot json\n");
        let result = JsonlCorpusLoader::new().load(file.path());
        assert!(matches!(result, Err(VerityError::Corpus(_))));
    }

    #[test]
    fn test_load_texts_by_extension() {
        let csv = temp_file(".csv", "text\nfrom csv\n");
        let jsonl = temp_file(".jsonl", "{\"text\": \"from jsonl\"}\n");

        assert_eq!(load_texts(csv.path()).unwrap(), vec!["from csv"]);
        assert_eq!(load_texts(jsonl.path()).unwrap(), vec!["from jsonl"]);
    }

    #[test]
    fn test_missing_file() {
        let result = load_texts("/nonexistent/verity/corpus.csv");
        assert!(result.is_err());
    }
}
