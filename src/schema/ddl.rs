//! CREATE TABLE statement extraction
//!
//! DDL is normalised line by line: each line is trimmed, upper-cased and has its
//! whitespace runs collapsed, then lines are concatenated into one statement per
//! `CREATE TABLE`. Column fragments are cut from the statement's parenthesised
//! body at commas that sit outside any nested parameter list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::SchemaError;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const CREATE_TABLE: &str = "CREATE TABLE";
const PRIMARY_KEY: &str = "PRIMARY KEY";

/// A single normalised CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatement(String);

impl RawStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Text of one column definition, e.g. `AMOUNT DECIMAL(5,2) NOT NULL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFragment(String);

impl ColumnFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Table name and column fragments of one statement, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub fragments: Vec<ColumnFragment>,
}

fn collapse_whitespace(line: &str) -> String {
    WHITESPACE_RUN.replace_all(line, " ").into_owned()
}

/// Split DDL text into CREATE TABLE statements, in source order.
///
/// Blank lines and `--` comment lines are skipped. Anything before the first
/// `CREATE TABLE` is discarded.
pub fn extract_statements(ddl: &str) -> Vec<RawStatement> {
    let mut statements = Vec::new();
    let mut current: Option<String> = None;

    for line in ddl.lines() {
        let line = line.trim().to_uppercase();
        if line.starts_with(CREATE_TABLE) {
            if let Some(done) = current.take() {
                statements.push(RawStatement(done));
            }
            current = Some(collapse_whitespace(&line));
        } else if line.is_empty() || line.starts_with("--") {
            continue;
        } else if let Some(open) = current.as_mut() {
            open.push_str(&collapse_whitespace(&line));
        }
    }

    if let Some(done) = current {
        statements.push(RawStatement(done));
    }

    tracing::debug!(count = statements.len(), "Extracted CREATE TABLE statements");
    statements
}

/// Split a statement into its table name and column fragments.
///
/// The body runs from the first `(` to the last `)`, so anything after the
/// closing parenthesis is ignored. `PRIMARY KEY (...)` clauses are dropped.
pub fn extract_columns(statement: &RawStatement) -> Result<TableDefinition, SchemaError> {
    let text = statement.as_str();
    let malformed = |reason: &str| SchemaError::MalformedStatement {
        statement: text.to_string(),
        reason: reason.to_string(),
    };

    let head_len = CREATE_TABLE.len();
    match text.get(..head_len) {
        Some(head) if head.eq_ignore_ascii_case(CREATE_TABLE) => {}
        _ => return Err(malformed("missing CREATE TABLE prefix")),
    }

    let open = text.find('(').ok_or_else(|| malformed("no opening parenthesis"))?;
    let close = text
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| malformed("no closing parenthesis"))?;

    let table_name = text[head_len..open].trim().to_string();
    if table_name.is_empty() {
        return Err(malformed("missing table name"));
    }

    let fragments = split_top_level(&text[open + 1..close])
        .ok_or_else(|| malformed("unbalanced parentheses in column list"))?
        .into_iter()
        .filter(|f| !f.to_uppercase().starts_with(PRIMARY_KEY))
        .map(ColumnFragment)
        .collect();

    Ok(TableDefinition {
        table_name,
        fragments,
    })
}

/// Split on commas at parenthesis depth zero, trimming each piece.
/// Returns `None` when a parameter list is left open.
fn split_top_level(body: &str) -> Option<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                push_piece(&mut pieces, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if depth > 0 {
        return None;
    }
    push_piece(&mut pieces, &current);
    Some(pieces)
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}
