//! Read-only guard for ad-hoc queries.

use rusqlite::types::Value;

use crate::error::StoreError;

const MUTATION_KEYWORDS: [&str; 3] = ["INSERT", "UPDATE", "DELETE"];

// Reported as read-only by SQLite, yet ATTACH creates missing database files.
const ATTACH_KEYWORD: &str = "ATTACH";

/// Tabular result of an ad-hoc query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Refuses any query text mentioning a mutation keyword or `ATTACH`, in any
/// case.
pub fn ensure_read_only(sql: &str) -> Result<(), StoreError> {
    let upper = sql.to_uppercase();

    if let Some(keyword) = MUTATION_KEYWORDS.iter().find(|k| upper.contains(*k)) {
        return Err(StoreError::Rejected(format!(
            "query contains mutation keyword {keyword}"
        )));
    }
    if upper.contains(ATTACH_KEYWORD) {
        return Err(StoreError::Rejected(
            "attaching or detaching databases is not allowed".to_string(),
        ));
    }

    Ok(())
}

/// Renders a single SQLite value for display.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

// -- Tests -------------------------------------------------------------------
