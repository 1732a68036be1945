use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use weather_ingest::{
    db::query::render_value, reading::CSV_HEADER, ObservationStore, QueryRows,
};

pub fn list(db_path: &Path, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Result<()> {
    let store = ObservationStore::open(db_path)?;

    println!("{CSV_HEADER}");
    for observation in store.select_range(from, to)? {
        println!("{observation}");
    }

    Ok(())
}

pub fn query(db_path: &Path, sql: &str) -> Result<()> {
    let store = ObservationStore::open(db_path)?;
    let rows = store.query(sql)?;

    for line in render_rows(&rows) {
        println!("{line}");
    }

    Ok(())
}

pub fn clear(db_path: &Path) -> Result<()> {
    let store = ObservationStore::open(db_path)?;
    let removed = store.clear()?;
    println!("Removed {removed} observations");

    Ok(())
}

// Tab separated, header first.
fn render_rows(rows: &QueryRows) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.rows.len() + 1);
    lines.push(rows.columns.join("\t"));

    for row in &rows.rows {
        let cells: Vec<String> = row.iter().map(render_value).collect();
        lines.push(cells.join("\t"));
    }

    lines
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use rusqlite::types::Value;

    use super::*;

    #[test]
    fn should_render_rows() {
        let rows = QueryRows {
            columns: vec!["date".to_string(), "max_temp".to_string()],
            rows: vec![vec![
                Value::Text("2023-01-01T00:00:00".to_string()),
                Value::Real(3.5),
            ]],
        };

        assert_eq!(
            render_rows(&rows),
            vec!["date\tmax_temp", "2023-01-01T00:00:00\t3.5"]
        );
    }
}
