//! Output formatting module
//!
//! Prints ledger records (blocks, transactions) either as a flattened
//! field/value table or as JSON.

use crate::Result;
use crate::transform::flatten;
use serde_json::Value;
use std::io::Write;

const FIELD_WIDTH: usize = 16;
const VALUE_WIDTH: usize = 90;

/// Output a record as pretty JSON
pub fn output_json(w: &mut impl Write, record: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, record)?;
    writeln!(w)?;
    Ok(())
}

fn display_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };

    if text.chars().count() > VALUE_WIDTH {
        let cut: String = text.chars().take(VALUE_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        text
    }
}

/// Output a record as a two-column field table
pub fn output_table(w: &mut impl Write, title: &str, record: &Value) -> Result<()> {
    writeln!(w, "{}", title)?;
    writeln!(w, "{}", "=".repeat(FIELD_WIDTH + VALUE_WIDTH + 1))?;

    for (field, value) in flatten(record) {
        writeln!(w, "{:<width$} {}", field, display_value(&value), width = FIELD_WIDTH)?;
    }
    writeln!(w)?;

    Ok(())
}

/// Output a list of records, one table each
///
/// A record that is not a list is printed as a single table.
pub fn output_tables(w: &mut impl Write, title: &str, records: &Value) -> Result<()> {
    match records {
        Value::Array(items) => {
            if items.is_empty() {
                writeln!(w, "{}: none", title)?;
            }
            for (idx, item) in items.iter().enumerate() {
                output_table(w, &format!("{} #{}", title, idx + 1), item)?;
            }
            Ok(())
        }
        other => output_table(w, title, other),
    }
}
