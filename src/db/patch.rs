use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::error::{Result, SqlContext};

/// Collects the `column = ?` pairs of a partial update. Column names are
/// always static strings from this crate; only values are bound.
#[derive(Default)]
pub(crate) struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl Assignments {
    pub(crate) fn set(&mut self, column: &'static str, value: impl Into<Value>) {
        self.columns.push(column);
        self.values.push(value.into());
    }

    /// Record the assignment only when the patch carries a value.
    pub(crate) fn set_some<T: Into<Value>>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.set(column, value);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Apply the assignments to the row with `id`, returning the number of
    /// rows touched.
    pub(crate) fn apply(
        mut self,
        conn: &Connection,
        table: &'static str,
        id: &str,
        what: &'static str,
    ) -> Result<usize> {
        let set_clause = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {set_clause} WHERE id = ?{}",
            self.values.len() + 1
        );
        self.values.push(Value::Text(id.to_string()));

        conn.execute(&sql, params_from_iter(self.values.iter()))
            .context(what)
    }
}
