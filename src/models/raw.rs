use std::collections::HashMap;

/// A source CSV as read: its header and every row as text, addressed by column name.
///
/// The column set differs between historical exports, so nothing about the
/// shape is fixed here. Schema knowledge lives in [`crate::schema`].
#[derive(Debug, Clone, Default)]
pub struct RawTripTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl RawTripTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RawTripRecord<'_>> {
        self.rows.iter().map(move |values| RawTripRecord {
            index: &self.index,
            values,
        })
    }
}

/// One row of a [`RawTripTable`]
#[derive(Debug, Clone, Copy)]
pub struct RawTripRecord<'a> {
    index: &'a HashMap<String, usize>,
    values: &'a [String],
}

impl<'a> RawTripRecord<'a> {
    /// Trimmed cell value; `None` when the column is absent, the row is short, or the cell is blank
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let i = *self.index.get(column)?;
        let value = self.values.get(i)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Cell value as owned text, empty when missing
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }
}
