//! Query result types.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One result row: requested field names mapped to extracted strings, in
/// projection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell. A repeated field name keeps its first value for lookups.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.cells.push((field.into(), value.into()));
    }

    /// Get a value by field name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in projection order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Values in projection order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A set of rows from a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Column names in order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Create a new empty result set.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Values of one column across all rows.
    pub fn column(&self, field: &str) -> Vec<&str> {
        self.rows.iter().filter_map(|r| r.get(field)).collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_projection_order() {
        let row: Row = [("name", "v1"), ("hash", "abc"), ("type", "tag")].into_iter().collect();
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name", "hash", "type"]);
        assert_eq!(row.get("hash"), Some("abc"));
        assert_eq!(row.get("url"), None);
    }

    #[test]
    fn test_row_serializes_as_ordered_map() {
        let mut row = Row::new();
        row.push("name", "v1");
        row.push("hash", "NULL");
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"name":"v1","hash":"NULL"}"#
        );
    }

    #[test]
    fn test_column_values() {
        let mut rs = ResultSet::new(vec!["name".into()]);
        rs.push([("name", "a")].into_iter().collect());
        rs.push([("name", "b")].into_iter().collect());
        assert_eq!(rs.column("name"), vec!["a", "b"]);
        assert_eq!(rs.len(), 2);
    }
}
