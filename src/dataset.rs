//! In-memory tabular dataset.
//!
//! A [`Dataset`] is an ordered collection of uniquely named [`Column`]s that
//! all share the same row count. Each column stores its cells in a tagged
//! [`ColumnData`] variant so operations can check the declared type up front
//! instead of inspecting individual values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    data::{Value, format_float},
    error::{PrepError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Categorical,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Categorical => "categorical",
        };
        f.write_str(label)
    }
}

/// Finite label set backing a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    pub categories: Vec<String>,
    pub codes: Vec<Option<usize>>,
    pub ordered: bool,
}

impl Categorical {
    /// Builds a categorical from explicit categories and per-row codes.
    ///
    /// Codes must index into `categories`; out-of-range codes are treated as
    /// missing.
    pub fn new(categories: Vec<String>, codes: Vec<Option<usize>>, ordered: bool) -> Self {
        let limit = categories.len();
        let codes = codes
            .into_iter()
            .map(|code| code.filter(|c| *c < limit))
            .collect();
        Self {
            categories,
            codes,
            ordered,
        }
    }

    /// Encodes text values with lexicographically sorted categories.
    pub fn from_text(values: &[Option<String>]) -> Self {
        let mut categories = values.iter().flatten().cloned().collect::<Vec<_>>();
        categories.sort();
        categories.dedup();
        let codes = values
            .iter()
            .map(|value| {
                value
                    .as_ref()
                    .and_then(|v| categories.binary_search(v).ok())
            })
            .collect();
        Self {
            categories,
            codes,
            ordered: false,
        }
    }

    pub fn label(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .copied()
            .flatten()
            .map(|code| self.categories[code].as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.codes
            .iter()
            .map(|code| code.map(|c| self.categories[c].as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Categorical(Categorical),
}

impl ColumnData {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Text(values) => values.len(),
            ColumnData::Categorical(cat) => cat.codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn value(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Integer(values) => values.get(row).copied().flatten().map(Value::Integer),
            ColumnData::Float(values) => values.get(row).copied().flatten().map(Value::Float),
            ColumnData::Text(values) => values.get(row).cloned().flatten().map(Value::Text),
            ColumnData::Categorical(cat) => cat.label(row).map(|l| Value::Text(l.to_string())),
        }
    }

    /// Cell rendered as delimited text; missing cells render empty.
    pub fn display(&self, row: usize) -> String {
        match self {
            ColumnData::Integer(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            ColumnData::Float(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(format_float)
                .unwrap_or_default(),
            ColumnData::Text(values) => values
                .get(row)
                .and_then(|v| v.clone())
                .unwrap_or_default(),
            ColumnData::Categorical(cat) => cat.label(row).unwrap_or_default().to_string(),
        }
    }

    /// Present numeric values as `f64`; `None` for non-numeric columns.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Integer(values) => Some(values.iter().map(|v| v.map(|i| i as f64)).collect()),
            ColumnData::Float(values) => Some(values.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn integer(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values))
    }

    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric view of the column, failing for text and categorical data.
    pub fn numeric_values(&self) -> Result<Vec<Option<f64>>> {
        self.data
            .numeric_values()
            .ok_or_else(|| PrepError::TypeMismatch {
                column: self.name.clone(),
                expected: "integer or float",
                found: self.column_type(),
            })
    }
}

/// Ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut dataset = Self::new();
        for column in columns {
            dataset.add_column(column)?;
        }
        Ok(dataset)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PrepError::column_not_found(name))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| PrepError::column_not_found(name))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        self.column(name).map(Column::column_type)
    }

    /// Appends a new column, rejecting duplicate names and mismatched lengths.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.contains(&column.name) {
            return Err(PrepError::DuplicateColumn {
                column: column.name,
            });
        }
        self.check_length(&column)?;
        self.columns.push(column);
        Ok(())
    }

    /// Replaces the column with the same name in place, or appends it.
    ///
    /// Returns `true` when an existing column was overwritten.
    pub fn set_column(&mut self, column: Column) -> Result<bool> {
        self.check_length(&column)?;
        match self.column_index(&column.name) {
            Some(idx) => {
                self.columns[idx] = column;
                Ok(true)
            }
            None => {
                self.columns.push(column);
                Ok(false)
            }
        }
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PrepError::column_not_found(name))?;
        Ok(self.columns.remove(idx))
    }

    pub fn row_display(&self, row: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.data.display(row)).collect()
    }

    fn check_length(&self, column: &Column) -> Result<()> {
        // The first column defines the row count.
        let only_self = self.columns.len() == 1 && self.columns[0].name == column.name;
        if self.columns.is_empty() || only_self {
            return Ok(());
        }
        let expected = self.row_count();
        if column.len() != expected {
            return Err(PrepError::LengthMismatch {
                column: column.name.clone(),
                expected,
                found: column.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::integer("id", vec![Some(1), Some(2), Some(3)]),
            Column::text("color", vec![Some("RED"), None, Some("BLUE")]),
        ])
        .expect("dataset")
    }

    #[test]
    fn add_column_rejects_duplicates_and_length_mismatch() {
        let mut dataset = sample();
        let dup = dataset
            .add_column(Column::integer("id", vec![None, None, None]))
            .unwrap_err();
        assert!(matches!(dup, PrepError::DuplicateColumn { .. }));

        let short = dataset
            .add_column(Column::float("score", vec![Some(1.0)]))
            .unwrap_err();
        assert_eq!(
            short,
            PrepError::LengthMismatch {
                column: "score".to_string(),
                expected: 3,
                found: 1,
            }
        );
    }

    #[test]
    fn set_column_overwrites_in_place() {
        let mut dataset = sample();
        let replaced = dataset
            .set_column(Column::integer("id", vec![Some(7), Some(8), Some(9)]))
            .unwrap();
        assert!(replaced);
        assert_eq!(dataset.column_names(), vec!["id", "color"]);
        assert_eq!(dataset.column("id").unwrap().data.display(0), "7");
    }

    #[test]
    fn categorical_from_text_sorts_categories_and_keeps_missing() {
        let cat = Categorical::from_text(&[
            Some("RED".to_string()),
            None,
            Some("BLUE".to_string()),
            Some("RED".to_string()),
        ]);
        assert_eq!(cat.categories, vec!["BLUE", "RED"]);
        assert_eq!(cat.codes, vec![Some(1), None, Some(0), Some(1)]);
        assert!(!cat.ordered);
    }

    #[test]
    fn numeric_values_rejects_text_columns() {
        let dataset = sample();
        let err = dataset.column("color").unwrap().numeric_values().unwrap_err();
        assert!(matches!(
            err,
            PrepError::TypeMismatch {
                found: ColumnType::Text,
                ..
            }
        ));
    }

    #[test]
    fn drop_column_reports_missing_names() {
        let mut dataset = sample();
        dataset.drop_column("color").unwrap();
        assert_eq!(dataset.column_names(), vec!["id"]);
        assert!(matches!(
            dataset.drop_column("color"),
            Err(PrepError::ColumnNotFound { .. })
        ));
    }
}
