//! Field cleaning: fill missing cells and normalize text casing.

use log::debug;

use crate::{
    data::Value,
    dataset::{ColumnData, Dataset},
    error::{PrepError, Result},
};

/// Returns a copy of `dataset` with `fields` cleaned.
///
/// When `fill` is given, missing cells are replaced with it; its kind must
/// match the column (an integer fill is accepted by float columns). Text
/// columns are uppercased.
pub fn fill_clean<S: AsRef<str>>(
    dataset: &Dataset,
    fields: &[S],
    fill: Option<&Value>,
) -> Result<Dataset> {
    let mut cleaned = dataset.clone();
    for field in fields {
        let field = field.as_ref();
        let column = cleaned.column_mut(field)?;
        let found = column.column_type();
        let mismatch = |value: &Value| PrepError::TypeMismatch {
            column: field.to_string(),
            expected: value.kind(),
            found,
        };
        match (&mut column.data, fill) {
            (ColumnData::Integer(values), Some(Value::Integer(fill))) => {
                fill_missing(values, *fill);
            }
            (ColumnData::Float(values), Some(Value::Float(fill))) => fill_missing(values, *fill),
            (ColumnData::Float(values), Some(Value::Integer(fill))) => {
                fill_missing(values, *fill as f64);
            }
            (ColumnData::Text(values), fill) => {
                match fill {
                    Some(Value::Text(fill)) => fill_missing(values, fill.clone()),
                    Some(other) => return Err(mismatch(other)),
                    None => {}
                }
                for value in values.iter_mut().flatten() {
                    *value = value.to_uppercase();
                }
            }
            (_, Some(other)) => return Err(mismatch(other)),
            (_, None) => {}
        }
        debug!("Cleaned column '{field}'");
    }
    Ok(cleaned)
}

fn fill_missing<T: Clone>(values: &mut [Option<T>], fill: T) {
    for value in values.iter_mut().filter(|v| v.is_none()) {
        *value = Some(fill.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnType};

    fn frame() -> Dataset {
        Dataset::from_columns(vec![
            Column::integer("int", vec![Some(1), None]),
            Column::float("float", vec![None, Some(2.3)]),
            Column::text("str", vec![Some("a"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn fill_clean_uppercases_text_and_leaves_original() {
        let dataset = frame();
        let cleaned = fill_clean(&dataset, &["str"], None).unwrap();
        assert_eq!(cleaned.column("str").unwrap().data.display(0), "A");
        assert_eq!(cleaned.column("str").unwrap().data.display(1), "");
        assert_eq!(dataset.column("str").unwrap().data.display(0), "a");
    }

    #[test]
    fn fill_clean_fills_matching_types() {
        let dataset = frame();
        let cleaned = fill_clean(&dataset, &["int", "float"], Some(&Value::Integer(0))).unwrap();
        assert_eq!(cleaned.column("int").unwrap().data.display(1), "0");
        assert_eq!(cleaned.column("float").unwrap().data.display(0), "0");

        let cleaned =
            fill_clean(&dataset, &["str"], Some(&Value::Text("unknown".into()))).unwrap();
        assert_eq!(cleaned.column("str").unwrap().data.display(1), "UNKNOWN");
    }

    #[test]
    fn fill_clean_rejects_mismatched_fill() {
        let dataset = frame();
        let err = fill_clean(&dataset, &["int"], Some(&Value::Text("x".into()))).unwrap_err();
        assert_eq!(
            err,
            PrepError::TypeMismatch {
                column: "int".to_string(),
                expected: "text",
                found: ColumnType::Integer,
            }
        );
        assert!(fill_clean(&dataset, &["str"], Some(&Value::Float(1.0))).is_err());
    }
}
