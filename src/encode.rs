//! Categorical casting and one-hot (basis) expansion.
//!
//! Expansion turns a categorical column into one integer indicator column per
//! distinct value, named `<field>_<value>`. Rows where the source is missing
//! get 0 in every indicator column.

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{Categorical, Column, ColumnData, ColumnType, Dataset},
    error::{PrepError, Result},
};

/// Options for [`one_hot_expand`] and [`full_expand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandOptions {
    /// Remove the source column once the indicator columns exist.
    #[serde(default = "default_replace")]
    pub replace: bool,
    /// Order indicator columns by category order instead of first appearance.
    #[serde(default)]
    pub sort_labels: bool,
    /// Explicit value ordering, taking precedence over `sort_labels`.
    #[serde(default)]
    pub order: Option<Vec<String>>,
}

fn default_replace() -> bool {
    true
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            replace: default_replace(),
            sort_labels: false,
            order: None,
        }
    }
}

impl ExpandOptions {
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn sort_labels(mut self, sort_labels: bool) -> Self {
        self.sort_labels = sort_labels;
        self
    }

    pub fn with_order<S: Into<String>>(mut self, order: impl IntoIterator<Item = S>) -> Self {
        self.order = Some(order.into_iter().map(Into::into).collect());
        self
    }
}

/// Name of the indicator column generated for `value` of `field`.
pub fn indicator_column_name(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Converts a text column into a categorical one; categorical columns are left as is.
pub fn cast_categorical(dataset: &mut Dataset, field: &str) -> Result<()> {
    let column = dataset.column_mut(field)?;
    match &column.data {
        ColumnData::Text(values) => {
            let categorical = Categorical::from_text(values);
            debug!(
                "Cast '{field}' to categorical with {} categories",
                categorical.categories.len()
            );
            column.data = ColumnData::Categorical(categorical);
            Ok(())
        }
        ColumnData::Categorical(_) => Ok(()),
        other => Err(PrepError::TypeMismatch {
            column: field.to_string(),
            expected: "text",
            found: other.column_type(),
        }),
    }
}

/// Expands `field` into indicator columns in place, returning their names.
pub fn one_hot_expand(
    dataset: &mut Dataset,
    field: &str,
    options: &ExpandOptions,
) -> Result<Vec<String>> {
    if dataset.column_type(field)? != ColumnType::Categorical {
        cast_categorical(dataset, field)?;
    }
    let categorical = match &dataset.column(field)?.data {
        ColumnData::Categorical(categorical) => categorical,
        other => {
            return Err(PrepError::TypeMismatch {
                column: field.to_string(),
                expected: "categorical",
                found: other.column_type(),
            });
        }
    };

    let indicators = factorize(categorical, options)
        .into_iter()
        .map(|(value, code)| {
            let values = categorical
                .codes
                .iter()
                .map(|row| Some(i64::from(code.is_some() && *row == code)))
                .collect();
            Column::integer(indicator_column_name(field, &value), values)
        })
        .collect::<Vec<_>>();

    let mut names = Vec::with_capacity(indicators.len());
    for indicator in indicators {
        names.push(indicator.name.clone());
        if dataset.set_column(indicator)? {
            warn!(
                "Expansion of '{field}' overwrote existing column '{}'",
                names[names.len() - 1]
            );
        }
    }
    if options.replace {
        dataset.drop_column(field)?;
    }
    debug!("Expanded '{field}' into {} column(s): {names:?}", names.len());
    Ok(names)
}

/// Expands every field in `fields`, in order, against a copy of `dataset`.
pub fn full_expand<S: AsRef<str>>(
    dataset: &Dataset,
    fields: &[S],
    options: &ExpandOptions,
) -> Result<Dataset> {
    let mut expanded = dataset.clone();
    for field in fields {
        one_hot_expand(&mut expanded, field.as_ref(), options)?;
    }
    Ok(expanded)
}

/// Distinct values with their category codes, in indicator column order.
///
/// A value listed in `order` but absent from the categories maps to `None`.
fn factorize(categorical: &Categorical, options: &ExpandOptions) -> Vec<(String, Option<usize>)> {
    let present = categorical.codes.iter().flatten().copied().unique();
    let mut codes = if options.sort_labels {
        present.sorted().collect::<Vec<_>>()
    } else {
        present.collect::<Vec<_>>()
    };

    let mut ordered = Vec::with_capacity(codes.len());
    if let Some(order) = &options.order {
        for value in order.iter().unique() {
            let code = categorical.categories.iter().position(|c| c == value);
            if let Some(code) = code {
                codes.retain(|c| *c != code);
            }
            ordered.push((value.clone(), code));
        }
    }
    ordered.extend(
        codes
            .into_iter()
            .map(|code| (categorical.categories[code].clone(), Some(code))),
    );
    ordered
}
