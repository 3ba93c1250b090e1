use crate::{Result, Value};
use std::sync::Arc;

/// Column labels of a result set, shared across its rows.
pub type RowNames = Arc<[String]>;

/// One result row: the shared labels plus the cell values in label order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub labels: RowNames,
    pub values: Box<[Value]>,
}

impl Row {
    pub fn new(labels: RowNames, values: impl Into<Box<[Value]>>) -> Self {
        Self {
            labels,
            values: values.into(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .and_then(|index| self.values.get(index))
    }
}

/// Hydration of a result row into a caller type, used by the fetch
/// terminals of the builder.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}
