//! Columnar datasets decoded from fixed-arity rows.

use crate::error::ReaderError;

/// Parallel numeric columns decoded from rows of one fixed arity.
///
/// Index `i` of every column refers to the same source row, and rows keep the
/// order in which they appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Vec<f64>>,
}

impl Dataset {
    /// Create an empty dataset with `arity` columns.
    pub fn with_arity(arity: usize) -> Self {
        Self {
            columns: vec![Vec::new(); arity],
        }
    }

    /// Append one row. The caller guarantees `row.len() == arity`.
    pub(crate) fn push_row(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.columns.len());
        for (column, &value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    /// Number of fields per row.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One column, or `None` past the arity.
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// All columns in field order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Reassemble row `index`.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index]).collect())
    }

    /// Take ownership of the columns.
    pub fn into_columns(self) -> Vec<Vec<f64>> {
        self.columns
    }
}

/// Scalar samples: `x y value` per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub value: Vec<f64>,
}

impl ScalarSamples {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl TryFrom<Dataset> for ScalarSamples {
    type Error = ReaderError;

    fn try_from(dataset: Dataset) -> Result<Self, Self::Error> {
        let actual = dataset.arity();
        match <[Vec<f64>; 3]>::try_from(dataset.into_columns()) {
            Ok([x, y, value]) => Ok(Self { x, y, value }),
            Err(_) => Err(ReaderError::ArityMismatch {
                expected: 3,
                actual,
            }),
        }
    }
}

/// Vector samples: `x y u v` per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl VectorSamples {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl TryFrom<Dataset> for VectorSamples {
    type Error = ReaderError;

    fn try_from(dataset: Dataset) -> Result<Self, Self::Error> {
        let actual = dataset.arity();
        match <[Vec<f64>; 4]>::try_from(dataset.into_columns()) {
            Ok([x, y, u, v]) => Ok(Self { x, y, u, v }),
            Err(_) => Err(ReaderError::ArityMismatch {
                expected: 4,
                actual,
            }),
        }
    }
}
