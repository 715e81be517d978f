//! Owned copies of the temperature field.

use std::fmt::Write as _;

/// The whole temperature field at one simulated time.
///
/// Row-major, row 0 being the heated face.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    time: f64,
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl FieldSnapshot {
    /// Wrap a row-major copy of the field.
    ///
    /// Returns `None` if `values` does not hold exactly `rows * cols` cells.
    pub fn new(time: f64, rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == rows * cols).then_some(Self {
            time,
            rows,
            cols,
            values,
        })
    }

    pub(crate) fn from_parts(time: f64, rows: usize, cols: usize, values: Vec<f64>) -> Self {
        Self {
            time,
            rows,
            cols,
            values,
        }
    }

    /// Simulated time of the snapshot, s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Nodes through the thickness.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Nodes across the width.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All temperatures, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Temperature at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    /// One row across the width: a horizontal profile.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    /// One column through the thickness: a vertical profile.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.cols {
            return None;
        }
        Some(
            self.values
                .iter()
                .skip(col)
                .step_by(self.cols)
                .copied()
                .collect(),
        )
    }

    /// Hottest node temperature.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Coldest node temperature.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The field as CSV, one line per row, heated face first.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.values.len() * 12);
        for chunk in self.values.chunks(self.cols) {
            for (j, v) in chunk.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{v}");
            }
            out.push('\n');
        }
        out
    }
}
