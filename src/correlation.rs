//! Pairwise correlation of weak-behavior counts between tests
//!
//! Each iteration of a run is one sample; each test is one variable. A high
//! correlation between a conformance test and one of its mutants means the
//! same environments that expose the mutant also stress the original test.
//!
//! Cells hold raw `weak` counts, not rates. A test missing from an iteration
//! leaves a gap, and each pair uses only the iterations where both tests were
//! observed.

use crate::dataset::IterationDataset;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when querying a correlation matrix
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("Unknown test `{0}` in correlation matrix")]
    UnknownTest(String),
}

/// Result type for correlation operations
pub type Result<T> = std::result::Result<T, CorrelationError>;

/// Symmetric test × test matrix of Pearson coefficients
///
/// Serializes as a nested object `{testA: {testB: r}}`; undefined
/// coefficients (fewer than two shared samples, or a constant column) are
/// `NaN` and serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    tests: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Test names in column order
    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Coefficient between two named tests
    pub fn get(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.at(i, j))
    }

    /// Coefficient by column index
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.tests.len() + j]
    }

    fn index_of(&self, test: &str) -> Result<usize> {
        self.tests
            .iter()
            .position(|t| t == test)
            .ok_or_else(|| CorrelationError::UnknownTest(test.to_string()))
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(self.tests.len()))?;
        for (i, name) in self.tests.iter().enumerate() {
            outer.serialize_entry(name, &Row { matrix: self, row: i })?;
        }
        outer.end()
    }
}

struct Row<'a> {
    matrix: &'a CorrelationMatrix,
    row: usize,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut inner = serializer.serialize_map(Some(self.matrix.len()))?;
        for (j, name) in self.matrix.tests.iter().enumerate() {
            inner.serialize_entry(name, &self.matrix.at(self.row, j))?;
        }
        inner.end()
    }
}

/// Pearson coefficient over paired samples; `NaN` when undefined
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Correlate the weak-behavior counts of every pair of tests in `dataset`
pub fn correlate(dataset: &IterationDataset) -> CorrelationMatrix {
    let tests: Vec<String> = dataset.tests().map(|(name, _)| name.to_string()).collect();
    let n = tests.len();

    // rows = iterations, columns = tests
    let table: Vec<Vec<Option<f64>>> = dataset
        .iterations()
        .map(|(_, observed)| {
            tests
                .iter()
                .map(|test| observed.get(test).map(|record| record.weak as f64))
                .collect()
        })
        .collect();

    let mut values = vec![f64::NAN; n * n];
    let mut pairs = Vec::with_capacity(table.len());
    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in (i + 1)..n {
            pairs.clear();
            pairs.extend(table.iter().filter_map(|row| Some((row[i]?, row[j]?))));
            let r = pearson(&pairs);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    debug!(
        tests = n,
        samples = table.len(),
        "computed correlation matrix"
    );
    CorrelationMatrix { tests, values }
}
