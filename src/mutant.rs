//! Mutant category classification
//!
//! Every litmus test in a run is either a conformance test or a mutant of one.
//! Mutants fall into three families, identified by the naming convention of the
//! test harness:
//! - Reversing program order: names contain `Mutations`
//! - Weakening program order: names contain `Coherency`
//! - Weakening synchronizes-with: everything else
//!
//! The category is assigned once when a dataset is loaded (see
//! [`crate::dataset`]) so aggregation code never inspects names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker for reversing-po mutants
const REVERSING_PO_MARKER: &str = "Mutations";
/// Marker for weakening-po mutants
const WEAKENING_PO_MARKER: &str = "Coherency";

/// Family of an injected weak-behavior mutant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutantCategory {
    /// Program order reversed between two accesses
    ReversingPo,
    /// Program order weakened (coherency tests)
    WeakeningPo,
    /// Synchronizes-with edge weakened
    WeakeningSw,
}

impl MutantCategory {
    /// All categories in reporting order
    pub const ALL: [MutantCategory; 3] = [
        MutantCategory::ReversingPo,
        MutantCategory::WeakeningPo,
        MutantCategory::WeakeningSw,
    ];

    /// Classify a test by name.
    ///
    /// The `Mutations` check runs first, so a name carrying both markers is a
    /// reversing-po mutant. Names with neither marker land in `WeakeningSw`.
    ///
    /// # Example
    /// ```
    /// use killscope::mutant::MutantCategory;
    ///
    /// assert_eq!(
    ///     MutantCategory::from_test_name("RR Mutations Default"),
    ///     MutantCategory::ReversingPo
    /// );
    /// assert_eq!(
    ///     MutantCategory::from_test_name("Message Passing Coherency"),
    ///     MutantCategory::WeakeningPo
    /// );
    /// assert_eq!(
    ///     MutantCategory::from_test_name("Message Passing Barrier Variant"),
    ///     MutantCategory::WeakeningSw
    /// );
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        if name.contains(REVERSING_PO_MARKER) {
            MutantCategory::ReversingPo
        } else if name.contains(WEAKENING_PO_MARKER) {
            MutantCategory::WeakeningPo
        } else {
            MutantCategory::WeakeningSw
        }
    }

    /// Report key used in JSON output and configuration
    pub fn key(self) -> &'static str {
        match self {
            MutantCategory::ReversingPo => "reversing_po",
            MutantCategory::WeakeningPo => "weakening_po",
            MutantCategory::WeakeningSw => "weakening_sw",
        }
    }

    /// Human-readable label for text reports
    pub fn label(self) -> &'static str {
        match self {
            MutantCategory::ReversingPo => "Reversing po",
            MutantCategory::WeakeningPo => "Weakening po",
            MutantCategory::WeakeningSw => "Weakening sw",
        }
    }
}

impl fmt::Display for MutantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
