//! Positional pairing of identifiers with time pairs.
//!
//! The two recognition passes see the same rows top-to-bottom, so the i-th
//! identifier belongs with the i-th pair of times. No content-based
//! matching happens here.

/// One extracted dashboard row: a server identifier and its two timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub identifier: String,
    pub time_a: String,
    pub time_b: String,
}

/// Counts reported alongside the rows.
///
/// `mismatch` is set when the identifier count and the derived time-pair
/// count disagree, the signal that the two recognition passes saw different
/// numbers of rows (usually a partial recognition or a wrong crop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub identifiers_found: usize,
    pub times_found: usize,
    pub pair_count: usize,
    pub rows_output: usize,
    pub mismatch: bool,
}

impl Diagnostics {
    /// Renders the diagnostic strings for the report's final line.
    pub fn summary(&self) -> Vec<String> {
        let mut parts = vec![
            format!("IDs found: {}", self.identifiers_found),
            format!("Times found: {} ({} pairs)", self.times_found, self.pair_count),
            format!("Rows output: {}", self.rows_output),
        ];
        if self.mismatch {
            parts.push(format!(
                "Warning: {} IDs vs {} time pairs",
                self.identifiers_found, self.pair_count
            ));
        }
        parts
    }
}

/// Result of scanning one screenshot: the paired rows plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub rows: Vec<Row>,
    pub diagnostics: Diagnostics,
}

/// Pairs identifiers with consecutive time pairs, in order.
///
/// Row i is (identifiers[i], times[2i], times[2i+1]). Emits
/// min(identifier count, time-pair count) rows; the unmatched tail of the
/// longer sequence is dropped silently and surfaced through the mismatch
/// diagnostic, never as an error. A leftover odd time does not count
/// toward a pair.
pub fn assemble(identifiers: &[String], times: &[String]) -> ScanOutcome {
    let pair_count = times.len() / 2;
    let n = identifiers.len().min(pair_count);

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        rows.push(Row {
            identifier: identifiers[i].clone(),
            // Indices stay in range by construction; a miss degrades to an
            // empty slot rather than a panic.
            time_a: times.get(2 * i).cloned().unwrap_or_default(),
            time_b: times.get(2 * i + 1).cloned().unwrap_or_default(),
        });
    }

    let diagnostics = Diagnostics {
        identifiers_found: identifiers.len(),
        times_found: times.len(),
        pair_count,
        rows_output: rows.len(),
        mismatch: identifiers.len() != pair_count,
    };

    ScanOutcome { rows, diagnostics }
}
