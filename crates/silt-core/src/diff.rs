//! Line-level diff between two text blobs.
//!
//! Classic longest-common-subsequence diff over lines: a DP table,
//! then a backtrack that classifies each line as equal, added, or
//! removed. Output is a flat segment sequence; rendering (prefixes,
//! coloring) is the caller's concern.

use serde::{Deserialize, Serialize};

/// How a line relates the old document to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Line is identical in both versions.
    Equal,
    /// Line exists only in the new version.
    Added,
    /// Line exists only in the old version.
    Removed,
}

/// One classified line of a diff.
///
/// `text` keeps its line terminator, so concatenating the `Equal` and
/// `Added` segments reproduces the new document byte-for-byte (and
/// `Equal` + `Removed` the old one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

/// Compute a line-level edit script turning `old` into `new`.
///
/// Segments follow the document order of the new text, with removed
/// lines interleaved at the point of divergence. Deterministic: the
/// same input pair always yields the same sequence.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffSegment> {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();

    let table = lcs_table(&old_lines, &new_lines);

    // Backtrack from the bottom-right corner, then reverse into
    // document order. On ties we prefer the Added branch, which puts
    // removals ahead of additions once the sequence is reversed.
    let mut segments = Vec::new();
    let mut i = old_lines.len();
    let mut j = new_lines.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            segments.push(segment(DiffKind::Equal, old_lines[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            segments.push(segment(DiffKind::Added, new_lines[j - 1]));
            j -= 1;
        } else {
            segments.push(segment(DiffKind::Removed, old_lines[i - 1]));
            i -= 1;
        }
    }

    segments.reverse();
    segments
}

fn segment(kind: DiffKind, text: &str) -> DiffSegment {
    DiffSegment {
        kind,
        text: text.to_string(),
    }
}

/// Compute the longest common subsequence table for two slices of lines.
fn lcs_table(old: &[&str], new: &[&str]) -> Vec<Vec<usize>> {
    let m = old.len();
    let n = new.len();
    let mut table = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if old[i - 1] == new[j - 1] {
                table[i][j] = table[i - 1][j - 1] + 1;
            } else {
                table[i][j] = table[i - 1][j].max(table[i][j - 1]);
            }
        }
    }

    table
}
