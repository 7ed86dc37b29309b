//! Line-level diff between two snapshot bodies.
//!
//! Used to decorate version comparisons for display; the comparison itself
//! only needs both snapshots.

use serde::Serialize;

/// Largest differing region, in lines per side, that [`diff_lines`] will
/// align. The LCS table is quadratic in this.
pub const MAX_DIFF_LINES: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineChange {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub change: LineChange,
    pub text: String,
}

impl DiffLine {
    fn new(change: LineChange, text: &str) -> Self {
        Self {
            change,
            text: text.to_string(),
        }
    }
}

/// Added/removed line counts for a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

/// Diff two texts line by line.
///
/// Shared leading and trailing lines are emitted as unchanged without
/// alignment. Returns `None` when what remains exceeds [`MAX_DIFF_LINES`]
/// on either side.
pub fn diff_lines(old: &str, new: &str) -> Option<Vec<DiffLine>> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];
    if old_mid.len() > MAX_DIFF_LINES || new_mid.len() > MAX_DIFF_LINES {
        return None;
    }

    let mut out = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    out.extend(
        old_lines[..prefix]
            .iter()
            .map(|l| DiffLine::new(LineChange::Unchanged, l)),
    );
    align(old_mid, new_mid, &mut out);
    out.extend(
        old_lines[old_lines.len() - suffix..]
            .iter()
            .map(|l| DiffLine::new(LineChange::Unchanged, l)),
    );
    Some(out)
}

/// LCS alignment of two bounded slices. `table[i * w + j]` holds the LCS
/// length of `a[i..]` and `b[j..]`, so the walk runs front to back.
fn align(a: &[&str], b: &[&str], out: &mut Vec<DiffLine>) {
    let (m, n) = (a.len(), b.len());
    let w = n + 1;
    let mut table = vec![0u16; (m + 1) * w];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i * w + j] = if a[i] == b[j] {
                table[(i + 1) * w + j + 1] + 1
            } else {
                table[(i + 1) * w + j].max(table[i * w + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if a[i] == b[j] {
            out.push(DiffLine::new(LineChange::Unchanged, a[i]));
            i += 1;
            j += 1;
        } else if table[(i + 1) * w + j] >= table[i * w + j + 1] {
            out.push(DiffLine::new(LineChange::Removed, a[i]));
            i += 1;
        } else {
            out.push(DiffLine::new(LineChange::Added, b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|l| DiffLine::new(LineChange::Removed, l)));
    out.extend(b[j..].iter().map(|l| DiffLine::new(LineChange::Added, l)));
}

pub fn diff_stats(lines: &[DiffLine]) -> DiffStats {
    lines.iter().fold(DiffStats::default(), |mut stats, l| {
        match l.change {
            LineChange::Added => stats.additions += 1,
            LineChange::Removed => stats.deletions += 1,
            LineChange::Unchanged => {}
        }
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MAX_POST_CONTENT_LENGTH;

    fn changes(lines: &[DiffLine]) -> Vec<(LineChange, &str)> {
        lines.iter().map(|l| (l.change, l.text.as_str())).collect()
    }

    #[test]
    fn identical_texts_are_unchanged() {
        let diff = diff_lines("a\nb", "a\nb").unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|l| l.change == LineChange::Unchanged));
        assert_eq!(diff_stats(&diff), DiffStats::default());
    }

    #[test]
    fn replaced_middle_line() {
        let diff = diff_lines("a\nb\nc", "a\nx\nc").unwrap();
        assert_eq!(
            changes(&diff),
            vec![
                (LineChange::Unchanged, "a"),
                (LineChange::Removed, "b"),
                (LineChange::Added, "x"),
                (LineChange::Unchanged, "c"),
            ]
        );
        assert_eq!(
            diff_stats(&diff),
            DiffStats {
                additions: 1,
                deletions: 1
            }
        );
    }

    #[test]
    fn interleaved_edits_keep_common_lines() {
        let diff = diff_lines("a\nb\nc\nd", "b\nc\ne\nd").unwrap();
        assert_eq!(
            changes(&diff),
            vec![
                (LineChange::Removed, "a"),
                (LineChange::Unchanged, "b"),
                (LineChange::Unchanged, "c"),
                (LineChange::Added, "e"),
                (LineChange::Unchanged, "d"),
            ]
        );
    }

    #[test]
    fn from_and_to_empty() {
        let added = diff_lines("", "one\ntwo").unwrap();
        assert_eq!(diff_stats(&added).additions, 2);
        let removed = diff_lines("one\ntwo", "").unwrap();
        assert_eq!(diff_stats(&removed).deletions, 2);
    }

    #[test]
    fn max_size_bodies_with_no_common_lines_are_not_aligned() {
        let old = "a\n".repeat(MAX_POST_CONTENT_LENGTH / 2);
        let new = "b\n".repeat(MAX_POST_CONTENT_LENGTH / 2);
        assert!(diff_lines(&old, &new).is_none());
    }

    #[test]
    fn large_bodies_with_a_small_change_still_diff() {
        let shared = "same\n".repeat(9_000);
        let old = format!("{shared}old line\n{shared}");
        let new = format!("{shared}new line\n{shared}");

        let diff = diff_lines(&old, &new).unwrap();
        assert_eq!(diff.len(), 18_002);
        assert_eq!(
            diff_stats(&diff),
            DiffStats {
                additions: 1,
                deletions: 1
            }
        );
        assert_eq!(diff[9_000].text, "old line");
        assert_eq!(diff[9_001].text, "new line");
    }

    #[test]
    fn region_at_the_limit_is_aligned() {
        let old = "x\n".repeat(MAX_DIFF_LINES);
        let new = "y\n".repeat(MAX_DIFF_LINES);
        let diff = diff_lines(&old, &new).unwrap();
        assert_eq!(
            diff_stats(&diff),
            DiffStats {
                additions: MAX_DIFF_LINES,
                deletions: MAX_DIFF_LINES
            }
        );

        let over = "x\n".repeat(MAX_DIFF_LINES + 1);
        assert!(diff_lines(&over, &new).is_none());
    }

    #[test]
    fn change_serializes_snake_case() {
        let json = serde_json::to_value(DiffLine::new(LineChange::Added, "x")).unwrap();
        assert_eq!(json["change"], "added");
        assert_eq!(json["text"], "x");
    }
}
