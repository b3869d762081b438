//! The fix composer: combines a diagnostic batch's edits into a single
//! textual patch, or reports a conflict (spec.md §4.5 "Fix composition
//! invariants", §8 "Non-overlap").
//!
//! Grounded on the teacher's `fixing/mod.rs` (`apply_fixes`,
//! `compare_pending_fixes`, `has_overlapping_ranges`, right-to-left
//! splice application) and `fixing/accumulated_edits.rs`. The teacher
//! tolerates a single rule's self-conflicting fixes by keeping a
//! non-overlapping subset of just that rule's edits, then drops the
//! whole rule's batch if it still conflicts with other rules' edits.
//! spec.md §4.5 invariant 3 is stricter: *any* overlap anywhere in the
//! batch means nothing is applied, so that per-rule leniency is dropped
//! here (documented in DESIGN.md).

use std::cmp::Ordering;

use crate::diagnostic::Edit;
use crate::source::Range;

/// Why `compose_fixes` refused to apply anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixConflict {
    pub conflicting: Vec<Edit>,
}

/// The patched text produced by `compose_fixes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub text: String,
}

fn compare_edits(a: &Edit, b: &Edit) -> Ordering {
    a.range
        .start
        .cmp(&b.range.start)
        .then_with(|| a.range.end.cmp(&b.range.end))
}

/// Returns `true` if any two edits in `sorted` (assumed sorted by
/// `compare_edits`) conflict per spec.md §4.5 invariant 3.
fn has_conflict(sorted: &[Edit]) -> bool {
    sorted
        .windows(2)
        .any(|pair| pair[0].range.conflicts_with(&pair[1].range))
}

/// Compose a batch of edits gathered from one or more diagnostics on a
/// single file into one patch (spec.md §4.5).
///
/// 1. every edit's range must lie inside `text`
/// 2. edits are sorted by `(start, end)`
/// 3. any overlap (including coincident insertions) conflicts the whole
///    batch — nothing is applied
/// 4. otherwise edits are applied right-to-left so earlier offsets stay valid
pub fn compose_fixes(text: &str, edits: Vec<Edit>) -> Result<Patch, FixConflict> {
    for edit in &edits {
        assert!(
            edit.range.end <= text.len(),
            "edit range {:?} lies outside of a {}-byte file",
            edit.range,
            text.len()
        );
    }

    let mut sorted = edits;
    sorted.sort_by(compare_edits);

    if has_conflict(&sorted) {
        return Err(FixConflict {
            conflicting: sorted,
        });
    }

    let mut patched = text.to_owned();
    for edit in sorted.into_iter().rev() {
        patched.replace_range(edit.range.start..edit.range.end, &edit.text);
    }

    Ok(Patch { text: patched })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_non_overlapping_edits_right_to_left() {
        let text = "const x = 3 as 3;";
        // `3 as 3` -> `3`: remove the ` as 3` suffix.
        let edits = vec![Edit::remove(Range::new(11, 17))];
        let patch = compose_fixes(text, edits).unwrap();
        assert_eq!(patch.text, "const x = 3;");
    }

    #[test]
    fn conflicting_edits_apply_nothing() {
        let text = "const x = 1;";
        let edits = vec![
            Edit::new(Range::new(6, 7), "a"),
            Edit::new(Range::new(6, 8), "b"),
        ];
        let err = compose_fixes(text, edits).unwrap_err();
        assert_eq!(err.conflicting.len(), 2);
    }

    #[test]
    fn coincident_insertions_conflict() {
        let text = "abc";
        let edits = vec![Edit::insert(1, "x"), Edit::insert(1, "y")];
        assert!(compose_fixes(text, edits).is_err());
    }

    #[test]
    fn adjacent_non_overlapping_edits_both_apply() {
        let text = "abcd";
        let edits = vec![
            Edit::new(Range::new(0, 1), "X"),
            Edit::new(Range::new(1, 2), "Y"),
        ];
        let patch = compose_fixes(text, edits).unwrap();
        assert_eq!(patch.text, "XYcd");
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_edit_panics() {
        let _ = compose_fixes("abc", vec![Edit::new(Range::new(0, 10), "x")]);
    }
}
