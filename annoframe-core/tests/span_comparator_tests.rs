//! Span comparator behavior across strategies, single spans and span lists.

use annoframe_core::{
    MatchStrategy, OverlapSpanComparator, SharedEndSpanComparator, SharedStartSpanComparator,
    Span, SpanComparator, SpanListPolicy, StrictSpanComparator, SubsumptionSpanComparator,
};
use std::cmp::Ordering;

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end).unwrap()
}

// =============================================================================
// Single spans
// =============================================================================

#[test]
fn shared_start_documented_examples() {
    let cmp = SharedStartSpanComparator::new();
    assert_eq!(cmp.compare(&span(0, 10), &span(0, 5)), Ordering::Equal);
    // No overlap: ordered by start, first annotation earlier.
    assert_eq!(cmp.compare(&span(0, 10), &span(20, 25)), Ordering::Less);
}

#[test]
fn shared_end_documented_examples() {
    let cmp = SharedEndSpanComparator::new();
    assert_eq!(cmp.compare(&span(0, 10), &span(5, 10)), Ordering::Equal);
    assert_eq!(cmp.compare(&span(0, 10), &span(11, 20)), Ordering::Less);
}

#[test]
fn boundary_comparators_require_overlap() {
    for cmp in [
        MatchStrategy::SharedStart.comparator(SpanListPolicy::AnyPair),
        MatchStrategy::SharedEnd.comparator(SpanListPolicy::AnyPair),
    ] {
        assert!(cmp.overlap_required());
    }
    // Adjacent spans share a boundary offset but no character.
    let cmp = SharedEndSpanComparator::new();
    assert_ne!(cmp.compare(&span(0, 5), &span(5, 5)), Ordering::Equal);
}

#[test]
fn comparators_sort_annotation_streams() {
    let cmp = SharedStartSpanComparator::new();
    let mut spans = vec![span(30, 35), span(0, 4), span(12, 20), span(5, 9)];
    spans.sort_by(|a, b| cmp.compare(a, b));
    assert_eq!(spans, vec![span(0, 4), span(5, 9), span(12, 20), span(30, 35)]);
}

#[test]
fn sibling_strategies() {
    let gold = span(10, 20);
    let inner = span(12, 18);
    let crossing = span(15, 25);

    assert!(!StrictSpanComparator::new().is_match(&gold, &inner));
    assert!(StrictSpanComparator::new().is_match(&gold, &span(10, 20)));
    assert!(OverlapSpanComparator::new().is_match(&gold, &crossing));
    assert!(SubsumptionSpanComparator::new().is_match(&gold, &inner));
    assert!(!SubsumptionSpanComparator::new().is_match(&gold, &crossing));
}

// =============================================================================
// Span lists
// =============================================================================

#[test]
fn coordinated_mention_matches_component() {
    // "left and right ventricle": gold marks "left ... ventricle",
    // a system found "ventricle" only.
    let gold = [span(0, 4), span(15, 24)];
    let found = [span(15, 24)];

    let end = SharedEndSpanComparator::new();
    assert_eq!(end.compare_lists(&gold, &found), Ordering::Equal);

    let strict_cover = StrictSpanComparator::new().with_list_policy(SpanListPolicy::Covering);
    assert_ne!(strict_cover.compare_lists(&gold, &found), Ordering::Equal);
}

#[test]
fn overlapping_spans_within_one_list() {
    let cmp = SharedStartSpanComparator::new().with_list_policy(SpanListPolicy::Covering);
    let a = [span(0, 10), span(0, 5), span(3, 8)];
    let b = [span(0, 7), span(3, 4)];
    assert_eq!(cmp.compare_lists(&a, &b), Ordering::Equal);
}

#[test]
fn list_order_is_consistent_when_not_matching() {
    let cmp = SharedStartSpanComparator::new();
    let a = [span(0, 4)];
    let b = [span(2, 6)];
    let ab = cmp.compare_lists(&a, &b);
    let ba = cmp.compare_lists(&b, &a);
    assert_ne!(ab, Ordering::Equal);
    assert_eq!(ab, ba.reverse());
}
