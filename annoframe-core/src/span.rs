//! Half-open text spans and span-set helpers.
//!
//! A [`Span`] locates a region of source text by character offsets
//! `[start, end)`. Discontinuous mentions ("left and right *ventricle*") are
//! represented as plain slices of spans; this layer does not sort, merge or
//! de-duplicate them.
//!
//! ```text
//! text:   "left and right ventricle"
//!          0    5   9     15       24
//! spans:  [0,4) [15,24)   -> "left ventricle"
//!         [9,14) [15,24)  -> "right ventricle"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open character interval `[start, end)`.
///
/// Ordering is by `(start, end)` ascending.
///
/// # Example
///
/// ```rust
/// use annoframe_core::Span;
///
/// let a = Span::new(0, 10).unwrap();
/// let b = Span::new(5, 15).unwrap();
/// assert!(a.overlaps(&b));
/// assert!(!a.shares_start(&b));
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    start: usize,
    end: usize,
}

#[derive(Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
}

impl TryFrom<RawSpan> for Span {
    type Error = Error;

    fn try_from(raw: RawSpan) -> Result<Self> {
        Span::new(raw.start, raw.end)
    }
}

impl TryFrom<(usize, usize)> for Span {
    type Error = Error;

    fn try_from((start, end): (usize, usize)) -> Result<Self> {
        Span::new(start, end)
    }
}

impl TryFrom<std::ops::Range<usize>> for Span {
    type Error = Error;

    fn try_from(range: std::ops::Range<usize>) -> Result<Self> {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl Span {
    /// Create a span, rejecting `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_input(format!(
                "span start {start} is after span end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Start offset (inclusive).
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the spans share at least one character.
    ///
    /// Zero-length spans never overlap anything, including themselves.
    #[must_use]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if one span ends exactly where the other begins.
    #[must_use]
    pub const fn is_adjacent(&self, other: &Span) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// True if both spans begin at the same offset.
    #[must_use]
    pub const fn shares_start(&self, other: &Span) -> bool {
        self.start == other.start
    }

    /// True if both spans end at the same offset.
    #[must_use]
    pub const fn shares_end(&self, other: &Span) -> bool {
        self.end == other.end
    }

    /// True if `other` lies entirely within `self`.
    #[must_use]
    pub const fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Text covered by this span, counting offsets in characters.
    ///
    /// Returns `None` when the span runs past the end of `text`.
    #[must_use]
    pub fn covered_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
        let byte_start = indices.nth(self.start)?;
        let byte_end = if self.is_empty() {
            byte_start
        } else {
            indices.nth(self.len() - 1)?
        };
        text.get(byte_start..byte_end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

// ============================================================================
// Span sets
// ============================================================================

/// Smallest span covering every span in the set.
#[must_use]
pub fn bounding_span(spans: &[Span]) -> Option<Span> {
    let start = spans.iter().map(Span::start).min()?;
    let end = spans.iter().map(Span::end).max()?;
    Some(Span { start, end })
}

/// True if any span of `a` overlaps any span of `b`.
#[must_use]
pub fn spans_overlap(a: &[Span], b: &[Span]) -> bool {
    a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
}

/// Text of every span in the set joined with `separator`.
///
/// Spans that fall outside `text` are skipped.
#[must_use]
pub fn covered_text_of(spans: &[Span], text: &str, separator: &str) -> String {
    spans
        .iter()
        .filter_map(|s| s.covered_text(text))
        .collect::<Vec<_>>()
        .join(separator)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_span() -> impl Strategy<Value = Span> {
        (0usize..200, 0usize..50).prop_map(|(s, len)| Span::new(s, s + len).unwrap())
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_span(), b in arb_span()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn containment_is_reflexive(a in arb_span()) {
            prop_assert!(a.contains(&a));
        }

        #[test]
        fn strict_containment_implies_overlap(a in arb_span(), b in arb_span()) {
            // Zero-length spans overlap nothing, so they are excluded.
            if a.contains(&b) && a != b && !b.is_empty() {
                prop_assert!(a.overlaps(&b));
            }
        }

        #[test]
        fn bounding_span_contains_members(spans in prop::collection::vec(arb_span(), 1..8)) {
            let bound = bounding_span(&spans).unwrap();
            for s in &spans {
                prop_assert!(bound.contains(s));
            }
        }
    }
}
