//! Span comparison strategies for deciding whether two annotations match.
//!
//! Every comparator answers `compare(a, b)` with an [`Ordering`]:
//! `Equal` means the two annotations match under that strategy, anything
//! else is a consistent ordering that lets the same comparator drive a
//! sort-based alignment of two annotation streams.
//!
//! # Strategies
//!
//! | Comparator | Match predicate | Overlap required |
//! |------------|-----------------|------------------|
//! | [`StrictSpanComparator`] | same start and same end | no |
//! | [`SharedStartSpanComparator`] | same start | yes |
//! | [`SharedEndSpanComparator`] | same end | yes |
//! | [`OverlapSpanComparator`] | any shared character | yes |
//! | [`SubsumptionSpanComparator`] | one span contains the other | yes |
//!
//! When overlap is required and the inputs do not overlap at all, the result
//! falls back to start-offset order regardless of the predicate:
//!
//! ```text
//! shared start, overlap required
//!   a: [0========10)
//!   b: [0===5)              -> Equal
//!   c:                [20==25)  -> a < c (no overlap, ordered by start)
//! ```
//!
//! # Span lists
//!
//! Discontinuous annotations are compared with [`SpanComparator::compare_lists`]
//! and aggregated by a [`SpanListPolicy`]. The default, [`SpanListPolicy::AnyPair`],
//! matches when at least one span of each list matches under the pairwise rule.

use crate::error::Error;
use crate::span::{bounding_span, spans_overlap, Span};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// List aggregation policy
// =============================================================================

/// How the pairwise span predicate is lifted to span lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanListPolicy {
    /// Match if some span of the first list matches some span of the second.
    #[default]
    AnyPair,
    /// Match if both lists have the same length and the i-th spans match.
    Positional,
    /// Match if every span of either list matches some span of the other.
    Covering,
}

impl SpanListPolicy {
    /// Snake-case name, as used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnyPair => "any_pair",
            Self::Positional => "positional",
            Self::Covering => "covering",
        }
    }
}

impl fmt::Display for SpanListPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpanListPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "any_pair" | "any" => Ok(Self::AnyPair),
            "positional" => Ok(Self::Positional),
            "covering" | "all" => Ok(Self::Covering),
            other => Err(Error::parse(format!("unknown span list policy: {other}"))),
        }
    }
}

// =============================================================================
// SpanComparator
// =============================================================================

/// A span matching strategy.
///
/// Implementors supply the boundary predicate ([`matches`](Self::matches)),
/// the overlap gate and a list policy; `compare` and `compare_lists` are
/// derived from those and should not normally be overridden.
pub trait SpanComparator {
    /// Whether spans must overlap before the predicate is consulted.
    fn overlap_required(&self) -> bool;

    /// The strategy's match predicate for two single spans.
    fn matches(&self, a: &Span, b: &Span) -> bool;

    /// Aggregation policy used by [`compare_lists`](Self::compare_lists).
    fn list_policy(&self) -> SpanListPolicy {
        SpanListPolicy::AnyPair
    }

    /// Sign for spans that overlap but do not match.
    ///
    /// Never returns `Equal`.
    fn tie_break(&self, a: &Span, b: &Span) -> Ordering {
        strictly_ordered(a.cmp(b))
    }

    /// Compare two spans: `Equal` iff they match.
    fn compare(&self, a: &Span, b: &Span) -> Ordering {
        if self.overlap_required() && !a.overlaps(b) {
            return strictly_ordered(a.cmp(b));
        }
        if self.matches(a, b) {
            Ordering::Equal
        } else {
            self.tie_break(a, b)
        }
    }

    /// True if `compare(a, b)` is `Equal`.
    fn is_match(&self, a: &Span, b: &Span) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Compare two span lists under [`list_policy`](Self::list_policy).
    ///
    /// Two empty lists compare `Equal`; an empty list orders before any
    /// non-empty one.
    fn compare_lists(&self, a: &[Span], b: &[Span]) -> Ordering {
        let (bound_a, bound_b) = match (bounding_span(a), bounding_span(b)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => (x, y),
        };

        if self.lists_match(a, b) {
            return Ordering::Equal;
        }

        let earliest = |spans: &[Span]| spans.iter().min().copied();
        if self.overlap_required() && !spans_overlap(a, b) {
            return match (earliest(a), earliest(b)) {
                (Some(x), Some(y)) if x != y => strictly_ordered(x.cmp(&y)),
                _ => strictly_ordered(a.cmp(b)),
            };
        }

        if bound_a == bound_b {
            // Same extent: order by the component spans instead.
            strictly_ordered(a.cmp(b))
        } else {
            self.tie_break(&bound_a, &bound_b)
        }
    }

    /// True if `compare_lists(a, b)` would return `Equal` for non-empty lists.
    fn lists_match(&self, a: &[Span], b: &[Span]) -> bool {
        let pair = |x: &Span, y: &Span| self.is_match(x, y);
        match self.list_policy() {
            SpanListPolicy::AnyPair => a.iter().any(|x| b.iter().any(|y| pair(x, y))),
            SpanListPolicy::Positional => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| pair(x, y))
            }
            SpanListPolicy::Covering => {
                a.iter().all(|x| b.iter().any(|y| pair(x, y)))
                    && b.iter().all(|y| a.iter().any(|x| pair(x, y)))
            }
        }
    }
}

/// Map `Equal` to `Greater` so a non-matching pair never reports a match.
fn strictly_ordered(ord: Ordering) -> Ordering {
    match ord {
        Ordering::Equal => Ordering::Greater,
        other => other,
    }
}

/// Shorthand for comparators that are unit-like apart from their list policy.
macro_rules! span_comparator {
    (
        $(#[$meta:meta])*
        $name:ident, overlap_required = $overlap:expr, |$a:ident, $b:ident| $pred:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name {
            list_policy: SpanListPolicy,
        }

        impl $name {
            /// Create the comparator with the default list policy.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Use a different span list aggregation policy.
            #[must_use]
            pub fn with_list_policy(mut self, policy: SpanListPolicy) -> Self {
                self.list_policy = policy;
                self
            }
        }

        impl SpanComparator for $name {
            fn overlap_required(&self) -> bool {
                $overlap
            }

            fn matches(&self, $a: &Span, $b: &Span) -> bool {
                $pred
            }

            fn list_policy(&self) -> SpanListPolicy {
                self.list_policy
            }
        }
    };
}

span_comparator!(
    /// Spans match when they begin at the same offset and overlap.
    ///
    /// Non-matching spans are ordered by start offset.
    SharedStartSpanComparator,
    overlap_required = true,
    |a, b| a.shares_start(b)
);

span_comparator!(
    /// Spans match when they end at the same offset and overlap.
    ///
    /// Non-matching spans are ordered by start offset, then end offset.
    SharedEndSpanComparator,
    overlap_required = true,
    |a, b| a.shares_end(b)
);

span_comparator!(
    /// Spans match only when both boundaries are identical.
    StrictSpanComparator,
    overlap_required = false,
    |a, b| a == b
);

span_comparator!(
    /// Spans match when they share at least one character.
    OverlapSpanComparator,
    overlap_required = true,
    |a, b| a.overlaps(b)
);

span_comparator!(
    /// Spans match when one contains the other.
    SubsumptionSpanComparator,
    overlap_required = true,
    |a, b| a.contains(b) || b.contains(a)
);

// =============================================================================
// Strategy selection
// =============================================================================

/// Named matching strategy, resolvable to a boxed [`SpanComparator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// [`StrictSpanComparator`]
    #[default]
    Strict,
    /// [`SharedStartSpanComparator`]
    SharedStart,
    /// [`SharedEndSpanComparator`]
    SharedEnd,
    /// [`OverlapSpanComparator`]
    Overlap,
    /// [`SubsumptionSpanComparator`]
    Subsumption,
}

impl MatchStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [MatchStrategy; 5] = [
        Self::Strict,
        Self::SharedStart,
        Self::SharedEnd,
        Self::Overlap,
        Self::Subsumption,
    ];

    /// Build the comparator for this strategy.
    #[must_use]
    pub fn comparator(self, policy: SpanListPolicy) -> Box<dyn SpanComparator + Send + Sync> {
        match self {
            Self::Strict => Box::new(StrictSpanComparator::new().with_list_policy(policy)),
            Self::SharedStart => Box::new(SharedStartSpanComparator::new().with_list_policy(policy)),
            Self::SharedEnd => Box::new(SharedEndSpanComparator::new().with_list_policy(policy)),
            Self::Overlap => Box::new(OverlapSpanComparator::new().with_list_policy(policy)),
            Self::Subsumption => Box::new(SubsumptionSpanComparator::new().with_list_policy(policy)),
        }
    }

    /// Snake-case name, as used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::SharedStart => "shared_start",
            Self::SharedEnd => "shared_end",
            Self::Overlap => "overlap",
            Self::Subsumption => "subsumption",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| Error::parse(format!("unknown match strategy: {s}")))
    }
}
