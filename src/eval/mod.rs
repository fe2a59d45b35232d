//! Scoring one annotation set against another.
//!
//! A test set is aligned against a gold set with a [`SpanComparator`]
//! chosen through [`MatchConfig`]. Alignment is greedy and one-to-one: each
//! test annotation, in span order, takes the first unmatched gold annotation
//! it matches.
//!
//! ```text
//! gold:  [protein 0..4]      [protein 20..30]
//! test:  [protein 0..6]                         [gene 40..44]
//!
//! shared start:  TP = 1 (0..4 ~ 0..6)   FP = 1 (gene)   FN = 1 (20..30)
//! strict:        TP = 0                 FP = 2          FN = 2
//! ```
//!
//! # Example
//!
//! ```rust
//! use annoframe::eval::{evaluate, MatchConfig};
//! use annoframe::{MatchStrategy, MentionGraph, Span};
//!
//! let mut gold = MentionGraph::new();
//! let g = gold.create_class_mention("protein");
//! gold.create_text_annotation(vec![Span::new(0, 4).unwrap()], g).unwrap();
//!
//! let mut test = MentionGraph::new();
//! let t = test.create_class_mention("protein");
//! test.create_text_annotation(vec![Span::new(0, 6).unwrap()], t).unwrap();
//!
//! let strict = evaluate(&gold, &test, &MatchConfig::default());
//! assert_eq!(strict.true_positives, 0);
//!
//! let lenient = evaluate(
//!     &gold,
//!     &test,
//!     &MatchConfig::new().with_strategy(MatchStrategy::SharedStart),
//! );
//! assert_eq!(lenient.true_positives, 1);
//! assert!((lenient.f1 - 1.0).abs() < 1e-9);
//! ```

mod config;

pub use config::MatchConfig;

use annoframe_core::{
    AnnotationId, Mention, MentionGraph, SpanComparator, TextAnnotation,
};
use serde::{Deserialize, Serialize};

/// A gold annotation paired with the test annotation that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Annotation in the gold graph.
    pub gold: AnnotationId,
    /// Annotation in the test graph.
    pub test: AnnotationId,
}

/// Precision, recall and F1 of one alignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResults {
    /// Precision (0.0-1.0)
    pub precision: f64,
    /// Recall (0.0-1.0)
    pub recall: f64,
    /// F1 score (0.0-1.0)
    pub f1: f64,
    /// Test annotations matched to a gold annotation
    pub true_positives: usize,
    /// Test annotations with no gold counterpart
    pub false_positives: usize,
    /// Gold annotations with no test counterpart
    pub false_negatives: usize,
    /// Matched annotations, in test span order
    pub matched: Vec<MatchedPair>,
}

impl MatchResults {
    /// Compute scores from raw counts.
    ///
    /// Two empty sets agree perfectly and score 1.0 everywhere.
    #[must_use]
    pub fn from_counts(tp: usize, fp: usize, fn_count: usize, matched: Vec<MatchedPair>) -> Self {
        if tp + fp + fn_count == 0 {
            return Self {
                precision: 1.0,
                recall: 1.0,
                f1: 1.0,
                matched,
                ..Self::default()
            };
        }

        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_count > 0 {
            tp as f64 / (tp + fn_count) as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_count,
            matched,
        }
    }
}

/// Aligns annotation sets under a fixed [`MatchConfig`].
pub struct AnnotationMatcher {
    config: MatchConfig,
    comparator: Box<dyn SpanComparator + Send + Sync>,
}

impl std::fmt::Debug for AnnotationMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnnotationMatcher {
    /// Create a matcher for the given configuration.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let comparator = config.comparator();
        Self { config, comparator }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// True if two annotations match under this configuration.
    ///
    /// Each annotation is resolved against its own graph to find its root
    /// frame's type.
    #[must_use]
    pub fn annotations_match(
        &self,
        gold_graph: &MentionGraph,
        gold: &TextAnnotation,
        test_graph: &MentionGraph,
        test: &TextAnnotation,
    ) -> bool {
        if self.config.require_type_match
            && frame_type(gold_graph, gold) != frame_type(test_graph, test)
        {
            return false;
        }
        self.comparator
            .compare_lists(gold.spans(), test.spans())
            .is_eq()
    }

    /// Align every text annotation of `test` against those of `gold`.
    #[must_use]
    pub fn evaluate(&self, gold: &MentionGraph, test: &MentionGraph) -> MatchResults {
        let gold_sorted = sorted_by_extent(gold);
        let test_sorted = sorted_by_extent(test);

        let mut gold_matched = vec![false; gold_sorted.len()];
        let mut matched = Vec::new();
        let mut fp = 0;

        for t in &test_sorted {
            let found = gold_sorted.iter().enumerate().find(|(i, g)| {
                !gold_matched[*i] && self.annotations_match(gold, g, test, t)
            });
            match found {
                Some((i, g)) => {
                    log::trace!("{} matched gold {} ({})", t.id(), g.id(), self.config.strategy);
                    gold_matched[i] = true;
                    matched.push(MatchedPair {
                        gold: g.id(),
                        test: t.id(),
                    });
                }
                None => {
                    log::trace!("{} has no gold counterpart", t.id());
                    fp += 1;
                }
            }
        }

        let tp = matched.len();
        let fn_count = gold_matched.iter().filter(|m| !**m).count();
        log::debug!(
            "aligned {} test against {} gold annotations with {}/{}: tp={} fp={} fn={}",
            test_sorted.len(),
            gold_sorted.len(),
            self.config.strategy,
            self.config.list_policy,
            tp,
            fp,
            fn_count
        );
        MatchResults::from_counts(tp, fp, fn_count, matched)
    }
}

/// Align `test` against `gold` with a one-off matcher.
#[must_use]
pub fn evaluate(gold: &MentionGraph, test: &MentionGraph, config: &MatchConfig) -> MatchResults {
    AnnotationMatcher::new(config.clone()).evaluate(gold, test)
}

fn frame_type<'a>(graph: &'a MentionGraph, annotation: &TextAnnotation) -> Option<&'a str> {
    graph
        .class_mention(annotation.class_mention())
        .map(Mention::mention_name)
}

fn sorted_by_extent(graph: &MentionGraph) -> Vec<&TextAnnotation> {
    let mut annotations: Vec<&TextAnnotation> = graph.text_annotations().collect();
    annotations.sort_by_key(|ta| (ta.bounding_span(), ta.id()));
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoframe_core::{MatchStrategy, Span, SpanListPolicy};

    fn annotate(graph: &mut MentionGraph, name: &str, spans: &[(usize, usize)]) -> AnnotationId {
        let frame = graph.create_class_mention(name);
        let spans = spans
            .iter()
            .map(|&(s, e)| Span::new(s, e).unwrap())
            .collect();
        graph.create_text_annotation(spans, frame).unwrap()
    }

    #[test]
    fn test_empty_sets_score_perfectly() {
        let results = evaluate(&MentionGraph::new(), &MentionGraph::new(), &MatchConfig::default());
        assert!((results.f1 - 1.0).abs() < 1e-9);
        assert_eq!(results.true_positives, 0);
    }

    #[test]
    fn test_strict_vs_shared_start() {
        let mut gold = MentionGraph::new();
        annotate(&mut gold, "protein", &[(0, 4)]);
        annotate(&mut gold, "protein", &[(20, 30)]);
        let mut test = MentionGraph::new();
        annotate(&mut test, "protein", &[(0, 6)]);
        annotate(&mut test, "gene", &[(40, 44)]);

        let strict = evaluate(&gold, &test, &MatchConfig::default());
        assert_eq!((strict.true_positives, strict.false_positives, strict.false_negatives), (0, 2, 2));

        let shared = evaluate(&gold, &test, &MatchConfig::new().with_strategy(MatchStrategy::SharedStart));
        assert_eq!((shared.true_positives, shared.false_positives, shared.false_negatives), (1, 1, 1));
        assert!((shared.precision - 0.5).abs() < 1e-9);
        assert!((shared.recall - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_type_match_can_be_disabled() {
        let mut gold = MentionGraph::new();
        annotate(&mut gold, "protein", &[(0, 4)]);
        let mut test = MentionGraph::new();
        annotate(&mut test, "gene", &[(0, 4)]);

        assert_eq!(evaluate(&gold, &test, &MatchConfig::default()).true_positives, 0);
        let untyped = MatchConfig::new().with_type_match(false);
        assert_eq!(evaluate(&gold, &test, &untyped).true_positives, 1);
    }

    #[test]
    fn test_alignment_is_one_to_one() {
        let mut gold = MentionGraph::new();
        let g = annotate(&mut gold, "protein", &[(0, 10)]);
        let mut test = MentionGraph::new();
        annotate(&mut test, "protein", &[(0, 4)]);
        annotate(&mut test, "protein", &[(0, 8)]);

        let config = MatchConfig::new().with_strategy(MatchStrategy::SharedStart);
        let results = evaluate(&gold, &test, &config);
        assert_eq!(results.true_positives, 1);
        assert_eq!(results.false_positives, 1);
        assert_eq!(results.matched[0].gold, g);
    }

    #[test]
    fn test_discontinuous_policy() {
        let mut gold = MentionGraph::new();
        annotate(&mut gold, "disease", &[(0, 4), (15, 24)]);
        let mut test = MentionGraph::new();
        annotate(&mut test, "disease", &[(15, 24)]);

        let any_pair = MatchConfig::new().with_strategy(MatchStrategy::Strict);
        assert_eq!(evaluate(&gold, &test, &any_pair).true_positives, 1);

        let covering = any_pair.with_list_policy(SpanListPolicy::Covering);
        assert_eq!(evaluate(&gold, &test, &covering).true_positives, 0);
    }
}
