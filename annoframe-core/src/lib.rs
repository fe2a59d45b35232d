//! # annoframe-core
//!
//! Core types for annoframe: the data structures every consumer shares.
//!
//! This crate provides:
//! - **Spans**: `Span` and helpers for discontinuous span sets
//! - **Span comparators**: `SpanComparator` and the shared-start, shared-end,
//!   strict, overlap and subsumption strategies
//! - **Inline tags**: ordering rules for prefix and postfix markup tags
//! - **Mention graph**: `ClassMention` frames with complex and primitive
//!   slots, owned by `TextAnnotation`s inside a `MentionGraph` arena
//!
//! Everything here is pure and synchronous. Errors are returned to the
//! caller, never logged.

#![warn(missing_docs)]

pub mod annotation;
pub mod comparator;
pub mod error;
pub mod graph;
pub mod inline;
pub mod mention;
pub mod span;
pub mod types;

// Re-exports for convenience
pub use annotation::{AnnotationId, TextAnnotation};
pub use comparator::{
    MatchStrategy, OverlapSpanComparator, SharedEndSpanComparator, SharedStartSpanComparator,
    SpanComparator, SpanListPolicy, StrictSpanComparator, SubsumptionSpanComparator,
};
pub use error::{Error, Result};
pub use graph::{ComplexSlotNode, FrameNode, FrameRef, MentionGraph, PrimitiveSlotNode};
pub use inline::{
    postfix_tag_order, prefix_tag_order, sort_postfix_tags, sort_prefix_tags, InlineTag,
    PostfixTag, PrefixTag,
};
pub use mention::{
    ClassMention, ComplexSlotMention, Mention, MentionId, PrimitiveKind, PrimitiveSlotMention,
    SlotMentionRef, SlotValue, SlotValues,
};
pub use span::{bounding_span, covered_text_of, spans_overlap, Span};
pub use types::ClassMentionType;
