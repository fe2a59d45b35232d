//! # annoframe
//!
//! Span matching and semantic frames for text annotations.
//!
//! - **Spans**: half-open character intervals, single or discontinuous
//! - **Comparators**: shared-start, shared-end, strict, overlap and
//!   subsumption matching, each usable as an ordering too
//! - **Frames**: `ClassMention`s with complex (frame-valued) and primitive
//!   (literal-valued) slots, bound to text by `TextAnnotation`s
//! - **Evaluation**: precision/recall/F1 of one annotation set against another
//!
//! ## Quick Start
//!
//! ```rust
//! use annoframe::{MentionGraph, SharedStartSpanComparator, Span, SpanComparator};
//!
//! let mut graph = MentionGraph::new();
//! let mutation = graph.create_class_mention("mutation event");
//! let protein = graph.create_class_mention("protein");
//! graph.create_complex_slot_mention(mutation, "affected protein").unwrap();
//! graph
//!     .add_class_mention_filler(mutation, "affected protein", protein)
//!     .unwrap();
//! graph
//!     .create_primitive_slot_mention(mutation, "wild-type residue", "Ala")
//!     .unwrap();
//!
//! let gold = Span::new(0, 10).unwrap();
//! let predicted = Span::new(0, 5).unwrap();
//! assert!(SharedStartSpanComparator::new().is_match(&gold, &predicted));
//! ```
//!
//! The data model lives in [`annoframe_core`] and is re-exported here.

#![warn(missing_docs)]

pub mod eval;

pub use annoframe_core::*;
