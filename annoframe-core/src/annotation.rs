//! Text annotations: span sets bound to a semantic frame.

use crate::mention::MentionId;
use crate::span::{bounding_span, covered_text_of, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a text annotation within one [`MentionGraph`](crate::MentionGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// One or more text spans bound to a root [`ClassMention`](crate::ClassMention).
///
/// The annotation owns its frame: the binding is set up and changed only
/// through [`MentionGraph`](crate::MentionGraph), which keeps the frame's
/// back-reference in sync and refuses to share a frame between annotations.
/// The graph hands out shared references only; spans and metadata are
/// changed through graph methods such as
/// [`MentionGraph::set_annotation_spans`](crate::MentionGraph::set_annotation_spans).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnnotation {
    id: AnnotationId,
    spans: Vec<Span>,
    class_mention: MentionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotator: Option<String>,
}

impl TextAnnotation {
    pub(crate) fn new(id: AnnotationId, spans: Vec<Span>, class_mention: MentionId) -> Self {
        Self {
            id,
            spans,
            class_mention,
            document_id: None,
            annotator: None,
        }
    }

    /// Identifier within the owning graph.
    #[must_use]
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Spans in the order they were supplied.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub(crate) fn set_spans(&mut self, spans: Vec<Span>) {
        self.spans = spans;
    }

    /// Identifier of the source document.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub(crate) fn set_document_id(&mut self, document_id: Option<String>) {
        self.document_id = document_id;
    }

    /// Who or what produced the annotation.
    #[must_use]
    pub fn annotator(&self) -> Option<&str> {
        self.annotator.as_deref()
    }

    pub(crate) fn set_annotator(&mut self, annotator: Option<String>) {
        self.annotator = annotator;
    }

    /// Root frame of this annotation.
    #[must_use]
    pub fn class_mention(&self) -> MentionId {
        self.class_mention
    }

    pub(crate) fn set_class_mention(&mut self, frame: MentionId) {
        self.class_mention = frame;
    }

    /// Smallest span covering every span of the annotation.
    #[must_use]
    pub fn bounding_span(&self) -> Option<Span> {
        bounding_span(&self.spans)
    }

    /// True if the annotation covers more than one region.
    #[must_use]
    pub fn is_discontinuous(&self) -> bool {
        self.spans.len() > 1
    }

    /// Covered text, discontinuous regions joined by a single space.
    #[must_use]
    pub fn covered_text(&self, document_text: &str) -> String {
        covered_text_of(&self.spans, document_text, " ")
    }
}
