//! Ordering rules for inline markup tags.
//!
//! When annotations are rendered as bracketed markup, several tags can land on
//! the same character offset. Opening tags that share a start offset and
//! closing tags that share an end offset each need their own order so the
//! output nests properly:
//!
//! ```text
//! spans:   protein [0,20)   gene [0,10)
//! output:  <protein><gene>p53 gene</gene> product</protein>
//!          ^ longer annotation opens first
//! ```
//!
//! Callers group tags by their shared boundary before sorting; the comparators
//! here only look at the boundary that varies.

use crate::error::{Error, Result};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tag emitted before the annotated text, e.g. `<protein>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixTag {
    /// Tag contents.
    pub content: String,
    /// Span of the annotation the tag belongs to.
    pub anchor: Span,
}

/// Tag emitted after the annotated text, e.g. `</protein>` or `/NN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostfixTag {
    /// Tag contents.
    pub content: String,
    /// Span of the annotation the tag belongs to.
    pub anchor: Span,
}

impl PrefixTag {
    /// Create a prefix tag.
    #[must_use]
    pub fn new(content: impl Into<String>, anchor: Span) -> Self {
        Self {
            content: content.into(),
            anchor,
        }
    }
}

impl PostfixTag {
    /// Create a postfix tag.
    #[must_use]
    pub fn new(content: impl Into<String>, anchor: Span) -> Self {
        Self {
            content: content.into(),
            anchor,
        }
    }
}

/// Order prefix tags that share a start offset.
///
/// Larger end offsets come first; equal ends fall back to ascending content.
#[must_use]
pub fn prefix_tag_order(a: &PrefixTag, b: &PrefixTag) -> Ordering {
    b.anchor
        .end()
        .cmp(&a.anchor.end())
        .then_with(|| a.content.cmp(&b.content))
}

/// Order postfix tags that share an end offset.
///
/// The annotation that started later closes first, so larger start offsets
/// come first; equal starts fall back to descending content.
#[must_use]
pub fn postfix_tag_order(a: &PostfixTag, b: &PostfixTag) -> Ordering {
    b.anchor
        .start()
        .cmp(&a.anchor.start())
        .then_with(|| b.content.cmp(&a.content))
}

/// Sort prefix tags that were already grouped by start offset.
pub fn sort_prefix_tags(tags: &mut [PrefixTag]) {
    tags.sort_by(prefix_tag_order);
}

/// Sort postfix tags that were already grouped by end offset.
pub fn sort_postfix_tags(tags: &mut [PostfixTag]) {
    tags.sort_by(postfix_tag_order);
}

/// Either kind of inline tag.
///
/// There is no context-free order between tags; use [`InlineTag::try_cmp`],
/// which refuses to compare a prefix tag with a postfix tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineTag {
    /// Opening tag.
    Prefix(PrefixTag),
    /// Closing tag.
    Postfix(PostfixTag),
}

impl InlineTag {
    /// Tag contents.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Prefix(t) => &t.content,
            Self::Postfix(t) => &t.content,
        }
    }

    /// Span of the annotation the tag belongs to.
    #[must_use]
    pub fn anchor(&self) -> Span {
        match self {
            Self::Prefix(t) => t.anchor,
            Self::Postfix(t) => t.anchor,
        }
    }

    /// Compare two tags of the same kind that share their fixed boundary.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedOperation`] when a prefix tag is compared with a
    ///   postfix tag.
    /// - [`Error::InvalidInput`] when two prefix tags start at different
    ///   offsets, or two postfix tags end at different offsets.
    pub fn try_cmp(&self, other: &InlineTag) -> Result<Ordering> {
        match (self, other) {
            (Self::Prefix(a), Self::Prefix(b)) => {
                if a.anchor.start() != b.anchor.start() {
                    return Err(Error::invalid_input(format!(
                        "prefix tags {} and {} do not share a start offset",
                        a.anchor, b.anchor
                    )));
                }
                Ok(prefix_tag_order(a, b))
            }
            (Self::Postfix(a), Self::Postfix(b)) => {
                if a.anchor.end() != b.anchor.end() {
                    return Err(Error::invalid_input(format!(
                        "postfix tags {} and {} do not share an end offset",
                        a.anchor, b.anchor
                    )));
                }
                Ok(postfix_tag_order(a, b))
            }
            _ => Err(Error::unsupported(
                "inline tag order depends on context; compare prefix tags with prefix tags \
                 and postfix tags with postfix tags",
            )),
        }
    }
}

impl From<PrefixTag> for InlineTag {
    fn from(tag: PrefixTag) -> Self {
        Self::Prefix(tag)
    }
}

impl From<PostfixTag> for InlineTag {
    fn from(tag: PostfixTag) -> Self {
        Self::Postfix(tag)
    }
}
