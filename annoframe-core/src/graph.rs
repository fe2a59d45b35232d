//! The mention graph: an arena owning every frame, slot and text annotation
//! of one document.
//!
//! Frames are addressed by [`MentionId`]. Complex slots store the ids of
//! their fillers, so a frame may be nested arbitrarily deep and a slot may
//! even point back at an ancestor. Traversals ([`MentionGraph::descendants`],
//! [`MentionGraph::frame_tree`]) keep a visited set and never loop.
//!
//! ```text
//!  TextAnnotation T0 [4,30) ──owns──> ClassMention M0 "binding event"
//!                                      ├─ complex "participant" ─> M1, M2
//!                                      └─ primitive "negated"   = [false]
//!  TextAnnotation T1 [4,7)  ──owns──> ClassMention M1 "protein"
//!  TextAnnotation T2 [20,30) ─owns──> ClassMention M2 "protein"
//! ```
//!
//! The binding between a [`TextAnnotation`] and its root frame is exclusive
//! and two-way: the frame records the annotation that owns it, and binding a
//! frame that another annotation already owns fails with
//! [`Error::InvalidInput`].
//!
//! Every fallible mutation validates before it writes, so a failed call leaves
//! the graph exactly as it was.
//!
//! # Example
//!
//! ```rust
//! use annoframe_core::{MentionGraph, Span};
//!
//! let mut graph = MentionGraph::new();
//! let event = graph.create_class_mention("binding event");
//! let protein = graph.create_class_mention("protein");
//!
//! graph.create_complex_slot_mention(event, "participant").unwrap();
//! graph.add_class_mention_filler(event, "participant", protein).unwrap();
//! graph.create_primitive_slot_mention(event, "negated", false).unwrap();
//!
//! let ta = graph
//!     .create_text_annotation(vec![Span::new(4, 30).unwrap()], event)
//!     .unwrap();
//! assert_eq!(graph.class_mention(event).unwrap().text_annotation(), Some(ta));
//! assert_eq!(graph.descendants(event), vec![event, protein]);
//! ```

use crate::annotation::{AnnotationId, TextAnnotation};
use crate::error::{Error, Result};
use crate::mention::{
    ClassMention, ComplexSlotMention, Mention, MentionId, PrimitiveSlotMention, SlotValue,
    SlotValues,
};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Arena of frames, slots and text annotations for one document.
///
/// Mutation is single-writer: callers serialize writes per graph. Shared
/// read-only access from many threads is fine.
#[derive(Debug, Clone, Default)]
pub struct MentionGraph {
    frames: BTreeMap<MentionId, ClassMention>,
    annotations: BTreeMap<AnnotationId, TextAnnotation>,
    /// Slot id -> owning frame id.
    slot_owners: HashMap<MentionId, MentionId>,
    next_mention_id: u64,
    next_annotation_id: u64,
}

impl MentionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the graph holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True if `id` names a frame or a slot in this graph.
    #[must_use]
    pub fn is_id_in_use(&self, id: MentionId) -> bool {
        self.frames.contains_key(&id) || self.slot_owners.contains_key(&id)
    }

    /// Reserve a fresh mention id, for building detached slots.
    pub fn allocate_id(&mut self) -> MentionId {
        while self.is_id_in_use(MentionId(self.next_mention_id)) {
            self.next_mention_id += 1;
        }
        let id = MentionId(self.next_mention_id);
        self.next_mention_id += 1;
        id
    }

    fn observe_id(&mut self, id: MentionId) {
        self.next_mention_id = self.next_mention_id.max(id.0.saturating_add(1));
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Create an empty frame with a generated id.
    pub fn create_class_mention(&mut self, name: impl Into<String>) -> MentionId {
        let id = self.allocate_id();
        self.frames.insert(id, ClassMention::new(id, name.into()));
        id
    }

    /// Create an empty frame with a caller-assigned id.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the id is already used by a frame or slot.
    pub fn create_class_mention_with_id(
        &mut self,
        id: MentionId,
        name: impl Into<String>,
    ) -> Result<MentionId> {
        if self.is_id_in_use(id) {
            return Err(Error::invalid_input(format!("mention id {id} is already in use")));
        }
        self.observe_id(id);
        self.frames.insert(id, ClassMention::new(id, name.into()));
        Ok(id)
    }

    /// Frame with the given id.
    #[must_use]
    pub fn class_mention(&self, id: MentionId) -> Option<&ClassMention> {
        self.frames.get(&id)
    }

    /// All frames, ordered by id.
    pub fn class_mentions(&self) -> impl Iterator<Item = &ClassMention> {
        self.frames.values()
    }

    /// Rename a frame.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist.
    pub fn set_mention_name(&mut self, frame: MentionId, name: impl Into<String>) -> Result<()> {
        self.frame_mut(frame)?.set_name(name.into());
        Ok(())
    }

    fn frame(&self, id: MentionId) -> Result<&ClassMention> {
        self.frames
            .get(&id)
            .ok_or_else(|| Error::invalid_input(format!("no class mention with id {id}")))
    }

    fn frame_mut(&mut self, id: MentionId) -> Result<&mut ClassMention> {
        self.frames
            .get_mut(&id)
            .ok_or_else(|| Error::invalid_input(format!("no class mention with id {id}")))
    }

    fn check_fillers(&self, fillers: &[MentionId]) -> Result<()> {
        match fillers.iter().find(|f| !self.frames.contains_key(*f)) {
            Some(bad) => Err(Error::invalid_input(format!(
                "{bad} is not a class mention in this graph and cannot fill a complex slot"
            ))),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Complex slots
    // =========================================================================

    /// Insert an empty complex slot named `name` and return its id.
    ///
    /// If the frame already has a complex slot with that name, its id is
    /// returned and nothing changes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist.
    pub fn create_complex_slot_mention(
        &mut self,
        frame: MentionId,
        name: impl Into<String>,
    ) -> Result<MentionId> {
        let name = name.into();
        if let Some(existing) = self.frame(frame)?.complex_slot_mention(&name) {
            return Ok(existing.mention_id());
        }
        let id = self.allocate_id();
        self.frame_mut(frame)?
            .push_complex_slot(ComplexSlotMention::new(id, name));
        self.slot_owners.insert(id, frame);
        Ok(id)
    }

    /// Append a detached complex slot to a frame.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist, already has a
    /// complex slot of that name, the slot id is in use, or a filler is not
    /// a frame of this graph.
    pub fn add_complex_slot_mention(
        &mut self,
        frame: MentionId,
        slot: ComplexSlotMention,
    ) -> Result<()> {
        let target = self.frame(frame)?;
        if target.complex_slot_mention(slot.mention_name()).is_some() {
            return Err(Error::invalid_input(format!(
                "{frame} already has a complex slot named '{}'",
                slot.mention_name()
            )));
        }
        if self.is_id_in_use(slot.mention_id()) {
            return Err(Error::invalid_input(format!(
                "mention id {} is already in use",
                slot.mention_id()
            )));
        }
        self.check_fillers(slot.class_mention_fillers())?;

        let id = slot.mention_id();
        self.frame_mut(frame)?.push_complex_slot(slot);
        self.slot_owners.insert(id, frame);
        self.observe_id(id);
        Ok(())
    }

    /// Replace every complex slot of a frame.
    ///
    /// Slots may reuse the ids of the complex slots they replace, so passing
    /// back [`ClassMention::complex_slot_mentions`] is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist, two slots share a
    /// name or id, an id belongs to anything other than one of this frame's
    /// complex slots, or a filler is not a frame. The frame is unchanged.
    pub fn set_complex_slot_mentions(
        &mut self,
        frame: MentionId,
        slots: Vec<ComplexSlotMention>,
    ) -> Result<()> {
        let target = self.frame(frame)?;
        let replaceable: HashSet<MentionId> = target
            .complex_slot_mentions()
            .iter()
            .map(Mention::mention_id)
            .collect();
        self.check_replacement(frame, slots.iter().map(|s| (s.mention_id(), s.mention_name())), &replaceable)?;
        for slot in &slots {
            self.check_fillers(slot.class_mention_fillers())?;
        }

        let new_ids: Vec<MentionId> = slots.iter().map(Mention::mention_id).collect();
        let old = self.frame_mut(frame)?.replace_complex_slots(slots);
        self.rebind_slot_owners(frame, old.iter().map(Mention::mention_id), new_ids);
        Ok(())
    }

    /// Append a frame to a complex slot.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or
    /// `filler` is not a frame of this graph.
    pub fn add_class_mention_filler(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        filler: MentionId,
    ) -> Result<()> {
        self.check_fillers(&[filler])?;
        self.complex_slot_mut(frame, slot_name)?.push_filler(filler);
        Ok(())
    }

    /// Replace the fillers of a complex slot.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or any
    /// filler is not a frame of this graph. The slot is unchanged.
    pub fn set_class_mention_fillers(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        fillers: Vec<MentionId>,
    ) -> Result<()> {
        self.check_fillers(&fillers)?;
        self.complex_slot_mut(frame, slot_name)?
            .replace_fillers(fillers);
        Ok(())
    }

    fn complex_slot_mut(
        &mut self,
        frame: MentionId,
        slot_name: &str,
    ) -> Result<&mut ComplexSlotMention> {
        self.frame_mut(frame)?
            .complex_slot_mut(slot_name)
            .ok_or_else(|| {
                Error::invalid_input(format!("{frame} has no complex slot named '{slot_name}'"))
            })
    }

    // =========================================================================
    // Primitive slots
    // =========================================================================

    /// Create a single-valued primitive slot, or append to an existing one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist or a primitive slot
    /// of a different kind already uses the name.
    pub fn create_primitive_slot_mention(
        &mut self,
        frame: MentionId,
        name: impl Into<String>,
        value: impl Into<SlotValue>,
    ) -> Result<MentionId> {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.frame_mut(frame)?.primitive_slot_mut(&name) {
            existing.add_slot_value(value)?;
            return Ok(existing.mention_id());
        }
        let id = self.allocate_id();
        self.frame_mut(frame)?
            .push_primitive_slot(PrimitiveSlotMention::new(id, name, value));
        self.slot_owners.insert(id, frame);
        Ok(id)
    }

    /// Append a detached primitive slot to a frame.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist, already has a
    /// primitive slot of that name, or the slot id is in use.
    pub fn add_primitive_slot_mention(
        &mut self,
        frame: MentionId,
        slot: PrimitiveSlotMention,
    ) -> Result<()> {
        if self
            .frame(frame)?
            .primitive_slot_mention(slot.mention_name())
            .is_some()
        {
            return Err(Error::invalid_input(format!(
                "{frame} already has a primitive slot named '{}'",
                slot.mention_name()
            )));
        }
        if self.is_id_in_use(slot.mention_id()) {
            return Err(Error::invalid_input(format!(
                "mention id {} is already in use",
                slot.mention_id()
            )));
        }

        let id = slot.mention_id();
        self.frame_mut(frame)?.push_primitive_slot(slot);
        self.slot_owners.insert(id, frame);
        self.observe_id(id);
        Ok(())
    }

    /// Replace every primitive slot of a frame.
    ///
    /// # Errors
    ///
    /// Same conditions as [`set_complex_slot_mentions`](Self::set_complex_slot_mentions).
    pub fn set_primitive_slot_mentions(
        &mut self,
        frame: MentionId,
        slots: Vec<PrimitiveSlotMention>,
    ) -> Result<()> {
        let target = self.frame(frame)?;
        let replaceable: HashSet<MentionId> = target
            .primitive_slot_mentions()
            .iter()
            .map(Mention::mention_id)
            .collect();
        self.check_replacement(frame, slots.iter().map(|s| (s.mention_id(), s.mention_name())), &replaceable)?;

        let new_ids: Vec<MentionId> = slots.iter().map(Mention::mention_id).collect();
        let old = self.frame_mut(frame)?.replace_primitive_slots(slots);
        self.rebind_slot_owners(frame, old.iter().map(Mention::mention_id), new_ids);
        Ok(())
    }

    /// Append a value to a primitive slot.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or the
    /// value is of a different kind. The slot is unchanged.
    pub fn add_primitive_slot_value(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        value: impl Into<SlotValue>,
    ) -> Result<()> {
        self.primitive_slot_mut(frame, slot_name)?
            .add_slot_value(value)
    }

    /// Append several values to a primitive slot, all or nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or any
    /// value is of a different kind. The slot is unchanged.
    pub fn add_primitive_slot_values<I, V>(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        values: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<SlotValue>,
    {
        self.primitive_slot_mut(frame, slot_name)?
            .add_slot_values(values)
    }

    /// Replace every value of a primitive slot with a single one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or the
    /// value is of a different kind.
    pub fn overwrite_primitive_slot_value(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        value: impl Into<SlotValue>,
    ) -> Result<()> {
        self.primitive_slot_mut(frame, slot_name)?
            .overwrite_slot_value(value)
    }

    /// Replace the value set of a primitive slot with one of the same kind.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame or slot does not exist, or the
    /// values are of a different kind.
    pub fn set_primitive_slot_values(
        &mut self,
        frame: MentionId,
        slot_name: &str,
        values: SlotValues,
    ) -> Result<()> {
        self.primitive_slot_mut(frame, slot_name)?
            .set_slot_values(values)
    }

    // Only value operations may go through this reference: the slot's name
    // and id are indexed by the graph.
    fn primitive_slot_mut(
        &mut self,
        frame: MentionId,
        slot_name: &str,
    ) -> Result<&mut PrimitiveSlotMention> {
        self.frame_mut(frame)?
            .primitive_slot_mut(slot_name)
            .ok_or_else(|| {
                Error::invalid_input(format!("{frame} has no primitive slot named '{slot_name}'"))
            })
    }

    /// Values of a primitive slot.
    #[must_use]
    pub fn primitive_slot_values(&self, frame: MentionId, slot_name: &str) -> Option<&SlotValues> {
        self.frames
            .get(&frame)?
            .primitive_slot_mention(slot_name)
            .map(PrimitiveSlotMention::slot_values)
    }

    fn check_replacement<'a>(
        &self,
        frame: MentionId,
        slots: impl Iterator<Item = (MentionId, &'a str)>,
        replaceable: &HashSet<MentionId>,
    ) -> Result<()> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for (id, name) in slots {
            if !names.insert(name) {
                return Err(Error::invalid_input(format!(
                    "duplicate slot name '{name}' for {frame}"
                )));
            }
            if !ids.insert(id) {
                return Err(Error::invalid_input(format!("duplicate slot id {id}")));
            }
            if self.is_id_in_use(id) && !replaceable.contains(&id) {
                return Err(Error::invalid_input(format!("mention id {id} is already in use")));
            }
        }
        Ok(())
    }

    fn rebind_slot_owners(
        &mut self,
        frame: MentionId,
        old: impl Iterator<Item = MentionId>,
        new: Vec<MentionId>,
    ) {
        for id in old {
            self.slot_owners.remove(&id);
        }
        for id in new {
            self.slot_owners.insert(id, frame);
            self.observe_id(id);
        }
    }

    /// Frame that owns the slot with the given id.
    #[must_use]
    pub fn slot_owner(&self, slot: MentionId) -> Option<MentionId> {
        self.slot_owners.get(&slot).copied()
    }

    // =========================================================================
    // Text annotations
    // =========================================================================

    /// Bind spans to a frame as a new text annotation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the frame does not exist or is already owned
    /// by another annotation.
    pub fn create_text_annotation(
        &mut self,
        spans: Vec<Span>,
        frame: MentionId,
    ) -> Result<AnnotationId> {
        if let Some(owner) = self.frame(frame)?.text_annotation() {
            return Err(Error::invalid_input(format!(
                "{frame} is already owned by text annotation {owner}"
            )));
        }
        let id = AnnotationId(self.next_annotation_id);
        self.next_annotation_id += 1;
        self.frame_mut(frame)?.set_text_annotation(Some(id));
        self.annotations
            .insert(id, TextAnnotation::new(id, spans, frame));
        Ok(id)
    }

    /// Text annotation with the given id.
    #[must_use]
    pub fn text_annotation(&self, id: AnnotationId) -> Option<&TextAnnotation> {
        self.annotations.get(&id)
    }

    /// Replace the spans of a text annotation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the annotation does not exist.
    pub fn set_annotation_spans(&mut self, id: AnnotationId, spans: Vec<Span>) -> Result<()> {
        self.annotation_mut(id)?.set_spans(spans);
        Ok(())
    }

    /// Set or clear the source document of a text annotation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the annotation does not exist.
    pub fn set_document_id(&mut self, id: AnnotationId, document_id: Option<String>) -> Result<()> {
        self.annotation_mut(id)?.set_document_id(document_id);
        Ok(())
    }

    /// Set or clear the annotator of a text annotation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the annotation does not exist.
    pub fn set_annotator(&mut self, id: AnnotationId, annotator: Option<String>) -> Result<()> {
        self.annotation_mut(id)?.set_annotator(annotator);
        Ok(())
    }

    fn annotation_mut(&mut self, id: AnnotationId) -> Result<&mut TextAnnotation> {
        self.annotations
            .get_mut(&id)
            .ok_or_else(|| Error::invalid_input(format!("no text annotation with id {id}")))
    }

    /// All text annotations, ordered by id.
    pub fn text_annotations(&self) -> impl Iterator<Item = &TextAnnotation> {
        self.annotations.values()
    }

    /// Number of text annotations.
    #[must_use]
    pub fn text_annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Root frame of a text annotation.
    #[must_use]
    pub fn class_mention_of(&self, annotation: AnnotationId) -> Option<&ClassMention> {
        let ta = self.annotations.get(&annotation)?;
        self.frames.get(&ta.class_mention())
    }

    /// Text annotation that owns a frame.
    #[must_use]
    pub fn text_annotation_of(&self, frame: MentionId) -> Option<&TextAnnotation> {
        let owner = self.frames.get(&frame)?.text_annotation()?;
        self.annotations.get(&owner)
    }

    /// Make `frame` the root frame of `annotation`.
    ///
    /// The previous root frame is released and the new frame's back-reference
    /// points at `annotation`. Rebinding the current frame is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if either side does not exist or the frame is
    /// owned by a different annotation. Both bindings are left intact.
    pub fn set_class_mention(&mut self, annotation: AnnotationId, frame: MentionId) -> Result<()> {
        let previous = self
            .annotations
            .get(&annotation)
            .map(TextAnnotation::class_mention)
            .ok_or_else(|| Error::invalid_input(format!("no text annotation with id {annotation}")))?;
        match self.frame(frame)?.text_annotation() {
            Some(owner) if owner == annotation => return Ok(()),
            Some(owner) => {
                return Err(Error::invalid_input(format!(
                    "{frame} is already owned by text annotation {owner}"
                )))
            }
            None => {}
        }

        if let Some(old) = self.frames.get_mut(&previous) {
            old.set_text_annotation(None);
        }
        self.frame_mut(frame)?.set_text_annotation(Some(annotation));
        if let Some(ta) = self.annotations.get_mut(&annotation) {
            ta.set_class_mention(frame);
        }
        Ok(())
    }

    /// Discard a text annotation, releasing its root frame.
    ///
    /// The frame stays in the graph and can be bound again.
    pub fn remove_text_annotation(&mut self, id: AnnotationId) -> Option<TextAnnotation> {
        let ta = self.annotations.remove(&id)?;
        if let Some(frame) = self.frames.get_mut(&ta.class_mention()) {
            frame.set_text_annotation(None);
        }
        Some(ta)
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Frames reachable from `root` through complex slots, depth-first,
    /// each listed once, starting with `root`.
    ///
    /// Empty if `root` is not a frame of this graph.
    #[must_use]
    pub fn descendants(&self, root: MentionId) -> Vec<MentionId> {
        let mut order = Vec::new();
        if !self.frames.contains_key(&root) {
            return order;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(frame) = self.frames.get(&id) {
                // Reverse so the first filler is visited first.
                for slot in frame.complex_slot_mentions().iter().rev() {
                    for filler in slot.class_mention_fillers().iter().rev() {
                        if !visited.contains(filler) {
                            stack.push(*filler);
                        }
                    }
                }
            }
        }
        order
    }

    /// Nested, serializable view of the frame rooted at `root`.
    ///
    /// A frame reached a second time is rendered as [`FrameRef::Visited`].
    /// The walk uses an explicit stack, so chains of any depth are fine.
    #[must_use]
    pub fn frame_tree(&self, root: MentionId) -> Option<FrameNode> {
        let mut visited = HashSet::new();
        visited.insert(root);
        let mut stack = vec![self.pending_node(root)?];

        loop {
            let top = stack.last_mut()?;
            let Some(filler) = top.next_filler(self) else {
                let done = stack.pop()?;
                match stack.last_mut() {
                    Some(parent) => parent.attach(FrameRef::Frame(Box::new(done.node))),
                    None => return Some(done.node),
                }
                continue;
            };
            if visited.contains(&filler) {
                top.attach(FrameRef::Visited(filler));
            } else if let Some(child) = self.pending_node(filler) {
                visited.insert(filler);
                stack.push(child);
            }
        }
    }

    /// Frame node with its spans and primitive slots filled in and empty
    /// complex slots, ready to receive fillers.
    fn pending_node(&self, id: MentionId) -> Option<PendingNode> {
        let frame = self.frames.get(&id)?;

        let spans = frame
            .text_annotation()
            .and_then(|ta| self.annotations.get(&ta))
            .map(|ta| ta.spans().to_vec())
            .unwrap_or_default();

        let primitive_slots = frame
            .primitive_slot_mentions()
            .iter()
            .map(|s| PrimitiveSlotNode {
                name: s.mention_name().to_string(),
                values: s.slot_values().clone(),
            })
            .collect();

        let complex_slots = frame
            .complex_slot_mentions()
            .iter()
            .map(|s| ComplexSlotNode {
                name: s.mention_name().to_string(),
                fillers: Vec::with_capacity(s.class_mention_fillers().len()),
            })
            .collect();

        Some(PendingNode {
            node: FrameNode {
                id,
                name: frame.mention_name().to_string(),
                spans,
                primitive_slots,
                complex_slots,
            },
            slot: 0,
            filler: 0,
        })
    }

    /// JSON of [`frame_tree`](Self::frame_tree), see [`FrameNode::to_json`].
    #[must_use]
    pub fn to_json(&self, root: MentionId) -> Option<String> {
        self.frame_tree(root).map(|tree| tree.to_json())
    }
}

/// A frame under construction in [`MentionGraph::frame_tree`], with a cursor
/// over the graph's fillers.
struct PendingNode {
    node: FrameNode,
    slot: usize,
    filler: usize,
}

impl PendingNode {
    /// Advance to the next filler id. The cursor stays on its slot until
    /// that filler has been attached.
    fn next_filler(&mut self, graph: &MentionGraph) -> Option<MentionId> {
        let slots = graph.frames.get(&self.node.id)?.complex_slot_mentions();
        while let Some(slot) = slots.get(self.slot) {
            if let Some(&filler) = slot.class_mention_fillers().get(self.filler) {
                self.filler += 1;
                return Some(filler);
            }
            self.slot += 1;
            self.filler = 0;
        }
        None
    }

    /// Append a filler to the slot the cursor is in.
    fn attach(&mut self, filler: FrameRef) {
        if let Some(slot) = self.node.complex_slots.get_mut(self.slot) {
            slot.fillers.push(filler);
        }
    }
}

// =============================================================================
// Frame tree view
// =============================================================================

/// A frame with its slots expanded.
///
/// Dropping a node and [`to_json`](Self::to_json) handle any depth. The
/// derived `Clone`, `PartialEq`, `Debug` and serde impls recurse once per
/// nesting level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    /// Frame id.
    pub id: MentionId,
    /// Frame type label.
    pub name: String,
    /// Spans of the owning text annotation, empty for unbound frames.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Span>,
    /// Primitive slots in insertion order.
    #[serde(default)]
    pub primitive_slots: Vec<PrimitiveSlotNode>,
    /// Complex slots in insertion order.
    #[serde(default)]
    pub complex_slots: Vec<ComplexSlotNode>,
}

impl FrameNode {
    /// Compact JSON, in the same shape `serde_json` gives the derived
    /// `Serialize` impl.
    ///
    /// Written with an explicit stack, so deeply nested trees do not
    /// exhaust the call stack. Falls back to `"{}"` if a leaf fails to
    /// serialize.
    #[must_use]
    pub fn to_json(&self) -> String {
        write_frame_json(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn take_children(&mut self, out: &mut Vec<Box<FrameNode>>) {
        for slot in &mut self.complex_slots {
            for filler in slot.fillers.drain(..) {
                if let FrameRef::Frame(child) = filler {
                    out.push(child);
                }
            }
        }
    }
}

impl Drop for FrameNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            // Emptied before it drops, so its own drop does not recurse.
            node.take_children(&mut stack);
        }
    }
}

enum JsonStep<'a> {
    Node(&'a FrameNode),
    Text(String),
}

fn write_frame_json(root: &FrameNode) -> serde_json::Result<String> {
    let mut out = String::new();
    let mut stack = vec![JsonStep::Node(root)];

    while let Some(step) = stack.pop() {
        let node = match step {
            JsonStep::Text(text) => {
                out.push_str(&text);
                continue;
            }
            JsonStep::Node(node) => node,
        };

        out.push_str("{\"id\":");
        out.push_str(&serde_json::to_string(&node.id)?);
        out.push_str(",\"name\":");
        out.push_str(&serde_json::to_string(&node.name)?);
        if !node.spans.is_empty() {
            out.push_str(",\"spans\":");
            out.push_str(&serde_json::to_string(&node.spans)?);
        }
        out.push_str(",\"primitive_slots\":");
        out.push_str(&serde_json::to_string(&node.primitive_slots)?);
        out.push_str(",\"complex_slots\":[");

        let mut steps = Vec::new();
        for (i, slot) in node.complex_slots.iter().enumerate() {
            let sep = if i == 0 { "" } else { "," };
            steps.push(JsonStep::Text(format!(
                "{sep}{{\"name\":{},\"fillers\":[",
                serde_json::to_string(&slot.name)?
            )));
            for (j, filler) in slot.fillers.iter().enumerate() {
                let sep = if j == 0 { "" } else { "," };
                match filler {
                    FrameRef::Frame(child) => {
                        steps.push(JsonStep::Text(format!("{sep}{{\"frame\":")));
                        steps.push(JsonStep::Node(child));
                        steps.push(JsonStep::Text("}".to_string()));
                    }
                    FrameRef::Visited(id) => {
                        steps.push(JsonStep::Text(format!(
                            "{sep}{{\"visited\":{}}}",
                            serde_json::to_string(id)?
                        )));
                    }
                }
            }
            steps.push(JsonStep::Text("]}".to_string()));
        }
        steps.push(JsonStep::Text("]}".to_string()));
        stack.extend(steps.into_iter().rev());
    }
    Ok(out)
}

/// A primitive slot in a [`FrameNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSlotNode {
    /// Slot name.
    pub name: String,
    /// Slot values.
    pub values: SlotValues,
}

/// A complex slot in a [`FrameNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexSlotNode {
    /// Slot name.
    pub name: String,
    /// Fillers in insertion order.
    pub fillers: Vec<FrameRef>,
}

/// A complex slot filler in a [`FrameNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRef {
    /// First occurrence, expanded in place.
    Frame(Box<FrameNode>),
    /// Already expanded elsewhere in the tree (shared or cyclic reference).
    Visited(MentionId),
}
