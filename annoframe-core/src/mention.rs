//! Mentions: semantic frames and their slots.
//!
//! # Model
//!
//! ```text
//! ClassMention "binding event"
//! ├── ComplexSlotMention "participant" ──> [ClassMention "protein", ClassMention "protein"]
//! ├── PrimitiveSlotMention "confidence" = Double[0.93]
//! └── PrimitiveSlotMention "negated"    = Boolean[false]
//! ```
//!
//! A [`ClassMention`] is a typed entity or event frame. It keeps complex
//! (frame-valued) slots and primitive (literal-valued) slots in two separate
//! namespaces, so a complex slot and a primitive slot may share a name.
//! Complex slots refer to their fillers by [`MentionId`]; the frames
//! themselves live in a [`MentionGraph`](crate::MentionGraph), which is what
//! allows nested and even cyclic frame structures.
//!
//! Frames and the slots they own are changed only through the graph, which
//! hands out shared references and keeps names and ids consistent. The value
//! operations on [`PrimitiveSlotMention`] apply to slots that are still
//! being built, before they are added to a frame.

use crate::annotation::AnnotationId;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a mention, unique within one [`MentionGraph`](crate::MentionGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionId(pub u64);

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Identity shared by frames and slots.
pub trait Mention {
    /// Graph-unique identifier.
    fn mention_id(&self) -> MentionId;

    /// Frame or slot type label. Not required to be unique.
    fn mention_name(&self) -> &str;
}

// =============================================================================
// Primitive values
// =============================================================================

/// The kind of literal a primitive slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// 32-bit signed integer.
    Integer,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A single primitive slot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SlotValue {
    /// String value.
    String(String),
    /// Integer value.
    Integer(i32),
    /// Single-precision value.
    Float(f32),
    /// Double-precision value.
    Double(f64),
    /// Boolean value.
    Boolean(bool),
}

impl SlotValue {
    /// Kind of this value.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::String(_) => PrimitiveKind::String,
            Self::Integer(_) => PrimitiveKind::Integer,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Boolean(_) => PrimitiveKind::Boolean,
        }
    }
}

impl From<String> for SlotValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for SlotValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<i32> for SlotValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<f32> for SlotValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for SlotValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for SlotValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

/// The ordered values of one primitive slot, all of a single kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum SlotValues {
    /// String values.
    String(Vec<String>),
    /// Integer values.
    Integer(Vec<i32>),
    /// Single-precision values.
    Float(Vec<f32>),
    /// Double-precision values.
    Double(Vec<f64>),
    /// Boolean values.
    Boolean(Vec<bool>),
}

impl SlotValues {
    /// An empty value set of the given kind.
    #[must_use]
    pub fn empty(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::String => Self::String(Vec::new()),
            PrimitiveKind::Integer => Self::Integer(Vec::new()),
            PrimitiveKind::Float => Self::Float(Vec::new()),
            PrimitiveKind::Double => Self::Double(Vec::new()),
            PrimitiveKind::Boolean => Self::Boolean(Vec::new()),
        }
    }

    /// Kind shared by every value.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::String(_) => PrimitiveKind::String,
            Self::Integer(_) => PrimitiveKind::Integer,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Boolean(_) => PrimitiveKind::Boolean,
        }
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::String(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Boolean(v) => v.len(),
        }
    }

    /// True if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values as individual [`SlotValue`]s.
    #[must_use]
    pub fn to_values(&self) -> Vec<SlotValue> {
        match self {
            Self::String(v) => v.iter().cloned().map(SlotValue::String).collect(),
            Self::Integer(v) => v.iter().copied().map(SlotValue::Integer).collect(),
            Self::Float(v) => v.iter().copied().map(SlotValue::Float).collect(),
            Self::Double(v) => v.iter().copied().map(SlotValue::Double).collect(),
            Self::Boolean(v) => v.iter().copied().map(SlotValue::Boolean).collect(),
        }
    }

    /// Append a value of the same kind.
    fn push(&mut self, value: SlotValue) -> Result<()> {
        match (self, value) {
            (Self::String(v), SlotValue::String(x)) => v.push(x),
            (Self::Integer(v), SlotValue::Integer(x)) => v.push(x),
            (Self::Float(v), SlotValue::Float(x)) => v.push(x),
            (Self::Double(v), SlotValue::Double(x)) => v.push(x),
            (Self::Boolean(v), SlotValue::Boolean(x)) => v.push(x),
            (values, value) => {
                return Err(Error::invalid_input(format!(
                    "cannot store a {} value in a {} slot",
                    value.kind(),
                    values.kind()
                )))
            }
        }
        Ok(())
    }
}

impl From<SlotValue> for SlotValues {
    fn from(value: SlotValue) -> Self {
        match value {
            SlotValue::String(x) => Self::String(vec![x]),
            SlotValue::Integer(x) => Self::Integer(vec![x]),
            SlotValue::Float(x) => Self::Float(vec![x]),
            SlotValue::Double(x) => Self::Double(vec![x]),
            SlotValue::Boolean(x) => Self::Boolean(vec![x]),
        }
    }
}

// =============================================================================
// Slots
// =============================================================================

/// A named slot holding literal values of exactly one primitive kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSlotMention {
    id: MentionId,
    name: String,
    values: SlotValues,
}

impl PrimitiveSlotMention {
    /// Create a slot with an initial value set.
    ///
    /// The id must be unique within the graph the slot is added to; use
    /// [`MentionGraph::allocate_id`](crate::MentionGraph::allocate_id).
    #[must_use]
    pub fn new(id: MentionId, name: impl Into<String>, values: impl Into<SlotValues>) -> Self {
        Self {
            id,
            name: name.into(),
            values: values.into(),
        }
    }

    /// Kind of value this slot accepts.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        self.values.kind()
    }

    /// Current values.
    #[must_use]
    pub fn slot_values(&self) -> &SlotValues {
        &self.values
    }

    /// Append one value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the value is of a different kind; the slot
    /// is unchanged.
    pub fn add_slot_value(&mut self, value: impl Into<SlotValue>) -> Result<()> {
        self.values.push(value.into())
    }

    /// Append several values, all or nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if any value is of a different kind; the slot
    /// is unchanged.
    pub fn add_slot_values<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<SlotValue>,
    {
        let mut staged = self.values.clone();
        for value in values {
            staged.push(value.into())?;
        }
        self.values = staged;
        Ok(())
    }

    /// Replace every value with a single one of the same kind.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the value is of a different kind.
    pub fn overwrite_slot_value(&mut self, value: impl Into<SlotValue>) -> Result<()> {
        let value = value.into();
        self.check_kind(value.kind())?;
        self.values = value.into();
        Ok(())
    }

    /// Replace the whole value set with one of the same kind.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the new values are of a different kind.
    pub fn set_slot_values(&mut self, values: SlotValues) -> Result<()> {
        self.check_kind(values.kind())?;
        self.values = values;
        Ok(())
    }

    fn check_kind(&self, kind: PrimitiveKind) -> Result<()> {
        if kind != self.kind() {
            return Err(Error::invalid_input(format!(
                "slot '{}' holds {} values, got {}",
                self.name,
                self.kind(),
                kind
            )));
        }
        Ok(())
    }
}

impl Mention for PrimitiveSlotMention {
    fn mention_id(&self) -> MentionId {
        self.id
    }

    fn mention_name(&self) -> &str {
        &self.name
    }
}

/// A named slot whose values are nested frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexSlotMention {
    id: MentionId,
    name: String,
    fillers: Vec<MentionId>,
}

impl ComplexSlotMention {
    /// Create an empty complex slot.
    #[must_use]
    pub fn new(id: MentionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fillers: Vec::new(),
        }
    }

    /// Create a complex slot with fillers already in place.
    ///
    /// Fillers are checked against the graph when the slot is added to a frame.
    #[must_use]
    pub fn with_fillers(id: MentionId, name: impl Into<String>, fillers: Vec<MentionId>) -> Self {
        Self {
            id,
            name: name.into(),
            fillers,
        }
    }

    /// Frames filling this slot, in insertion order.
    #[must_use]
    pub fn class_mention_fillers(&self) -> &[MentionId] {
        &self.fillers
    }

    pub(crate) fn push_filler(&mut self, filler: MentionId) {
        self.fillers.push(filler);
    }

    pub(crate) fn replace_fillers(&mut self, fillers: Vec<MentionId>) {
        self.fillers = fillers;
    }
}

impl Mention for ComplexSlotMention {
    fn mention_id(&self) -> MentionId {
        self.id
    }

    fn mention_name(&self) -> &str {
        &self.name
    }
}

/// Borrowed view of either kind of slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotMentionRef<'a> {
    /// Frame-valued slot.
    Complex(&'a ComplexSlotMention),
    /// Literal-valued slot.
    Primitive(&'a PrimitiveSlotMention),
}

impl Mention for SlotMentionRef<'_> {
    fn mention_id(&self) -> MentionId {
        match self {
            Self::Complex(s) => s.mention_id(),
            Self::Primitive(s) => s.mention_id(),
        }
    }

    fn mention_name(&self) -> &str {
        match self {
            Self::Complex(s) => s.mention_name(),
            Self::Primitive(s) => s.mention_name(),
        }
    }
}

// =============================================================================
// ClassMention
// =============================================================================

/// A typed entity or event frame.
///
/// Frames are created and changed only through a
/// [`MentionGraph`](crate::MentionGraph); this type serializes but does not
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMention {
    id: MentionId,
    name: String,
    text_annotation: Option<AnnotationId>,
    complex_slots: Vec<ComplexSlotMention>,
    primitive_slots: Vec<PrimitiveSlotMention>,
}

impl ClassMention {
    pub(crate) fn new(id: MentionId, name: String) -> Self {
        Self {
            id,
            name,
            text_annotation: None,
            complex_slots: Vec::new(),
            primitive_slots: Vec::new(),
        }
    }

    /// Text annotation this frame is bound to, if any.
    #[must_use]
    pub fn text_annotation(&self) -> Option<AnnotationId> {
        self.text_annotation
    }

    /// Complex slot with the given name.
    #[must_use]
    pub fn complex_slot_mention(&self, name: &str) -> Option<&ComplexSlotMention> {
        self.complex_slots.iter().find(|s| s.name == name)
    }

    /// Names of the complex slots, in insertion order.
    pub fn complex_slot_mention_names(&self) -> impl Iterator<Item = &str> {
        self.complex_slots.iter().map(|s| s.name.as_str())
    }

    /// Complex slots, in insertion order.
    #[must_use]
    pub fn complex_slot_mentions(&self) -> &[ComplexSlotMention] {
        &self.complex_slots
    }

    /// Primitive slot with the given name.
    #[must_use]
    pub fn primitive_slot_mention(&self, name: &str) -> Option<&PrimitiveSlotMention> {
        self.primitive_slots.iter().find(|s| s.name == name)
    }

    /// Names of the primitive slots, in insertion order.
    pub fn primitive_slot_mention_names(&self) -> impl Iterator<Item = &str> {
        self.primitive_slots.iter().map(|s| s.name.as_str())
    }

    /// Primitive slots, in insertion order.
    #[must_use]
    pub fn primitive_slot_mentions(&self) -> &[PrimitiveSlotMention] {
        &self.primitive_slots
    }

    /// Every slot: complex slots first, then primitive slots.
    pub fn slot_mentions(&self) -> impl Iterator<Item = SlotMentionRef<'_>> {
        self.complex_slots
            .iter()
            .map(SlotMentionRef::Complex)
            .chain(self.primitive_slots.iter().map(SlotMentionRef::Primitive))
    }

    /// Slot of either kind with the given name.
    ///
    /// Complex and primitive slots have separate namespaces; when both kinds
    /// use `name` the complex slot is returned.
    #[must_use]
    pub fn slot_mention(&self, name: &str) -> Option<SlotMentionRef<'_>> {
        self.complex_slot_mention(name)
            .map(SlotMentionRef::Complex)
            .or_else(|| self.primitive_slot_mention(name).map(SlotMentionRef::Primitive))
    }

    /// Total number of slots of both kinds.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.complex_slots.len() + self.primitive_slots.len()
    }

    // Mutators below are crate-private: the graph validates identifiers first.

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_text_annotation(&mut self, annotation: Option<AnnotationId>) {
        self.text_annotation = annotation;
    }

    pub(crate) fn complex_slot_mut(&mut self, name: &str) -> Option<&mut ComplexSlotMention> {
        self.complex_slots.iter_mut().find(|s| s.name == name)
    }

    pub(crate) fn primitive_slot_mut(&mut self, name: &str) -> Option<&mut PrimitiveSlotMention> {
        self.primitive_slots.iter_mut().find(|s| s.name == name)
    }

    pub(crate) fn push_complex_slot(&mut self, slot: ComplexSlotMention) {
        self.complex_slots.push(slot);
    }

    pub(crate) fn push_primitive_slot(&mut self, slot: PrimitiveSlotMention) {
        self.primitive_slots.push(slot);
    }

    pub(crate) fn replace_complex_slots(
        &mut self,
        slots: Vec<ComplexSlotMention>,
    ) -> Vec<ComplexSlotMention> {
        std::mem::replace(&mut self.complex_slots, slots)
    }

    pub(crate) fn replace_primitive_slots(
        &mut self,
        slots: Vec<PrimitiveSlotMention>,
    ) -> Vec<PrimitiveSlotMention> {
        std::mem::replace(&mut self.primitive_slots, slots)
    }
}

impl Mention for ClassMention {
    fn mention_id(&self) -> MentionId {
        self.id
    }

    fn mention_name(&self) -> &str {
        &self.name
    }
}
