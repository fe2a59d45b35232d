//! Graph-wide invariants under every public mutation, and traversal of deep
//! frame chains.
//!
//! After any sequence of calls, successful or not:
//! - mention ids are unique across frames and slots
//! - slot names are unique per frame and per kind
//! - every slot is indexed under the frame that holds it
//! - annotation and frame point at each other, one to one

use annoframe_core::{
    AnnotationId, ComplexSlotMention, FrameRef, Mention, MentionGraph, MentionId,
    PrimitiveSlotMention, SlotValue, SlotValues, Span,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end).unwrap()
}

fn assert_consistent(graph: &MentionGraph) {
    let mut ids = HashSet::new();
    for frame in graph.class_mentions() {
        assert!(ids.insert(frame.mention_id()), "duplicate id {}", frame.mention_id());

        let mut complex = HashSet::new();
        for slot in frame.complex_slot_mentions() {
            assert!(complex.insert(slot.mention_name()), "duplicate complex slot name");
            assert!(ids.insert(slot.mention_id()), "duplicate id {}", slot.mention_id());
            assert_eq!(graph.slot_owner(slot.mention_id()), Some(frame.mention_id()));
            for filler in slot.class_mention_fillers() {
                assert!(graph.class_mention(*filler).is_some(), "dangling filler {filler}");
            }
        }
        let mut primitive = HashSet::new();
        for slot in frame.primitive_slot_mentions() {
            assert!(primitive.insert(slot.mention_name()), "duplicate primitive slot name");
            assert!(ids.insert(slot.mention_id()), "duplicate id {}", slot.mention_id());
            assert_eq!(graph.slot_owner(slot.mention_id()), Some(frame.mention_id()));
        }

        if let Some(owner) = frame.text_annotation() {
            let ta = graph.text_annotation(owner).expect("back-reference to a live annotation");
            assert_eq!(ta.class_mention(), frame.mention_id());
        }
    }

    let mut roots = HashSet::new();
    for ta in graph.text_annotations() {
        assert!(roots.insert(ta.class_mention()), "two annotations share one frame");
        let frame = graph.class_mention(ta.class_mention()).expect("root frame exists");
        assert_eq!(frame.text_annotation(), Some(ta.id()));
    }
}

// =============================================================================
// Annotation binding
// =============================================================================

#[test]
fn annotation_metadata_setters_leave_binding_alone() {
    let mut graph = MentionGraph::new();
    let f0 = graph.create_class_mention("protein");
    let f1 = graph.create_class_mention("gene");
    let t0 = graph.create_text_annotation(vec![span(0, 3)], f0).unwrap();
    let t1 = graph.create_text_annotation(vec![span(4, 8)], f1).unwrap();

    graph.set_annotation_spans(t0, vec![span(0, 2), span(5, 7)]).unwrap();
    graph.set_document_id(t0, Some("PMID:123".into())).unwrap();
    graph.set_annotator(t0, Some("gold".into())).unwrap();
    assert_consistent(&graph);

    let ta = graph.text_annotation(t0).unwrap();
    assert_eq!(ta.spans(), &[span(0, 2), span(5, 7)]);
    assert_eq!(ta.document_id(), Some("PMID:123"));
    assert_eq!(ta.annotator(), Some("gold"));
    assert_eq!(ta.class_mention(), f0);
    assert_eq!(graph.text_annotation(t1).unwrap().class_mention(), f1);

    graph.set_annotator(t0, None).unwrap();
    assert_eq!(graph.text_annotation(t0).unwrap().annotator(), None);

    let ghost = AnnotationId(99);
    assert!(graph.set_annotation_spans(ghost, Vec::new()).is_err());
    assert!(graph.set_document_id(ghost, None).is_err());
    assert!(graph.set_annotator(ghost, None).is_err());
}

#[test]
fn binding_changes_only_through_set_class_mention() {
    let mut graph = MentionGraph::new();
    let f0 = graph.create_class_mention("protein");
    let f1 = graph.create_class_mention("protein");
    let t0 = graph.create_text_annotation(vec![span(0, 3)], f0).unwrap();
    let t1 = graph.create_text_annotation(vec![span(4, 8)], f1).unwrap();

    // A clone is detached: changing it cannot reach the graph.
    let copy = graph.text_annotation(t1).unwrap().clone();
    assert_eq!(copy.class_mention(), f1);
    assert_eq!(graph.text_annotation(t0).unwrap().class_mention(), f0);

    assert!(graph.set_class_mention(t0, f1).is_err());
    assert_consistent(&graph);

    graph.remove_text_annotation(t1).unwrap();
    graph.set_class_mention(t0, f1).unwrap();
    assert_consistent(&graph);
    assert_eq!(graph.class_mention(f0).unwrap().text_annotation(), None);
}

// =============================================================================
// Slot values
// =============================================================================

#[test]
fn slot_value_operations_keep_names_and_ids() {
    let mut graph = MentionGraph::new();
    let frame = graph.create_class_mention("mutation event");
    let x = graph.create_primitive_slot_mention(frame, "x", "Arg").unwrap();
    let y = graph.create_primitive_slot_mention(frame, "y", 2i32).unwrap();

    graph.overwrite_primitive_slot_value(frame, "x", "His").unwrap();
    graph.add_primitive_slot_values(frame, "y", [3i32, 4]).unwrap();
    graph
        .set_primitive_slot_values(frame, "x", SlotValues::String(vec!["Cys".into()]))
        .unwrap();
    assert!(graph
        .set_primitive_slot_values(frame, "x", SlotValues::Integer(vec![1]))
        .is_err());
    assert_consistent(&graph);

    let cm = graph.class_mention(frame).unwrap();
    let names: Vec<_> = cm.primitive_slot_mention_names().collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(cm.primitive_slot_mention("x").unwrap().mention_id(), x);
    assert_eq!(cm.primitive_slot_mention("y").unwrap().mention_id(), y);
    assert_eq!(graph.primitive_slot_values(frame, "y").unwrap().len(), 3);
}

#[test]
fn detached_slots_cannot_reuse_frame_ids() {
    let mut graph = MentionGraph::new();
    let frame = graph.create_class_mention("event");
    graph.create_primitive_slot_mention(frame, "x", "a").unwrap();

    let clash = PrimitiveSlotMention::new(frame, "y", SlotValue::from(2i32));
    assert!(graph.add_primitive_slot_mention(frame, clash.clone()).is_err());
    assert!(graph.set_primitive_slot_mentions(frame, vec![clash]).is_err());
    let complex = ComplexSlotMention::new(frame, "theme");
    assert!(graph.add_complex_slot_mention(frame, complex).is_err());
    assert_consistent(&graph);
}

// =============================================================================
// Deep chains
// =============================================================================

const CHAIN: usize = 20_000;

fn chain(len: usize) -> (MentionGraph, MentionId, MentionId) {
    let mut graph = MentionGraph::new();
    let root = graph.create_class_mention("link");
    let mut prev = root;
    for _ in 0..len {
        let next = graph.create_class_mention("link");
        graph.create_complex_slot_mention(prev, "c").unwrap();
        graph.add_class_mention_filler(prev, "c", next).unwrap();
        prev = next;
    }
    (graph, root, prev)
}

#[test]
fn frame_tree_handles_deep_chain() {
    let (graph, root, last) = chain(CHAIN);
    assert_eq!(graph.descendants(root).len(), CHAIN + 1);

    let tree = graph.frame_tree(root).unwrap();
    let mut depth = 0;
    let mut node = &tree;
    while let Some(FrameRef::Frame(child)) =
        node.complex_slots.first().and_then(|s| s.fillers.first())
    {
        node = child;
        depth += 1;
    }
    assert_eq!(depth, CHAIN);
    assert_eq!(node.id, last);
}

#[test]
fn deep_cycle_ends_in_visited_marker() {
    let (mut graph, root, last) = chain(CHAIN);
    graph.create_complex_slot_mention(last, "c").unwrap();
    graph.add_class_mention_filler(last, "c", root).unwrap();

    let tree = graph.frame_tree(root).unwrap();
    let mut node = &tree;
    while let Some(FrameRef::Frame(child)) =
        node.complex_slots.first().and_then(|s| s.fillers.first())
    {
        node = child;
    }
    assert_eq!(node.id, last);
    assert_eq!(node.complex_slots[0].fillers, vec![FrameRef::Visited(root)]);
}

#[test]
fn to_json_handles_deep_chain() {
    let (graph, root, _) = chain(CHAIN);
    let json = graph.to_json(root).unwrap();
    assert!(json.starts_with("{\"id\":0,\"name\":\"link\""));
    assert_eq!(json.matches("{\"frame\":").count(), CHAIN);
}

// =============================================================================
// Random operation sequences
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    CreateFrame,
    CreateComplexSlot { frame: usize, name: usize },
    CreatePrimitiveSlot { frame: usize, name: usize, int: bool },
    AddFiller { frame: usize, name: usize, filler: usize },
    AddValue { frame: usize, name: usize, int: bool },
    OverwriteValue { frame: usize, name: usize, int: bool },
    ReplaceComplexSlots { frame: usize, reuse: bool },
    AddDetachedSlot { frame: usize, name: usize, id: u64 },
    Annotate { frame: usize, start: usize },
    Rebind { annotation: usize, frame: usize },
    Remove { annotation: usize },
}

const NAMES: [&str; 3] = ["theme", "cause", "site"];

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::CreateFrame),
        (0usize..8, 0usize..3).prop_map(|(frame, name)| Op::CreateComplexSlot { frame, name }),
        (0usize..8, 0usize..3, any::<bool>())
            .prop_map(|(frame, name, int)| Op::CreatePrimitiveSlot { frame, name, int }),
        (0usize..8, 0usize..3, 0usize..8)
            .prop_map(|(frame, name, filler)| Op::AddFiller { frame, name, filler }),
        (0usize..8, 0usize..3, any::<bool>())
            .prop_map(|(frame, name, int)| Op::AddValue { frame, name, int }),
        (0usize..8, 0usize..3, any::<bool>())
            .prop_map(|(frame, name, int)| Op::OverwriteValue { frame, name, int }),
        (0usize..8, any::<bool>()).prop_map(|(frame, reuse)| Op::ReplaceComplexSlots { frame, reuse }),
        (0usize..8, 0usize..3, 0u64..24)
            .prop_map(|(frame, name, id)| Op::AddDetachedSlot { frame, name, id }),
        (0usize..8, 0usize..50).prop_map(|(frame, start)| Op::Annotate { frame, start }),
        (0usize..4, 0usize..8).prop_map(|(annotation, frame)| Op::Rebind { annotation, frame }),
        (0usize..4).prop_map(|annotation| Op::Remove { annotation }),
    ]
}

fn pick<T: Copy>(items: &[T], i: usize) -> Option<T> {
    (!items.is_empty()).then(|| items[i % items.len()])
}

fn value(int: bool) -> SlotValue {
    if int {
        SlotValue::from(1i32)
    } else {
        SlotValue::from("v")
    }
}

fn apply(graph: &mut MentionGraph, op: &Op) {
    let frames: Vec<MentionId> = graph.class_mentions().map(Mention::mention_id).collect();
    let annotations: Vec<AnnotationId> = graph.text_annotations().map(|ta| ta.id()).collect();
    let frame_at = |i: usize| pick(&frames, i);

    // Errors are expected; only the invariants matter.
    match *op {
        Op::CreateFrame => {
            graph.create_class_mention("frame");
        }
        Op::CreateComplexSlot { frame, name } => {
            if let Some(f) = frame_at(frame) {
                let _ = graph.create_complex_slot_mention(f, NAMES[name]);
            }
        }
        Op::CreatePrimitiveSlot { frame, name, int } => {
            if let Some(f) = frame_at(frame) {
                let _ = graph.create_primitive_slot_mention(f, NAMES[name], value(int));
            }
        }
        Op::AddFiller { frame, name, filler } => {
            if let (Some(f), Some(filler)) = (frame_at(frame), frame_at(filler)) {
                let _ = graph.add_class_mention_filler(f, NAMES[name], filler);
            }
        }
        Op::AddValue { frame, name, int } => {
            if let Some(f) = frame_at(frame) {
                let _ = graph.add_primitive_slot_value(f, NAMES[name], value(int));
            }
        }
        Op::OverwriteValue { frame, name, int } => {
            if let Some(f) = frame_at(frame) {
                let _ = graph.overwrite_primitive_slot_value(f, NAMES[name], value(int));
            }
        }
        Op::ReplaceComplexSlots { frame, reuse } => {
            if let Some(f) = frame_at(frame) {
                let mut slots = graph
                    .class_mention(f)
                    .map(|cm| cm.complex_slot_mentions().to_vec())
                    .unwrap_or_default();
                slots.reverse();
                if !reuse {
                    let id = graph.allocate_id();
                    slots.push(ComplexSlotMention::new(id, "extra"));
                }
                let _ = graph.set_complex_slot_mentions(f, slots);
            }
        }
        Op::AddDetachedSlot { frame, name, id } => {
            if let Some(f) = frame_at(frame) {
                let slot = PrimitiveSlotMention::new(MentionId(id), NAMES[name], value(false));
                let _ = graph.add_primitive_slot_mention(f, slot);
            }
        }
        Op::Annotate { frame, start } => {
            if let Some(f) = frame_at(frame) {
                let _ = graph.create_text_annotation(vec![span(start, start + 3)], f);
            }
        }
        Op::Rebind { annotation, frame } => {
            if let (Some(a), Some(f)) = (pick(&annotations, annotation), frame_at(frame)) {
                let _ = graph.set_class_mention(a, f);
            }
        }
        Op::Remove { annotation } => {
            if let Some(a) = pick(&annotations, annotation) {
                graph.remove_text_annotation(a);
            }
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_operation_sequence(ops in prop::collection::vec(op(), 1..60)) {
        let mut graph = MentionGraph::new();
        graph.create_class_mention("root");
        for op in &ops {
            apply(&mut graph, op);
            assert_consistent(&graph);
        }
        for frame in graph.class_mentions().map(Mention::mention_id).collect::<Vec<_>>() {
            let tree = graph.frame_tree(frame);
            prop_assert!(tree.is_some());
        }
    }
}
