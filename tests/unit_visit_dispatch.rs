#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vaultdoc::asset::{
	AssetError, OffsetBase, Pointer, PointerLayout, PointerTarget, PositionTracker, RecordRegistry, RecordVisit, Result, StructVisitor, Target, TypeTag,
	Value, VisitOptions, VisitableRecord,
};

const HEADER: TypeTag = TypeTag::new("header");
const BONE: TypeTag = TypeTag::new("bone");
const WORD: TypeTag = TypeTag::new("word");

/// `u32 magic`, pointer to bones, pointer with no target, `u32 trailer`.
struct Header;

impl VisitableRecord for Header {
	fn size(&self) -> usize {
		24
	}

	fn visit(&self, visit: &mut RecordVisit<'_, '_>) -> Result<()> {
		visit.u32("magic")?;
		visit.pointer("bones", BONE)?;
		visit.pointer("unused", TypeTag::NONE)?;
		visit.u32("trailer")?;
		Ok(())
	}
}

fn registry() -> RecordRegistry {
	let mut registry = RecordRegistry::new();
	registry.register(HEADER, Header).expect("header");
	registry
		.register_fn(BONE, 8, |visit| {
			visit.u16("id")?;
			visit.i16("parent")?;
			visit.f32("weight")?;
			Ok(())
		})
		.expect("bone");
	registry
		.register_fn(WORD, 4, |visit| {
			visit.u32("value")?;
			Ok(())
		})
		.expect("word");
	registry
}

fn compact_options() -> VisitOptions {
	VisitOptions {
		pointer_layout: PointerLayout::Compact,
		..VisitOptions::default()
	}
}

fn compact_visitor() -> StructVisitor {
	StructVisitor::new(registry(), compact_options())
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
	out.extend_from_slice(&value.to_le_bytes());
}

fn sample_buffer() -> Vec<u8> {
	let mut out = Vec::new();
	push_u32(&mut out, 0x4D33_4C44);
	push_u32(&mut out, 2);
	push_u32(&mut out, 24);
	push_u32(&mut out, 0);
	push_u32(&mut out, 0xFFFF_FFFF);
	push_u32(&mut out, 0xCAFE);
	for (id, parent, weight) in [(1_u16, -1_i16, 0.5_f32), (2, 0, 1.5)] {
		out.extend_from_slice(&id.to_le_bytes());
		out.extend_from_slice(&parent.to_le_bytes());
		out.extend_from_slice(&weight.to_le_bytes());
	}
	out
}

#[test]
fn visit_materializes_pointer_graph_and_keeps_sibling_stream() {
	let bytes = sample_buffer();
	let visitor = compact_visitor();
	let mut tracker = PositionTracker::new(&bytes);

	let root = visitor.visit(&HEADER, &mut tracker, 0).expect("visit").into_record().expect("root record");
	assert_eq!(tracker.pos(), 24);
	assert_eq!(root.field("magic").and_then(Value::as_u64), Some(0x4D33_4C44));
	assert_eq!(root.field("trailer").and_then(Value::as_u64), Some(0xCAFE));

	let bones = root.field("bones").and_then(Value::as_pointer).expect("bones pointer");
	assert_eq!(bones.resolved, Some(24));
	let elements = bones.target.elements();
	assert_eq!(elements.len(), 2);
	assert_eq!(elements[0].offset, 24);
	assert_eq!(elements[1].offset, 32);
	assert_eq!(elements[0].field("parent").and_then(Value::as_i64), Some(-1));
	assert_eq!(elements[1].field("weight").and_then(Value::as_f64), Some(1.5));

	let unused = root.field("unused").and_then(Value::as_pointer).expect("unused pointer");
	assert_eq!(unused.target, PointerTarget::None);
	assert_eq!(unused.resolved, None);
}

#[test]
fn none_pointer_never_moves_tracker_or_reads() {
	struct Counting(Arc<AtomicUsize>);

	impl VisitableRecord for Counting {
		fn visit(&self, visit: &mut RecordVisit<'_, '_>) -> Result<()> {
			self.0.fetch_add(1, Ordering::SeqCst);
			visit.u32("value")?;
			Ok(())
		}
	}

	let calls = Arc::new(AtomicUsize::new(0));
	let mut registry = RecordRegistry::new();
	registry.register(TypeTag::new("counting"), Counting(calls.clone())).expect("counting");
	let visitor = StructVisitor::new(registry, VisitOptions::default());

	let bytes = [0xEE_u8; 8];
	let mut tracker = PositionTracker::new(&bytes);
	tracker.seek(5).expect("seek");

	let pointer = Pointer {
		tag: TypeTag::NONE,
		count: 3,
		offset: 0x7FFF_FFFF,
		at: 5,
	};
	let value = visitor.resolve_pointer(&mut tracker, &pointer, 0).expect("none pointer");

	assert_eq!(value.target, PointerTarget::None);
	assert_eq!(tracker.pos(), 5);
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert_eq!(visitor.visit(&TypeTag::NONE, &mut tracker, 999).expect("sentinel root"), Target::None);
	assert_eq!(tracker.pos(), 5);
}

#[test]
fn visit_at_buffer_end_is_out_of_bounds() {
	let bytes = [0_u8; 8];
	let visitor = compact_visitor();
	let mut tracker = PositionTracker::new(&bytes);

	let err = visitor.visit(&WORD, &mut tracker, bytes.len()).expect_err("offset == len");
	assert!(matches!(err, AssetError::OutOfBounds { offset: 8, len: 8 }));
}

#[test]
fn visit_near_buffer_end_is_truncated() {
	let bytes = [0_u8; 8];
	let visitor = compact_visitor();
	let mut tracker = PositionTracker::new(&bytes);

	let err = visitor.visit(&WORD, &mut tracker, bytes.len() - 1).expect_err("one byte left");
	assert!(matches!(err, AssetError::TruncatedData { at: 7, need: 4, rem: 1 }));
}

#[test]
fn pointer_past_buffer_is_out_of_bounds() {
	let mut bytes = sample_buffer();
	bytes[8..12].copy_from_slice(&4096_u32.to_le_bytes());
	let visitor = compact_visitor();
	let mut tracker = PositionTracker::new(&bytes);

	let err = visitor.visit(&HEADER, &mut tracker, 0).expect_err("bones target outside buffer");
	assert!(matches!(err, AssetError::OutOfBounds { offset: 4096, .. }));
}

#[test]
fn unknown_tags_fail_for_roots_and_pointers() {
	let bytes = sample_buffer();
	let visitor = compact_visitor();
	let mut tracker = PositionTracker::new(&bytes);

	let err = visitor.visit(&TypeTag::new("mesh"), &mut tracker, 0).expect_err("unregistered root");
	assert!(matches!(err, AssetError::UnknownTypeTag { tag } if tag.as_str() == "mesh"));

	let mut registry = RecordRegistry::new();
	registry
		.register_fn(HEADER, 0, |visit| {
			visit.u32("magic")?;
			visit.pointer("bones", BONE)
		})
		.expect("header without bone type");
	let visitor = StructVisitor::new(registry, compact_options());

	let err = visitor.visit(&HEADER, &mut tracker, 0).expect_err("unregistered pointer target");
	assert!(matches!(err, AssetError::UnknownTypeTag { tag } if tag == BONE));
}

#[test]
fn relative_pointers_resolve_from_field_position() {
	let mut bytes = Vec::new();
	push_u32(&mut bytes, 1);
	push_u32(&mut bytes, 12);
	push_u32(&mut bytes, 0);
	push_u32(&mut bytes, 0x1234);

	let mut registry = RecordRegistry::new();
	registry
		.register_fn(TypeTag::new("holder"), 8, |visit| visit.pointer("word", WORD))
		.expect("holder");
	registry
		.register_fn(WORD, 4, |visit| {
			visit.u32("value")?;
			Ok(())
		})
		.expect("word");
	let visitor = StructVisitor::new(
		registry,
		VisitOptions {
			offset_base: OffsetBase::PointerPosition,
			..compact_options()
		},
	);
	let mut tracker = PositionTracker::new(&bytes);

	let root = visitor
		.visit(&TypeTag::new("holder"), &mut tracker, 0)
		.expect("visit")
		.into_record()
		.expect("record");
	let word = root.field("word").and_then(Value::as_pointer).expect("word pointer");
	assert_eq!(word.resolved, Some(12));
	assert_eq!(word.target.elements()[0].field("value").and_then(Value::as_u64), Some(0x1234));
	assert_eq!(tracker.pos(), 8);
}

#[test]
fn independent_sessions_share_one_visitor_across_threads() {
	let visitor = Arc::new(compact_visitor());
	let handles: Vec<_> = (0..4)
		.map(|_| {
			let visitor = Arc::clone(&visitor);
			std::thread::spawn(move || {
				let bytes = sample_buffer();
				let mut tracker = PositionTracker::new(&bytes);
				let root = visitor.visit(&HEADER, &mut tracker, 0).expect("visit").into_record().expect("record");
				root.field("bones").and_then(Value::as_pointer).map(|ptr| ptr.target.elements().len())
			})
		})
		.collect();

	for handle in handles {
		assert_eq!(handle.join().expect("thread"), Some(2));
	}
}
