use log::{debug, trace};

use crate::asset::record::{RecordKind, RecordVisit, VisitableRecord};
use crate::asset::value::{PointerTarget, PointerValue, RecordValue, Target};
use crate::asset::{AssetError, OffsetBase, Pointer, PointerLayout, PositionTracker, RecordRegistry, Result, TypeTag};

/// Runtime limits and addressing rules for a visit.
#[derive(Debug, Clone)]
pub struct VisitOptions {
	/// Maximum pointer nesting depth; the root record is depth 0.
	pub max_depth: u32,
	/// Maximum element count accepted on a single pointer.
	pub max_elements: u64,
	/// Encoding of pointer fields.
	pub pointer_layout: PointerLayout,
	/// Rule turning stored offsets into absolute buffer offsets.
	pub offset_base: OffsetBase,
}

impl Default for VisitOptions {
	fn default() -> Self {
		Self {
			max_depth: 32,
			max_elements: 65536,
			pointer_layout: PointerLayout::Wide,
			offset_base: OffsetBase::Absolute,
		}
	}
}

impl VisitOptions {
	/// Preset tuned for interactive inspection output.
	pub fn for_inspect() -> Self {
		Self {
			max_depth: 16,
			max_elements: 4096,
			..Self::default()
		}
	}
}

/// Walks pointer-bearing records, dispatching each tag to its registered decoder.
///
/// The registry is frozen at construction. A visitor holds no mutable
/// state, so one instance can serve independent decode sessions in parallel.
pub struct StructVisitor {
	registry: RecordRegistry,
	options: VisitOptions,
}

impl StructVisitor {
	/// Freeze `registry` into a visitor.
	pub fn new(registry: RecordRegistry, options: VisitOptions) -> Self {
		debug!(
			"struct visitor ready: {} record types, layout={:?}, base={:?}",
			registry.len(),
			options.pointer_layout,
			options.offset_base
		);
		Self { registry, options }
	}

	/// Registry consulted for dispatch.
	pub fn registry(&self) -> &RecordRegistry {
		&self.registry
	}

	/// Active options.
	pub fn options(&self) -> &VisitOptions {
		&self.options
	}

	/// Decode the record `root` located at `data_offset`.
	///
	/// A no-target root yields [`Target::None`] without touching the tracker.
	/// Otherwise the tracker is left just past the decoded root record.
	pub fn visit(&self, root: &TypeTag, tracker: &mut PositionTracker<'_>, data_offset: usize) -> Result<Target> {
		match self.lookup(root)? {
			RecordKind::NoTarget(_) => {
				trace!("visit {root}: no target");
				Ok(Target::None)
			}
			RecordKind::Decode(record) => {
				let value = self.decode_record(record.as_ref(), root, tracker, data_offset, 0)?;
				Ok(Target::Record(value))
			}
		}
	}

	/// Resolve `pointer` and decode its target elements.
	///
	/// The tracker position on return equals the position on entry.
	pub fn resolve_pointer(&self, tracker: &mut PositionTracker<'_>, pointer: &Pointer, depth: u32) -> Result<PointerValue> {
		let record = match self.lookup(&pointer.tag)? {
			RecordKind::NoTarget(_) => return Ok(unresolved(pointer, PointerTarget::None)),
			RecordKind::Decode(record) => record,
		};

		if pointer.count > self.options.max_elements {
			return Err(AssetError::PointerCountTooLarge {
				at: pointer.at,
				count: pointer.count,
				max: self.options.max_elements,
			});
		}
		if pointer.count == 0 {
			return Ok(unresolved(pointer, PointerTarget::Elements(Vec::new())));
		}

		let target = self.options.offset_base.resolve(pointer);
		let start = checked_target(target, tracker.len())?;
		trace!(
			"pointer at {} -> {} x{} @{} (depth {})",
			pointer.at,
			pointer.tag,
			pointer.count,
			start,
			depth + 1
		);

		let elements = tracker.with_saved_position(|inner| {
			let mut elements = Vec::with_capacity(pointer.count.min(1024) as usize);
			let mut next = start;
			for _ in 0..pointer.count {
				let value = self.decode_record(record.as_ref(), &pointer.tag, inner, next, depth + 1)?;
				next = inner.pos();
				elements.push(value);
			}
			Ok(elements)
		})?;

		Ok(PointerValue {
			tag: pointer.tag.clone(),
			count: pointer.count,
			offset: pointer.offset,
			resolved: Some(target),
			target: PointerTarget::Elements(elements),
		})
	}

	fn lookup(&self, tag: &TypeTag) -> Result<&RecordKind> {
		self.registry.get(tag).ok_or_else(|| AssetError::UnknownTypeTag { tag: tag.clone() })
	}

	fn decode_record(
		&self,
		record: &dyn VisitableRecord,
		tag: &TypeTag,
		tracker: &mut PositionTracker<'_>,
		data_offset: usize,
		depth: u32,
	) -> Result<RecordValue> {
		if depth >= self.options.max_depth {
			return Err(AssetError::VisitDepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		if data_offset >= tracker.len() {
			return Err(AssetError::OutOfBounds {
				offset: i64::try_from(data_offset).unwrap_or(i64::MAX),
				len: tracker.len(),
			});
		}

		trace!("visit {tag} at {data_offset} (depth {depth})");
		tracker.seek(data_offset)?;

		let mut visit = RecordVisit::new(self, tracker, tag.clone(), data_offset, depth);
		record.visit(&mut visit)?;

		let size = record.size();
		let consumed = visit.consumed();
		if size > 0 {
			if consumed > size {
				return Err(AssetError::RecordOverrun {
					tag: tag.clone(),
					size,
					consumed,
				});
			}
			visit.skip(size - consumed)?;
		}

		Ok(visit.finish())
	}
}

fn unresolved(pointer: &Pointer, target: PointerTarget) -> PointerValue {
	PointerValue {
		tag: pointer.tag.clone(),
		count: pointer.count,
		offset: pointer.offset,
		resolved: None,
		target,
	}
}

fn checked_target(target: i64, len: usize) -> Result<usize> {
	match usize::try_from(target) {
		Ok(start) if start < len => Ok(start),
		_ => Err(AssetError::OutOfBounds { offset: target, len }),
	}
}
