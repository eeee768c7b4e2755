use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::value::{FieldValue, PointerValue, RecordValue, Value};
use crate::asset::{AssetError, PositionTracker, Result, StructVisitor, TypeTag};

/// A record type that can decode itself from a tracker.
///
/// Implementations read their fields through [`RecordVisit`], which starts at
/// the record's data offset and re-enters the visitor for pointer fields.
pub trait VisitableRecord: Send + Sync {
	/// Fixed encoded size in bytes, or 0 when the record streams a variable size.
	fn size(&self) -> usize {
		0
	}

	/// Decode one instance.
	fn visit(&self, visit: &mut RecordVisit<'_, '_>) -> Result<()>;
}

/// Record type standing for "this pointer resolves to nothing".
///
/// Visiting it reads nothing and resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTarget;

impl VisitableRecord for NoTarget {
	fn visit(&self, _visit: &mut RecordVisit<'_, '_>) -> Result<()> {
		Ok(())
	}
}

/// Record type backed by a plain decode function.
pub struct FnRecord<F> {
	size: usize,
	decode: F,
}

impl<F> VisitableRecord for FnRecord<F>
where
	F: Fn(&mut RecordVisit<'_, '_>) -> Result<()> + Send + Sync,
{
	fn size(&self) -> usize {
		self.size
	}

	fn visit(&self, visit: &mut RecordVisit<'_, '_>) -> Result<()> {
		(self.decode)(visit)
	}
}

/// Registered decode behavior for one tag.
#[derive(Clone)]
pub enum RecordKind {
	/// Resolves to nothing without reading.
	NoTarget(NoTarget),
	/// Decodes through a record implementation.
	Decode(Arc<dyn VisitableRecord>),
}

/// Mapping from type tag to decode behavior.
///
/// A new registry already maps [`TypeTag::NONE`] to the no-target sentinel.
#[derive(Clone)]
pub struct RecordRegistry {
	kinds: HashMap<TypeTag, RecordKind>,
}

impl Default for RecordRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl RecordRegistry {
	/// Create a registry holding only the no-target tag.
	pub fn new() -> Self {
		let mut kinds = HashMap::new();
		kinds.insert(TypeTag::NONE, RecordKind::NoTarget(NoTarget));
		Self { kinds }
	}

	/// Register a record implementation under `tag`.
	pub fn register(&mut self, tag: TypeTag, record: impl VisitableRecord + 'static) -> Result<()> {
		self.insert(tag, RecordKind::Decode(Arc::new(record)))
	}

	/// Register a decode function with a fixed size (0 for streamed records).
	pub fn register_fn<F>(&mut self, tag: TypeTag, size: usize, decode: F) -> Result<()>
	where
		F: Fn(&mut RecordVisit<'_, '_>) -> Result<()> + Send + Sync + 'static,
	{
		self.register(tag, FnRecord { size, decode })
	}

	/// Register an additional tag that behaves like the no-target sentinel.
	pub fn register_no_target(&mut self, tag: TypeTag) -> Result<()> {
		self.insert(tag, RecordKind::NoTarget(NoTarget))
	}

	/// Look up the behavior for `tag`.
	pub fn get(&self, tag: &TypeTag) -> Option<&RecordKind> {
		self.kinds.get(tag)
	}

	/// Whether `tag` is registered.
	pub fn contains(&self, tag: &TypeTag) -> bool {
		self.kinds.contains_key(tag)
	}

	/// Registered tags in sorted order.
	pub fn tags(&self) -> Vec<&TypeTag> {
		let mut tags: Vec<_> = self.kinds.keys().collect();
		tags.sort();
		tags
	}

	/// Number of registered tags, including the no-target tag.
	pub fn len(&self) -> usize {
		self.kinds.len()
	}

	/// Always false; the no-target tag is present from construction.
	pub fn is_empty(&self) -> bool {
		self.kinds.is_empty()
	}

	fn insert(&mut self, tag: TypeTag, kind: RecordKind) -> Result<()> {
		if self.kinds.contains_key(&tag) {
			return Err(AssetError::DuplicateTypeTag { tag });
		}
		self.kinds.insert(tag, kind);
		Ok(())
	}
}

/// Decode session for one record instance.
///
/// Field reads advance the shared tracker; pointer fields are resolved
/// through the owning visitor with the tracker position preserved.
pub struct RecordVisit<'v, 'a> {
	visitor: &'v StructVisitor,
	tracker: &'v mut PositionTracker<'a>,
	tag: TypeTag,
	data_offset: usize,
	depth: u32,
	fields: Vec<FieldValue>,
}

impl<'v, 'a> RecordVisit<'v, 'a> {
	pub(crate) fn new(visitor: &'v StructVisitor, tracker: &'v mut PositionTracker<'a>, tag: TypeTag, data_offset: usize, depth: u32) -> Self {
		Self {
			visitor,
			tracker,
			tag,
			data_offset,
			depth,
			fields: Vec::new(),
		}
	}

	/// Tag of the record being decoded.
	pub fn tag(&self) -> &TypeTag {
		&self.tag
	}

	/// Absolute offset the record starts at.
	pub fn data_offset(&self) -> usize {
		self.data_offset
	}

	/// Pointer nesting depth of this record (root is 0).
	pub fn depth(&self) -> u32 {
		self.depth
	}

	/// Visitor driving this decode.
	pub fn visitor(&self) -> &'v StructVisitor {
		self.visitor
	}

	/// Direct tracker access for reads that do not map to a field.
	pub fn tracker(&mut self) -> &mut PositionTracker<'a> {
		&mut *self.tracker
	}

	/// Bytes consumed since the data offset.
	pub fn consumed(&self) -> usize {
		self.tracker.pos().saturating_sub(self.data_offset)
	}

	/// Fields decoded so far.
	pub fn fields(&self) -> &[FieldValue] {
		&self.fields
	}

	/// Append an already decoded field.
	pub fn push(&mut self, name: &str, value: Value) {
		self.fields.push(FieldValue {
			name: name.to_owned().into_boxed_str(),
			value,
		});
	}

	/// Read a `u8` field.
	pub fn u8(&mut self, name: &str) -> Result<u8> {
		let value = self.tracker.read_u8()?;
		self.push(name, Value::U64(u64::from(value)));
		Ok(value)
	}

	/// Read a `u16` field.
	pub fn u16(&mut self, name: &str) -> Result<u16> {
		let value = self.tracker.read_u16()?;
		self.push(name, Value::U64(u64::from(value)));
		Ok(value)
	}

	/// Read a `u32` field.
	pub fn u32(&mut self, name: &str) -> Result<u32> {
		let value = self.tracker.read_u32()?;
		self.push(name, Value::U64(u64::from(value)));
		Ok(value)
	}

	/// Read a `u64` field.
	pub fn u64(&mut self, name: &str) -> Result<u64> {
		let value = self.tracker.read_u64()?;
		self.push(name, Value::U64(value));
		Ok(value)
	}

	/// Read an `i16` field.
	pub fn i16(&mut self, name: &str) -> Result<i16> {
		let value = self.tracker.read_i16()?;
		self.push(name, Value::I64(i64::from(value)));
		Ok(value)
	}

	/// Read an `i32` field.
	pub fn i32(&mut self, name: &str) -> Result<i32> {
		let value = self.tracker.read_i32()?;
		self.push(name, Value::I64(i64::from(value)));
		Ok(value)
	}

	/// Read an `i64` field.
	pub fn i64(&mut self, name: &str) -> Result<i64> {
		let value = self.tracker.read_i64()?;
		self.push(name, Value::I64(value));
		Ok(value)
	}

	/// Read an `f32` field.
	pub fn f32(&mut self, name: &str) -> Result<f32> {
		let value = self.tracker.read_f32()?;
		self.push(name, Value::F32(value));
		Ok(value)
	}

	/// Read an `f64` field.
	pub fn f64(&mut self, name: &str) -> Result<f64> {
		let value = self.tracker.read_f64()?;
		self.push(name, Value::F64(value));
		Ok(value)
	}

	/// Read a raw byte field of `len` bytes.
	pub fn bytes(&mut self, name: &str, len: usize) -> Result<&'a [u8]> {
		let value = self.tracker.read_exact(len)?;
		self.push(name, Value::Bytes(value.to_vec()));
		Ok(value)
	}

	/// Skip `len` padding bytes.
	pub fn skip(&mut self, len: usize) -> Result<()> {
		self.tracker.skip(len)
	}

	/// Read a pointer field and decode whatever it targets.
	///
	/// The tracker ends just past the pointer field regardless of how deep
	/// the target graph goes.
	pub fn pointer(&mut self, name: &str, target: TypeTag) -> Result<()> {
		let value = self.resolve_pointer(target)?;
		self.push(name, Value::Pointer(value));
		Ok(())
	}

	/// Read a pointer field and decode its target without recording a field.
	pub fn resolve_pointer(&mut self, target: TypeTag) -> Result<PointerValue> {
		let pointer = self.visitor.options().pointer_layout.read(&mut *self.tracker, target)?;
		self.visitor.resolve_pointer(&mut *self.tracker, &pointer, self.depth)
	}

	pub(crate) fn finish(self) -> RecordValue {
		RecordValue {
			tag: self.tag,
			offset: self.data_offset,
			fields: self.fields,
		}
	}
}
