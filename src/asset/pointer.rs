use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::asset::{PositionTracker, Result};

/// Name of a record type as known to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
	/// Tag of pointers that resolve to nothing decodable.
	pub const NONE: TypeTag = TypeTag(Cow::Borrowed("none"));

	/// Build a tag from a static name.
	pub const fn new(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	/// Build a tag from a runtime name.
	pub fn owned(name: impl Into<String>) -> Self {
		Self(Cow::Owned(name.into()))
	}

	/// Tag name.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether this is the no-target tag.
	pub fn is_none(&self) -> bool {
		self.as_str() == Self::NONE.as_str()
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Serialize for TypeTag {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

/// A pointer field read from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
	/// Record type of the target elements.
	pub tag: TypeTag,
	/// Number of consecutive target elements.
	pub count: u64,
	/// Raw offset as stored; interpreted by an [`OffsetBase`].
	pub offset: i64,
	/// Buffer offset of the pointer field itself.
	pub at: usize,
}

impl Pointer {
	/// Whether the pointer has no decodable target.
	pub fn is_none(&self) -> bool {
		self.tag.is_none()
	}
}

/// On-disk encoding of a pointer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerLayout {
	/// `u64` element count followed by `i64` offset.
	#[default]
	Wide,
	/// `u32` element count followed by `i32` offset.
	Compact,
}

impl PointerLayout {
	/// Read one pointer at the tracker cursor.
	pub fn read(self, tracker: &mut PositionTracker<'_>, tag: TypeTag) -> Result<Pointer> {
		let at = tracker.pos();
		let (count, offset) = match self {
			Self::Wide => (tracker.read_u64()?, tracker.read_i64()?),
			Self::Compact => (u64::from(tracker.read_u32()?), i64::from(tracker.read_i32()?)),
		};
		Ok(Pointer { tag, count, offset, at })
	}
}

/// Rule turning a stored pointer offset into an absolute buffer offset.
#[derive(Clone, Default)]
pub enum OffsetBase {
	/// Offsets are absolute buffer positions.
	#[default]
	Absolute,
	/// Offsets are relative to the start of a section.
	Section(usize),
	/// Offsets are relative to the pointer field's own position.
	PointerPosition,
	/// Format-specific rule.
	Custom(Arc<dyn Fn(&Pointer) -> i64 + Send + Sync>),
}

impl OffsetBase {
	/// Compute the absolute target offset for `pointer`.
	pub fn resolve(&self, pointer: &Pointer) -> i64 {
		match self {
			Self::Absolute => pointer.offset,
			Self::Section(base) => as_i64(*base).saturating_add(pointer.offset),
			Self::PointerPosition => as_i64(pointer.at).saturating_add(pointer.offset),
			Self::Custom(rule) => rule(pointer),
		}
	}
}

impl fmt::Debug for OffsetBase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Absolute => f.write_str("Absolute"),
			Self::Section(base) => f.debug_tuple("Section").field(base).finish(),
			Self::PointerPosition => f.write_str("PointerPosition"),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

fn as_i64(value: usize) -> i64 {
	i64::try_from(value).unwrap_or(i64::MAX)
}
