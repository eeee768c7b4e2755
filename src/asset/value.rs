use serde::Serialize;

use crate::asset::TypeTag;

/// Decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	/// Signed integer widened to 64 bits.
	I64(i64),
	/// Unsigned integer widened to 64 bits.
	U64(u64),
	/// Single precision float.
	F32(f32),
	/// Double precision float.
	F64(f64),
	/// Raw bytes.
	Bytes(Vec<u8>),
	/// Repeated values of one kind.
	Array(Vec<Value>),
	/// Pointer field with its resolved target.
	Pointer(PointerValue),
}

impl Value {
	/// Unsigned integer payload, widening from signed when non-negative.
	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Self::U64(value) => Some(*value),
			Self::I64(value) => u64::try_from(*value).ok(),
			_ => None,
		}
	}

	/// Signed integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			Self::U64(value) => i64::try_from(*value).ok(),
			_ => None,
		}
	}

	/// Floating point payload.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::F32(value) => Some(f64::from(*value)),
			Self::F64(value) => Some(*value),
			_ => None,
		}
	}

	/// Raw byte payload.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(value) => Some(value),
			_ => None,
		}
	}

	/// Pointer payload.
	pub fn as_pointer(&self) -> Option<&PointerValue> {
		match self {
			Self::Pointer(value) => Some(value),
			_ => None,
		}
	}
}

/// A decoded record instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordValue {
	/// Record type.
	pub tag: TypeTag,
	/// Absolute offset the record was decoded from.
	pub offset: usize,
	/// Fields in decode order.
	pub fields: Vec<FieldValue>,
}

impl RecordValue {
	/// Look up a field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}
}

/// One named field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
	/// Field name.
	pub name: Box<str>,
	/// Decoded value.
	pub value: Value,
}

/// A pointer field with its resolved target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerValue {
	/// Declared target type.
	pub tag: TypeTag,
	/// Stored element count.
	pub count: u64,
	/// Stored raw offset.
	pub offset: i64,
	/// Absolute offset after resolution; absent for no-target pointers.
	pub resolved: Option<i64>,
	/// Decoded target.
	pub target: PointerTarget,
}

/// What a pointer field resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
	/// The pointer has no decodable target.
	None,
	/// Decoded target elements in order.
	Elements(Vec<RecordValue>),
}

impl PointerTarget {
	/// Decoded elements; empty for no-target pointers.
	pub fn elements(&self) -> &[RecordValue] {
		match self {
			Self::None => &[],
			Self::Elements(items) => items,
		}
	}
}

/// Result of visiting one root record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
	/// The root type was the no-target sentinel.
	None,
	/// Decoded root record.
	Record(RecordValue),
}

impl Target {
	/// Decoded record, if any.
	pub fn record(&self) -> Option<&RecordValue> {
		match self {
			Self::None => None,
			Self::Record(value) => Some(value),
		}
	}

	/// Consume into the decoded record, if any.
	pub fn into_record(self) -> Option<RecordValue> {
		match self {
			Self::None => None,
			Self::Record(value) => Some(value),
		}
	}
}
