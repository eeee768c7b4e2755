use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::asset::record::{RecordVisit, VisitableRecord};
use crate::asset::value::Value;
use crate::asset::{AssetError, PositionTracker, RecordRegistry, Result, TypeTag};

/// Declarative description of a set of record types.
///
/// ```json
/// { "types": [ { "tag": "header", "size": 24, "fields": [
///     { "name": "magic", "kind": "bytes", "len": 4 },
///     { "name": "bones", "kind": "pointer", "target": "bone" } ] } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
	/// Record types to register.
	pub types: Vec<SchemaType>,
	/// Extra tags that resolve to nothing.
	#[serde(default)]
	pub no_target: Vec<String>,
}

/// One record type.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaType {
	/// Type tag.
	pub tag: String,
	/// Fixed size in bytes; 0 streams the fields back to back.
	#[serde(default)]
	pub size: usize,
	/// Fields in storage order.
	pub fields: Vec<SchemaField>,
}

/// One field of a record type.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaField {
	/// Field name; ignored for `pad` and `align`.
	#[serde(default)]
	pub name: String,
	/// Storage kind.
	pub kind: FieldKind,
	/// Element count for numeric kinds, byte count for `bytes`/`pad`, boundary for `align`.
	#[serde(default)]
	pub len: Option<usize>,
	/// Target tag for `pointer` fields.
	#[serde(default)]
	pub target: Option<String>,
}

/// Storage kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum FieldKind {
	U8,
	U16,
	U32,
	U64,
	I16,
	I32,
	I64,
	F32,
	F64,
	/// Raw bytes kept as-is.
	Bytes,
	/// Pointer to `target` records.
	Pointer,
	/// Skipped bytes.
	Pad,
	/// Skip to the next multiple of `len`.
	Align,
}

impl Schema {
	/// Parse a schema from JSON text.
	pub fn parse(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Read and parse a schema file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let text = fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Build a registry holding every schema type.
	pub fn to_registry(&self) -> Result<RecordRegistry> {
		let mut registry = RecordRegistry::new();
		for tag in self.no_target.iter().map(|name| TypeTag::owned(name.as_str())) {
			// The built-in sentinel is already registered.
			if !tag.is_none() {
				registry.register_no_target(tag)?;
			}
		}
		for item in &self.types {
			let record = SchemaRecord::new(item.clone())?;
			registry.register(TypeTag::owned(item.tag.as_str()), record)?;
		}
		Ok(registry)
	}
}

/// Record type decoding the fields listed in a [`SchemaType`].
#[derive(Debug, Clone)]
pub struct SchemaRecord {
	def: SchemaType,
	targets: Vec<Option<TypeTag>>,
}

impl SchemaRecord {
	/// Validate a type description.
	pub fn new(def: SchemaType) -> Result<Self> {
		let mut targets = Vec::with_capacity(def.fields.len());
		for field in &def.fields {
			match field.kind {
				FieldKind::Bytes | FieldKind::Pad | FieldKind::Align if field.len.is_none() => {
					return Err(invalid(&def, field, "requires len"));
				}
				FieldKind::Pointer if field.target.is_none() => {
					return Err(invalid(&def, field, "requires target"));
				}
				FieldKind::Pointer if field.len.is_some_and(|len| len != 1) => {
					return Err(invalid(&def, field, "pointer arrays are not supported"));
				}
				_ => {}
			}
			targets.push(field.target.as_deref().map(TypeTag::owned));
		}
		Ok(Self { def, targets })
	}
}

impl VisitableRecord for SchemaRecord {
	fn size(&self) -> usize {
		self.def.size
	}

	fn visit(&self, visit: &mut RecordVisit<'_, '_>) -> Result<()> {
		for (field, target) in self.def.fields.iter().zip(&self.targets) {
			let len = field.len.unwrap_or(1);
			match field.kind {
				FieldKind::Pad => visit.skip(len)?,
				FieldKind::Align => visit.tracker().align(len)?,
				FieldKind::Bytes => {
					visit.bytes(&field.name, len)?;
				}
				FieldKind::Pointer => {
					let target = target.clone().unwrap_or(TypeTag::NONE);
					visit.pointer(&field.name, target)?;
				}
				kind => {
					let value = read_numeric(visit.tracker(), kind, len)?;
					visit.push(&field.name, value);
				}
			}
		}
		Ok(())
	}
}

fn read_numeric(tracker: &mut PositionTracker<'_>, kind: FieldKind, len: usize) -> Result<Value> {
	if len == 1 {
		return read_scalar(tracker, kind);
	}

	let mut values = Vec::with_capacity(len.min(4096));
	for _ in 0..len {
		values.push(read_scalar(tracker, kind)?);
	}
	Ok(Value::Array(values))
}

fn read_scalar(tracker: &mut PositionTracker<'_>, kind: FieldKind) -> Result<Value> {
	Ok(match kind {
		FieldKind::U8 => Value::U64(u64::from(tracker.read_u8()?)),
		FieldKind::U16 => Value::U64(u64::from(tracker.read_u16()?)),
		FieldKind::U32 => Value::U64(u64::from(tracker.read_u32()?)),
		FieldKind::U64 => Value::U64(tracker.read_u64()?),
		FieldKind::I16 => Value::I64(i64::from(tracker.read_i16()?)),
		FieldKind::I32 => Value::I64(i64::from(tracker.read_i32()?)),
		FieldKind::I64 => Value::I64(tracker.read_i64()?),
		FieldKind::F32 => Value::F32(tracker.read_f32()?),
		FieldKind::F64 => Value::F64(tracker.read_f64()?),
		FieldKind::Bytes | FieldKind::Pointer | FieldKind::Pad | FieldKind::Align => {
			return Err(AssetError::InvalidSchema {
				reason: format!("{kind:?} is not a numeric kind"),
			});
		}
	})
}

fn invalid(def: &SchemaType, field: &SchemaField, reason: &str) -> AssetError {
	AssetError::InvalidSchema {
		reason: format!("{}.{} ({:?}) {reason}", def.tag, field.name, field.kind),
	}
}

#[cfg(test)]
mod tests {
	use crate::asset::{AssetError, PositionTracker, Schema, StructVisitor, TypeTag, Value, VisitOptions};

	#[test]
	fn schema_record_decodes_numeric_arrays_and_padding() {
		let schema = Schema::parse(
			r#"{ "types": [ { "tag": "vec", "size": 16, "fields": [
				{ "name": "flags", "kind": "u8" },
				{ "kind": "align", "len": 4 },
				{ "name": "xyz", "kind": "f32", "len": 3 }
			] } ] }"#,
		)
		.expect("schema parses");
		let visitor = StructVisitor::new(schema.to_registry().expect("registry"), VisitOptions::default());

		let mut bytes = vec![9, 0, 0, 0];
		for value in [1.0_f32, 2.0, 3.0] {
			bytes.extend_from_slice(&value.to_le_bytes());
		}
		let mut tracker = PositionTracker::new(&bytes);
		let record = visitor
			.visit(&TypeTag::new("vec"), &mut tracker, 0)
			.expect("visit")
			.into_record()
			.expect("record");

		assert_eq!(record.field("flags"), Some(&Value::U64(9)));
		assert_eq!(
			record.field("xyz"),
			Some(&Value::Array(vec![Value::F32(1.0), Value::F32(2.0), Value::F32(3.0)]))
		);
		assert_eq!(tracker.pos(), 16);
	}

	#[test]
	fn missing_len_is_rejected() {
		let schema = Schema::parse(r#"{ "types": [ { "tag": "blob", "fields": [ { "name": "raw", "kind": "bytes" } ] } ] }"#).expect("parses");
		let err = schema.to_registry().err().expect("invalid schema");
		assert!(matches!(err, AssetError::InvalidSchema { reason } if reason.contains("blob.raw")));
	}

	#[test]
	fn no_target_aliases_register_as_sentinels() {
		let schema = Schema::parse(r#"{ "types": [], "no_target": ["unused"] }"#).expect("parses");
		let visitor = StructVisitor::new(schema.to_registry().expect("registry"), VisitOptions::default());
		let bytes = [0_u8; 1];
		let mut tracker = PositionTracker::new(&bytes);
		assert!(visitor.visit(&TypeTag::new("unused"), &mut tracker, 0).expect("sentinel").record().is_none());
	}

	#[test]
	fn no_target_list_may_name_the_builtin_sentinel() {
		let schema = Schema::parse(r#"{ "types": [], "no_target": ["none", "unused"] }"#).expect("parses");
		let registry = schema.to_registry().expect("listing none is accepted");
		assert_eq!(registry.len(), 2);
		assert!(registry.contains(&TypeTag::NONE));
		assert!(registry.contains(&TypeTag::new("unused")));
	}
}
