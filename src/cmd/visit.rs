use std::path::PathBuf;

use serde::Serialize;
use vaultdoc::asset::{
	AssetBuffer, Endianness, OffsetBase, PointerLayout, PointerTarget, RecordValue, Result, Schema, StructVisitor, Target, TypeTag, Value, VisitOptions,
};

use crate::cmd::util::{hex_preview, parse_offset};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub schema: PathBuf,
	#[arg(long)]
	pub root: String,
	#[arg(long, default_value = "0")]
	pub offset: String,
	#[arg(long = "section-base", conflicts_with = "relative")]
	pub section_base: Option<String>,
	#[arg(long)]
	pub relative: bool,
	#[arg(long = "compact-pointers")]
	pub compact_pointers: bool,
	#[arg(long = "big-endian")]
	pub big_endian: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-elements")]
	pub max_elements: Option<u64>,
	#[arg(long)]
	pub json: bool,
}

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of elements printed for arrays and pointer targets.
	pub max_array_items: usize,
	/// Maximum number of bytes previewed for raw fields.
	pub max_bytes: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_array_items: 16,
			max_bytes: 16,
		}
	}
}

#[derive(Serialize)]
struct VisitJson<'a> {
	path: String,
	root: &'a str,
	offset: usize,
	value: &'a Target,
}

/// Decode the record graph rooted at `--root` and print it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		schema,
		root,
		offset,
		section_base,
		relative,
		compact_pointers,
		big_endian,
		max_depth,
		max_elements,
		json,
	} = args;

	let data_offset = parse_offset(&offset)?;
	let registry = Schema::open(&schema)?.to_registry()?;

	let mut options = VisitOptions::for_inspect();
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	if let Some(max_elements) = max_elements {
		options.max_elements = max_elements;
	}
	if compact_pointers {
		options.pointer_layout = PointerLayout::Compact;
	}
	options.offset_base = match (section_base, relative) {
		(Some(base), _) => OffsetBase::Section(parse_offset(&base)?),
		(None, true) => OffsetBase::PointerPosition,
		(None, false) => OffsetBase::Absolute,
	};

	let buffer = AssetBuffer::open(&path)?;
	let endianness = if big_endian { Endianness::Big } else { Endianness::Little };
	let mut tracker = buffer.tracker(endianness);
	let visitor = StructVisitor::new(registry, options);
	let target = visitor.visit(&TypeTag::owned(root.as_str()), &mut tracker, data_offset)?;

	if json {
		let out = VisitJson {
			path: path.display().to_string(),
			root: &root,
			offset: data_offset,
			value: &target,
		};
		println!("{}", serde_json::to_string_pretty(&out)?);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("root: {root} @ {data_offset}");
	println!("decoded:");
	match &target {
		Target::None => println!("  <no target>"),
		Target::Record(record) => print_record(record, 2, PrintOptions::default()),
	}
	Ok(())
}

fn print_record(record: &RecordValue, indent: usize, options: PrintOptions) {
	let pad = " ".repeat(indent);
	println!("{pad}{} @{} {{", record.tag, record.offset);
	for field in &record.fields {
		print!("{pad}  {} = ", field.name);
		print_value(&field.value, indent + 2, options);
	}
	println!("{pad}}}");
}

fn print_value(value: &Value, indent: usize, options: PrintOptions) {
	match value {
		Value::I64(v) => println!("{v}"),
		Value::U64(v) => println!("{v}"),
		Value::F32(v) => println!("{v}"),
		Value::F64(v) => println!("{v}"),
		Value::Bytes(v) => println!("bytes[{}] {}", v.len(), hex_preview(v, options.max_bytes)),
		Value::Array(items) => {
			let shown: Vec<String> = items.iter().take(options.max_array_items).map(scalar_label).collect();
			if items.len() > options.max_array_items {
				println!("[{}, ... {} more]", shown.join(", "), items.len() - options.max_array_items);
			} else {
				println!("[{}]", shown.join(", "));
			}
		}
		Value::Pointer(ptr) => match &ptr.target {
			PointerTarget::None => println!("-> none (count={}, offset={})", ptr.count, ptr.offset),
			PointerTarget::Elements(items) => {
				let resolved = ptr.resolved.map(|item| item.to_string()).unwrap_or_else(|| "-".to_owned());
				println!("-> {} x{} @{}", ptr.tag, ptr.count, resolved);
				for item in items.iter().take(options.max_array_items) {
					print_record(item, indent + 2, options);
				}
				if items.len() > options.max_array_items {
					println!("{}  ... {} more", " ".repeat(indent), items.len() - options.max_array_items);
				}
			}
		},
	}
}

fn scalar_label(value: &Value) -> String {
	match value {
		Value::I64(v) => v.to_string(),
		Value::U64(v) => v.to_string(),
		Value::F32(v) => v.to_string(),
		Value::F64(v) => v.to_string(),
		Value::Bytes(v) => format!("bytes[{}]", v.len()),
		Value::Array(items) => format!("[{} items]", items.len()),
		Value::Pointer(ptr) => format!("ptr({} x{})", ptr.tag, ptr.count),
	}
}
