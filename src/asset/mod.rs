mod bytes;
mod compression;
mod error;
mod export;
mod pointer;
mod raster;
mod record;
mod schema;
mod source;
mod value;
mod visitor;

/// Bounded cursor, byte order, and scoped position guard.
pub use bytes::{Endianness, PositionTracker, SavedPosition};
/// Compression detection result and decoder.
pub use compression::{Compression, decode_bytes, decode_bytes_limited};
/// Error and result aliases.
pub use error::{AssetError, Result};
/// PNG export of image layers.
pub use export::{layer_to_rgba, save_layers_png};
/// Pointer fields, type tags, and offset resolution rules.
pub use pointer::{OffsetBase, Pointer, PointerLayout, TypeTag};
/// Layered raster image model.
pub use raster::{Image, ImageFormat};
/// Visitable record contract, no-target sentinel, and registry.
pub use record::{FnRecord, NoTarget, RecordKind, RecordRegistry, RecordVisit, VisitableRecord};
/// JSON-described record types.
pub use schema::{FieldKind, Schema, SchemaField, SchemaRecord, SchemaType};
/// Disk-backed buffer loading.
pub use source::AssetBuffer;
/// Decoded object graph types.
pub use value::{FieldValue, PointerTarget, PointerValue, RecordValue, Target, Value};
/// Pointer-graph dispatcher and options.
pub use visitor::{StructVisitor, VisitOptions};
