use thiserror::Error;

use crate::asset::{ImageFormat, TypeTag};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors produced while loading, decoding, and rearranging asset data.
#[derive(Debug, Error)]
pub enum AssetError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Schema or output JSON failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// PNG encoding failure.
	#[error("png: {0}")]
	Png(#[from] image::ImageError),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Seek or pointer target outside the buffer.
	#[error("offset {offset} out of bounds for buffer of {len} bytes")]
	OutOfBounds {
		/// Requested absolute offset.
		offset: i64,
		/// Buffer length.
		len: usize,
	},
	/// Not enough bytes remained for a fixed-size read.
	#[error("truncated data at offset {at}, need {need} bytes, remaining {rem}")]
	TruncatedData {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// No decode routine registered for a type tag.
	#[error("unknown record type tag {tag}")]
	UnknownTypeTag {
		/// Unregistered tag.
		tag: TypeTag,
	},
	/// A tag was registered twice.
	#[error("record type tag {tag} registered twice")]
	DuplicateTypeTag {
		/// Duplicated tag.
		tag: TypeTag,
	},
	/// Pointer nesting exceeded configured limit.
	#[error("visit depth exceeded (max={max_depth})")]
	VisitDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Pointer element count exceeded configured limit.
	#[error("pointer count too large at offset {at}: count={count}, max={max}")]
	PointerCountTooLarge {
		/// Offset of the pointer field.
		at: usize,
		/// Declared element count.
		count: u64,
		/// Maximum permitted count.
		max: u64,
	},
	/// Record decode step read past its declared size.
	#[error("record {tag} overran its size: size={size}, consumed={consumed}")]
	RecordOverrun {
		/// Record tag.
		tag: TypeTag,
		/// Declared record size.
		size: usize,
		/// Bytes actually consumed.
		consumed: usize,
	},
	/// Image payload does not fit its geometry.
	#[error("image data does not fit {width}x{height}x{depth} {format}: expected {expected} bytes, actual {actual}")]
	InvalidGeometry {
		/// Requested width.
		width: u32,
		/// Requested height.
		height: u32,
		/// Requested depth.
		depth: u32,
		/// Pixel format.
		format: ImageFormat,
		/// Expected payload byte count, zero when a dimension is zero or overflows.
		expected: usize,
		/// Supplied payload byte count.
		actual: usize,
	},
	/// Two images disagree in width, height, or format.
	#[error("image dimension mismatch: expected {expected}, got {got}")]
	DimensionMismatch {
		/// Geometry of the reference image.
		expected: String,
		/// Geometry of the offending image.
		got: String,
	},
	/// Volume composition was given no layers.
	#[error("cannot compose a volume from an empty image sequence")]
	EmptySequence,
	/// Layer index is not below the image depth.
	#[error("layer index {index} out of range for depth {depth}")]
	LayerIndexOutOfRange {
		/// Requested layer.
		index: u32,
		/// Image depth.
		depth: u32,
	},
	/// Schema document is structurally invalid.
	#[error("invalid schema: {reason}")]
	InvalidSchema {
		/// Human-readable cause.
		reason: String,
	},
	/// Unrecognised pixel format label.
	#[error("invalid image format: {value}")]
	InvalidImageFormat {
		/// User-provided label.
		value: String,
	},
	/// CLI numeric argument could not be parsed.
	#[error("invalid number literal: {value}")]
	InvalidNumberLiteral {
		/// User-provided literal.
		value: String,
	},
}
