use std::fs;
use std::path::Path;

use crate::asset::compression::decode_bytes;
use crate::asset::{Compression, Endianness, PositionTracker, Result};

/// Fully resident asset buffer loaded from disk.
pub struct AssetBuffer {
	/// Compression the file was stored with.
	pub compression: Compression,
	bytes: Vec<u8>,
}

impl AssetBuffer {
	/// Read a file, transparently decompressing zstd frames.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		Self::from_raw(raw)
	}

	/// Wrap raw bytes, transparently decompressing zstd frames.
	pub fn from_raw(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		Ok(Self { compression, bytes })
	}

	/// Decoded bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Decoded length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether the decoded buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Start a decode session over the buffer.
	pub fn tracker(&self, endianness: Endianness) -> PositionTracker<'_> {
		PositionTracker::with_endianness(&self.bytes, endianness)
	}
}
