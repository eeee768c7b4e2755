use std::io::Read;

use crate::asset::{AssetError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed stream.
	None,
	/// zstd-compressed stream.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
///
/// Anything that is not a zstd frame is passed through unchanged.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	decode_bytes_limited(raw, MAX_DECOMPRESSED_BYTES)
}

/// Like [`decode_bytes`], failing once zstd output would exceed `limit` bytes.
pub fn decode_bytes_limited(raw: Vec<u8>, limit: usize) -> Result<(Compression, Vec<u8>)> {
	if !raw.starts_with(&ZSTD_MAGIC) {
		return Ok((Compression::None, raw));
	}

	// One byte past the limit is enough to tell an oversized frame apart.
	let decoder = zstd::stream::read::Decoder::new(raw.as_slice())?;
	let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
	let mut out = Vec::new();
	decoder.take(cap).read_to_end(&mut out)?;
	if out.len() > limit {
		return Err(AssetError::DecompressedTooLarge { limit });
	}

	Ok((Compression::Zstd, out))
}
