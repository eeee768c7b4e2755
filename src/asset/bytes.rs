use std::ops::{Deref, DerefMut};

use crate::asset::{AssetError, Result};

/// Byte order used by multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
	/// Least significant byte first.
	#[default]
	Little,
	/// Most significant byte first.
	Big,
}

/// Bounded cursor over an immutable byte buffer.
///
/// The cursor always satisfies `pos <= len`. Reads advance it by the number
/// of bytes consumed and leave it untouched when they fail.
#[derive(Debug)]
pub struct PositionTracker<'a> {
	bytes: &'a [u8],
	pos: usize,
	endianness: Endianness,
}

impl<'a> PositionTracker<'a> {
	/// Create a little-endian tracker at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self::with_endianness(bytes, Endianness::Little)
	}

	/// Create a tracker at position 0 using `endianness` for reads.
	pub fn with_endianness(bytes: &'a [u8], endianness: Endianness) -> Self {
		Self { bytes, pos: 0, endianness }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return the backing buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the backing buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return the byte order used by reads.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Return the full backing buffer.
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Move the cursor to an absolute offset in `0..=len`.
	pub fn seek(&mut self, offset: usize) -> Result<()> {
		if offset > self.bytes.len() {
			return Err(AssetError::OutOfBounds {
				offset: i64::try_from(offset).unwrap_or(i64::MAX),
				len: self.bytes.len(),
			});
		}
		self.pos = offset;
		Ok(())
	}

	/// Move the cursor to a signed absolute offset, rejecting negatives.
	pub fn seek_signed(&mut self, offset: i64) -> Result<()> {
		let target = usize::try_from(offset).map_err(|_| AssetError::OutOfBounds { offset, len: self.bytes.len() })?;
		self.seek(target)
	}

	/// Save the cursor and restore it when the returned guard drops.
	pub fn save_position(&mut self) -> SavedPosition<'_, 'a> {
		let saved = self.pos;
		SavedPosition { tracker: self, saved }
	}

	/// Run `action` and restore the cursor afterwards, whatever the outcome.
	pub fn with_saved_position<T>(&mut self, action: impl FnOnce(&mut PositionTracker<'a>) -> Result<T>) -> Result<T> {
		let mut guard = self.save_position();
		action(&mut *guard)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(AssetError::TruncatedData {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Advance by `n` bytes without decoding them.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	/// Advance to the next multiple of `alignment`.
	pub fn align(&mut self, alignment: usize) -> Result<()> {
		if alignment <= 1 {
			return Ok(());
		}
		let rem = self.pos % alignment;
		if rem == 0 {
			return Ok(());
		}
		self.skip(alignment - rem)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		let raw = self.read_exact(1)?;
		Ok(raw[0])
	}

	/// Read a `u16` in tracker byte order.
	pub fn read_u16(&mut self) -> Result<u16> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read an `i16` in tracker byte order.
	pub fn read_i16(&mut self) -> Result<i16> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => i16::from_le_bytes(buf),
			Endianness::Big => i16::from_be_bytes(buf),
		})
	}

	/// Read a `u32` in tracker byte order.
	pub fn read_u32(&mut self) -> Result<u32> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i32` in tracker byte order.
	pub fn read_i32(&mut self) -> Result<i32> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => i32::from_le_bytes(buf),
			Endianness::Big => i32::from_be_bytes(buf),
		})
	}

	/// Read a `u64` in tracker byte order.
	pub fn read_u64(&mut self) -> Result<u64> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an `i64` in tracker byte order.
	pub fn read_i64(&mut self) -> Result<i64> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => i64::from_le_bytes(buf),
			Endianness::Big => i64::from_be_bytes(buf),
		})
	}

	/// Read an `f32` in tracker byte order.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32()?))
	}

	/// Read an `f64` in tracker byte order.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_bits(self.read_u64()?))
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}
}

/// Scope guard that restores a tracker's cursor on drop.
///
/// Dereferences to the tracker, so reads and seeks go through the guard.
pub struct SavedPosition<'t, 'a> {
	tracker: &'t mut PositionTracker<'a>,
	saved: usize,
}

impl SavedPosition<'_, '_> {
	/// Cursor value that will be restored.
	pub fn saved(&self) -> usize {
		self.saved
	}
}

impl<'a> Deref for SavedPosition<'_, 'a> {
	type Target = PositionTracker<'a>;

	fn deref(&self) -> &Self::Target {
		&*self.tracker
	}
}

impl DerefMut for SavedPosition<'_, '_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut *self.tracker
	}
}

impl Drop for SavedPosition<'_, '_> {
	fn drop(&mut self) {
		self.tracker.pos = self.saved;
	}
}
