use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset::{AssetError, Result};

/// Pixel layout of an [`Image`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
	/// 3 bytes per pixel.
	Rgb,
	/// 4 bytes per pixel, alpha first.
	Argb,
	/// 1 byte per pixel.
	Grayscale,
}

impl ImageFormat {
	/// Bytes used by one pixel.
	pub fn bytes_per_pixel(self) -> usize {
		match self {
			Self::Rgb => 3,
			Self::Argb => 4,
			Self::Grayscale => 1,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Rgb => "rgb",
			Self::Argb => "argb",
			Self::Grayscale => "grayscale",
		}
	}
}

impl fmt::Display for ImageFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ImageFormat {
	type Err = AssetError;

	fn from_str(value: &str) -> Result<Self> {
		match value.to_ascii_lowercase().as_str() {
			"rgb" => Ok(Self::Rgb),
			"argb" => Ok(Self::Argb),
			"grayscale" | "gray" => Ok(Self::Grayscale),
			_ => Err(AssetError::InvalidImageFormat { value: value.to_owned() }),
		}
	}
}

/// A flat or layered raster image.
///
/// `depth == 1` is a plain 2D image; larger depths stack layers back to back,
/// layer `z` occupying `z * layer_len() .. (z + 1) * layer_len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
	width: u32,
	height: u32,
	depth: u32,
	format: ImageFormat,
	data: Vec<u8>,
}

impl Image {
	/// Validate geometry against `data` and wrap it.
	pub fn new(width: u32, height: u32, depth: u32, format: ImageFormat, data: Vec<u8>) -> Result<Self> {
		let invalid = |expected: usize, actual: usize| AssetError::InvalidGeometry {
			width,
			height,
			depth,
			format,
			expected,
			actual,
		};

		if width == 0 || height == 0 || depth == 0 {
			return Err(invalid(0, data.len()));
		}

		let expected = byte_len(width, height, depth, format).ok_or_else(|| invalid(0, data.len()))?;
		if data.len() != expected {
			return Err(invalid(expected, data.len()));
		}

		Ok(Self {
			width,
			height,
			depth,
			format,
			data,
		})
	}

	/// Zero-filled image of the given geometry.
	pub fn blank(width: u32, height: u32, depth: u32, format: ImageFormat) -> Result<Self> {
		let len = byte_len(width, height, depth, format).unwrap_or(0);
		Self::new(width, height, depth, format, vec![0; len])
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Number of layers.
	pub fn depth(&self) -> u32 {
		self.depth
	}

	/// Pixel format.
	pub fn format(&self) -> ImageFormat {
		self.format
	}

	/// Full payload.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consume into the payload.
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}

	/// Whether the image stacks more than one layer.
	pub fn is_volume(&self) -> bool {
		self.depth > 1
	}

	/// Byte length of one layer.
	pub fn layer_len(&self) -> usize {
		self.data.len() / self.depth as usize
	}

	/// Bytes of layer `index`.
	pub fn layer(&self, index: u32) -> Result<&[u8]> {
		let range = self.layer_range(index)?;
		Ok(&self.data[range])
	}

	/// Copy layer `source_layer` of `source` over layer `dest_layer` of `dest`.
	///
	/// Both images must share width, height, and format.
	pub fn copy_layer(source: &Image, source_layer: u32, dest: &mut Image, dest_layer: u32) -> Result<()> {
		if source.width != dest.width || source.height != dest.height || source.format != dest.format {
			return Err(AssetError::DimensionMismatch {
				expected: dest.geometry_label(),
				got: source.geometry_label(),
			});
		}

		let from = source.layer_range(source_layer)?;
		let to = dest.layer_range(dest_layer)?;
		dest.data[to].copy_from_slice(&source.data[from]);
		Ok(())
	}

	/// Stack the first layer of each image into one volume, in order.
	pub fn compose_volume(layers: &[Image]) -> Result<Image> {
		let Some(first) = layers.first() else {
			return Err(AssetError::EmptySequence);
		};

		for layer in &layers[1..] {
			if layer.width != first.width || layer.height != first.height || layer.format != first.format {
				return Err(AssetError::DimensionMismatch {
					expected: first.geometry_label(),
					got: layer.geometry_label(),
				});
			}
		}

		let depth = u32::try_from(layers.len()).map_err(|_| AssetError::InvalidGeometry {
			width: first.width,
			height: first.height,
			depth: u32::MAX,
			format: first.format,
			expected: 0,
			actual: 0,
		})?;
		let mut volume = Image::blank(first.width, first.height, depth, first.format)?;
		for (z, layer) in (0..depth).zip(layers) {
			Image::copy_layer(layer, 0, &mut volume, z)?;
		}
		Ok(volume)
	}

	/// Split into `depth` single-layer images, in ascending layer order.
	pub fn decompose_volume(&self) -> Vec<Image> {
		self.data
			.chunks_exact(self.layer_len())
			.map(|layer| Image {
				width: self.width,
				height: self.height,
				depth: 1,
				format: self.format,
				data: layer.to_vec(),
			})
			.collect()
	}

	fn layer_range(&self, index: u32) -> Result<std::ops::Range<usize>> {
		if index >= self.depth {
			return Err(AssetError::LayerIndexOutOfRange { index, depth: self.depth });
		}
		let len = self.layer_len();
		let start = index as usize * len;
		Ok(start..start + len)
	}

	fn geometry_label(&self) -> String {
		format!("{}x{} {}", self.width, self.height, self.format)
	}
}

fn byte_len(width: u32, height: u32, depth: u32, format: ImageFormat) -> Option<usize> {
	(width as usize)
		.checked_mul(height as usize)?
		.checked_mul(depth as usize)?
		.checked_mul(format.bytes_per_pixel())
}
