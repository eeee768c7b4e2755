use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::asset::{Image, ImageFormat, Result};

/// Convert layer `index` of `source` into an RGBA buffer.
///
/// ARGB pixels are reordered, RGB gains an opaque alpha, and grayscale is
/// replicated across the color channels.
pub fn layer_to_rgba(source: &Image, index: u32) -> Result<RgbaImage> {
	let layer = source.layer(index)?;
	let bpp = source.format().bytes_per_pixel();
	let mut out = RgbaImage::new(source.width(), source.height());

	for (pixel, raw) in out.pixels_mut().zip(layer.chunks_exact(bpp)) {
		*pixel = match source.format() {
			ImageFormat::Argb => Rgba([raw[1], raw[2], raw[3], raw[0]]),
			ImageFormat::Rgb => Rgba([raw[0], raw[1], raw[2], 0xFF]),
			ImageFormat::Grayscale => Rgba([raw[0], raw[0], raw[0], 0xFF]),
		};
	}

	Ok(out)
}

/// Write every layer as `<dir>/<stem>_<z>.png`, returning the written paths.
pub fn save_layers_png(source: &Image, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
	let mut written = Vec::with_capacity(source.depth() as usize);
	for z in 0..source.depth() {
		let path = dir.join(format!("{stem}_{z}.png"));
		layer_to_rgba(source, z)?.save(&path)?;
		written.push(path);
	}
	Ok(written)
}

#[cfg(test)]
mod tests {
	use crate::asset::{Image, ImageFormat, layer_to_rgba};

	#[test]
	fn argb_layer_is_reordered_to_rgba() {
		let image = Image::new(1, 1, 2, ImageFormat::Argb, vec![0x80, 1, 2, 3, 0xFF, 4, 5, 6]).expect("image");
		let rgba = layer_to_rgba(&image, 1).expect("layer");
		assert_eq!(rgba.get_pixel(0, 0).0, [4, 5, 6, 0xFF]);
	}

	#[test]
	fn grayscale_layer_is_replicated() {
		let image = Image::new(2, 1, 1, ImageFormat::Grayscale, vec![10, 20]).expect("image");
		let rgba = layer_to_rgba(&image, 0).expect("layer");
		assert_eq!(rgba.get_pixel(1, 0).0, [20, 20, 20, 0xFF]);
	}
}
