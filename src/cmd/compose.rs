use std::fs;
use std::path::PathBuf;

use log::info;
use vaultdoc::asset::{Image, ImageFormat, Result};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub width: u32,
	#[arg(long)]
	pub height: u32,
	#[arg(long)]
	pub format: ImageFormat,
	#[arg(long)]
	pub out: PathBuf,
	#[arg(required = true)]
	pub layers: Vec<PathBuf>,
}

/// Stack raw single-layer payloads into one volume payload.
pub fn run(args: Args) -> Result<()> {
	let Args {
		width,
		height,
		format,
		out,
		layers,
	} = args;

	let mut images = Vec::with_capacity(layers.len());
	for path in &layers {
		let data = fs::read(path)?;
		images.push(Image::new(width, height, 1, format, data)?);
	}

	let volume = Image::compose_volume(&images)?;
	info!("composed {} layers of {width}x{height} {format}", volume.depth());
	fs::write(&out, volume.data())?;

	println!("out: {}", out.display());
	println!("geometry: {}x{}x{} {}", volume.width(), volume.height(), volume.depth(), volume.format());
	println!("bytes: {}", volume.data().len());
	Ok(())
}
