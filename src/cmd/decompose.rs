use std::fs;
use std::path::PathBuf;

use log::info;
use vaultdoc::asset::{AssetBuffer, Image, ImageFormat, Result, save_layers_png};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub width: u32,
	#[arg(long)]
	pub height: u32,
	#[arg(long)]
	pub depth: u32,
	#[arg(long)]
	pub format: ImageFormat,
	#[arg(long = "out-dir")]
	pub out_dir: PathBuf,
	#[arg(long)]
	pub png: bool,
}

/// Split a volume payload into one file per layer.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		width,
		height,
		depth,
		format,
		out_dir,
		png,
	} = args;

	let buffer = AssetBuffer::open(&path)?;
	let volume = Image::new(width, height, depth, format, buffer.bytes().to_vec())?;
	let stem = path.file_stem().map(|item| item.to_string_lossy().into_owned()).unwrap_or_else(|| "layer".to_owned());
	fs::create_dir_all(&out_dir)?;

	let written = if png {
		save_layers_png(&volume, &out_dir, &stem)?
	} else {
		let mut written = Vec::with_capacity(depth as usize);
		for (z, layer) in volume.decompose_volume().into_iter().enumerate() {
			let target = out_dir.join(format!("{stem}_{z}.raw"));
			fs::write(&target, layer.data())?;
			written.push(target);
		}
		written
	};
	info!("split {} into {} layers", path.display(), written.len());

	for item in &written {
		println!("{}", item.display());
	}
	Ok(())
}
