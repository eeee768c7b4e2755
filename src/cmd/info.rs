use std::path::PathBuf;

use serde::Serialize;
use vaultdoc::asset::{AssetBuffer, Result};

use crate::cmd::util::hex_preview;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct InfoJson<'a> {
	path: String,
	compression: &'static str,
	len: usize,
	head: &'a str,
}

/// Print buffer length, compression, and the leading bytes.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let buffer = AssetBuffer::open(&path)?;
	let head = hex_preview(buffer.bytes(), 16);

	if json {
		let out = InfoJson {
			path: path.display().to_string(),
			compression: buffer.compression.as_str(),
			len: buffer.len(),
			head: &head,
		};
		println!("{}", serde_json::to_string_pretty(&out)?);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", buffer.compression.as_str());
	println!("len: {}", buffer.len());
	println!("head: {head}");
	Ok(())
}
