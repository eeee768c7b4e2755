#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};

mod cmd;

#[derive(Parser)]
#[command(name = "vaultdoc", about = "Asset container inspection and texture layer tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print buffer size, compression, and leading bytes.
	Info(cmd::info::Args),
	/// Decode a record graph with a JSON schema.
	Visit(cmd::visit::Args),
	/// Stack single-layer raw payloads into one volume payload.
	Compose(cmd::compose::Args),
	/// Split a volume payload into per-layer files.
	Decompose(cmd::decompose::Args),
}

fn main() {
	let mut builder = Builder::from_default_env();
	builder.target(Target::Stderr);
	builder.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> vaultdoc::asset::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Visit(args) => cmd::visit::run(args),
		Commands::Compose(args) => cmd::compose::run(args),
		Commands::Decompose(args) => cmd::decompose::run(args),
	}
}
