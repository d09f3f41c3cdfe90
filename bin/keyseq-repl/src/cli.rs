use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "keyseq-repl")]
#[command(about = "Type key sequences and watch the dispatch engine resolve them")]
#[command(version)]
pub struct Cli {
	/// Read a newline-separated list of sequence literals from a file instead
	/// of reading stdin interactively.
	#[arg(long, short = 'f')]
	pub script: Option<PathBuf>,

	/// Milliseconds to wait before treating a WAIT_SHORT as timed out, when
	/// running a script non-interactively.
	#[arg(long, default_value_t = 50)]
	pub timeout_ms: u64,
}
