//! Demo harness: feeds key sequences typed at stdin (or read from a script
//! file) to a toy NORMAL-mode engine and prints each dispatch.

mod cli;
mod demo_handler;

use std::fs;
use std::io::{self, BufRead, Write};

use clap::Parser;
use cli::Cli;
use demo_handler::{build_engine, Mode, PrintingHandler};
use keyseq_engine::DispatchStatus;
use keyseq_parser::parse_sequence;

fn main() {
	let args = Cli::parse();
	setup_tracing();

	let mut engine = build_engine();
	let mut handler = PrintingHandler;

	match &args.script {
		Some(path) => {
			let contents = fs::read_to_string(path).unwrap_or_else(|err| {
				eprintln!("failed to read {}: {err}", path.display());
				std::process::exit(1);
			});
			for line in contents.lines().filter(|l| !l.trim().is_empty()) {
				run_line(&mut engine, &mut handler, line, args.timeout_ms);
			}
		}
		None => {
			let stdin = io::stdin();
			print!("> ");
			io::stdout().flush().ok();
			for line in stdin.lock().lines() {
				let Ok(line) = line else { break };
				if !line.trim().is_empty() {
					run_line(&mut engine, &mut handler, &line, args.timeout_ms);
				}
				print!("> ");
				io::stdout().flush().ok();
			}
		}
	}
}

fn run_line(engine: &mut keyseq_engine::Engine<Mode>, handler: &mut PrintingHandler, line: &str, timeout_ms: u64) {
	let keys = match parse_sequence(line) {
		Ok(keys) => keys,
		Err(err) => {
			eprintln!("bad sequence {line:?}: {err}");
			return;
		}
	};

	let mut status = DispatchStatus::Handled;
	for key in keys {
		status = engine.feed(Mode::Normal, key, handler);
	}

	// A script has no real clock driving it; a WAIT_SHORT is resolved
	// immediately rather than actually sleeping `timeout_ms`.
	if matches!(status, DispatchStatus::WaitShort { .. }) {
		tracing::debug!(timeout_ms, "forcing timeout on trailing ambiguous prefix");
		status = engine.feed_timeout(Mode::Normal, handler);
	}

	match status {
		DispatchStatus::Wait => println!("(waiting for more input)"),
		DispatchStatus::Unknown => println!("(no binding matches {line:?})"),
		DispatchStatus::Error(err) => println!("(error: {err})"),
		DispatchStatus::Handled | DispatchStatus::WaitShort { .. } => {}
	}
}

fn setup_tracing() {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keyseq_repl=info,keyseq_engine=info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
