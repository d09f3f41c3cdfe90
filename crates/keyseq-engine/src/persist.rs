//! Mapping persistence: a one-record-per-line text format a host can use to
//! restore user-defined mappings across restarts, the way the source file
//! manager's session file restores one mapping per saved line
//! (`original_source/src/cfg/info.c`).

use std::fmt;
use std::hash::Hash;
use std::io::{BufRead, Write};
use std::str::FromStr;

use keyseq_parser::{format_sequence, parse_sequence, Key};

use crate::engine::Engine;
use crate::error::EngineError;

/// One parsed `mode_tag TAB lhs TAB rhs TAB flags` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
	pub mode_tag: String,
	pub lhs: Vec<Key>,
	pub rhs: Vec<Key>,
	pub user: bool,
	pub no_remap: bool,
}

const FLAG_USER: u8 = 1 << 0;
const FLAG_NO_REMAP: u8 = 1 << 1;

/// Formats one mapping as a persistence line. `user` is carried for
/// round-trip fidelity with the record format even though only user
/// mappings are ever saved by [`Engine::save_mappings`].
pub fn format_mapping_record(mode_tag: &str, lhs: &[Key], rhs: &[Key], user: bool, no_remap: bool) -> String {
	let mut flags = 0u8;
	if user {
		flags |= FLAG_USER;
	}
	if no_remap {
		flags |= FLAG_NO_REMAP;
	}
	format!("{mode_tag}\t{}\t{}\t{flags}", format_sequence(lhs), format_sequence(rhs))
}

/// Parses one persistence line.
///
/// # Errors
///
/// Returns [`EngineError::BadSequence`] on a malformed line rather than
/// panicking: a host reloading a corrupted session file must degrade
/// gracefully, never abort.
pub fn parse_mapping_record(line: &str) -> Result<MappingRecord, EngineError> {
	let mut fields = line.split('\t');
	let bad = || EngineError::BadSequence { message: "expected mode_tag, lhs, rhs, flags".into(), position: 0 };

	let mode_tag = fields.next().ok_or_else(bad)?.to_string();
	let lhs_field = fields.next().ok_or_else(bad)?;
	let rhs_field = fields.next().ok_or_else(bad)?;
	let flags_field = fields.next().ok_or_else(bad)?;
	if fields.next().is_some() {
		return Err(bad());
	}

	let lhs = parse_sequence(lhs_field)?;
	let rhs = parse_sequence(rhs_field)?;
	let flags: u8 = flags_field
		.parse()
		.map_err(|_| EngineError::BadSequence { message: format!("unknown flags {flags_field:?}"), position: 0 })?;
	let user = flags & FLAG_USER != 0;
	let no_remap = flags & FLAG_NO_REMAP != 0;

	Ok(MappingRecord { mode_tag, lhs, rhs, user, no_remap })
}

impl<M: Eq + Hash + Copy + fmt::Display> Engine<M> {
	/// Writes every user-defined mapping across all modes as one
	/// persistence line each. Builtin bindings are code-defined and are
	/// never written.
	pub fn save_mappings<W: Write>(&self, mut writer: W) -> Result<(), EngineError> {
		for (mode, trees) in &self.modes {
			let mode_tag = mode.to_string();
			for (lhs, entry) in trees.user_commands.iter() {
				let line = format_mapping_record(&mode_tag, &lhs, &entry.rhs, true, entry.no_remap);
				writeln!(writer, "{line}")?;
			}
		}
		Ok(())
	}
}

impl<M: Eq + Hash + Copy + FromStr> Engine<M> {
	/// Reads persistence lines, installing each as a user mapping in its
	/// recorded mode, and returns the parsed records for a caller that
	/// wants to inspect what was restored.
	///
	/// # Errors
	///
	/// Returns [`EngineError::BadSequence`] on a malformed line or an
	/// unrecognized `mode_tag`, and [`EngineError::AlreadyExists`] if a
	/// mapping for the same `lhs` was already installed.
	pub fn load_mappings<R: BufRead>(&mut self, reader: R) -> Result<Vec<MappingRecord>, EngineError> {
		let mut records = Vec::new();
		for line in reader.lines() {
			let line = line?;
			if line.is_empty() {
				continue;
			}

			let record = parse_mapping_record(&line)?;
			let mode = M::from_str(&record.mode_tag).map_err(|_| EngineError::BadSequence {
				message: format!("unknown mode tag {:?}", record.mode_tag),
				position: 0,
			})?;
			self.add_user_mapping(mode, &record.lhs, record.rhs.clone(), record.no_remap)?;
			records.push(record);
		}
		Ok(records)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn format_then_parse_round_trips() {
		let lhs = parse_sequence("dd").unwrap();
		let rhs = parse_sequence("x").unwrap();
		let line = format_mapping_record("normal", &lhs, &rhs, true, false);

		let record = parse_mapping_record(&line).unwrap();
		assert_eq!(record.mode_tag, "normal");
		assert_eq!(record.lhs, lhs);
		assert_eq!(record.rhs, rhs);
		assert!(record.user);
		assert!(!record.no_remap);
	}

	#[test]
	fn no_remap_flag_round_trips() {
		let lhs = parse_sequence("gg").unwrap();
		let rhs = parse_sequence("1G").unwrap();
		let line = format_mapping_record("normal", &lhs, &rhs, true, true);

		let record = parse_mapping_record(&line).unwrap();
		assert!(record.no_remap);
	}

	#[test]
	fn malformed_line_is_bad_sequence_not_a_panic() {
		assert!(matches!(parse_mapping_record("normal\tdd"), Err(EngineError::BadSequence { .. })));
		assert!(matches!(parse_mapping_record("normal\tdd\tx\tz"), Err(EngineError::BadSequence { .. })));
	}
}
