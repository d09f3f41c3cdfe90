//! The dispatch loop: pending-buffer parsing, ambiguity resolution, mapping
//! expansion, and the public `feed`/`feed_timeout`/`exec_timed_out` entry
//! points.
//!
//! This mirrors the teacher's input handler (`handle_mode_key` in its
//! `crates/input` module) in shape: accumulate digits for a count, resolve a
//! register prefix, then walk the key tree, falling back to an explicit
//! "wait for more input" result whenever the tree says the typed prefix is
//! still ambiguous.

use std::hash::Hash;

use keyseq_parser::Key;
use tracing::{debug, trace, warn};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::handler::CommandHandler;
use crate::tree::LookupResult;
use crate::types::{BuiltinEntry, DispatchStatus, FollowedBy, KeyInfo, KeysInfo, MappingEntry};

const REGISTER_PREFIX: Key = Key::Char('"');

/// The register/count prefix parsed from the front of a pending buffer.
struct Prefix {
	register: Option<char>,
	count: Option<u32>,
	consumed: usize,
}

enum PrefixOutcome {
	Ready(Prefix),
	/// A bare `"` with no register character typed yet.
	NeedsRegisterChar,
}

fn parse_prefix(buf: &[Key]) -> PrefixOutcome {
	let mut pos = 0;
	let mut register = None;

	if buf.first() == Some(&REGISTER_PREFIX) {
		match buf.get(1).and_then(|k| k.as_char()) {
			Some(r) => {
				register = Some(r);
				pos = 2;
			}
			None => return PrefixOutcome::NeedsRegisterChar,
		}
	}

	let mut count = None;
	if let Some(first_digit) = buf.get(pos).and_then(|k| k.as_digit()) {
		if first_digit >= 1 {
			let mut value = first_digit;
			pos += 1;
			while let Some(d) = buf.get(pos).and_then(|k| k.as_digit()) {
				value = value.saturating_mul(10).saturating_add(d);
				pos += 1;
			}
			count = Some(value);
		}
	}

	PrefixOutcome::Ready(Prefix { register, count, consumed: pos })
}

fn combine_counts(a: Option<u32>, b: Option<u32>) -> Option<u32> {
	match (a, b) {
		(Some(a), Some(b)) => Some(a.saturating_mul(b)),
		(Some(a), None) => Some(a),
		(None, Some(b)) => Some(b),
		(None, None) => None,
	}
}

/// The outcome of resolving a typed sequence against the user and builtin
/// trees for one mode/kind pair, per the resolution order in §4.2.
enum Resolution {
	User(MappingEntry),
	Builtin(BuiltinEntry),
	WaitShortUser(MappingEntry),
	WaitShortBuiltin(BuiltinEntry),
	Wait,
	Unknown,
}

fn resolve(user: LookupResult<'_, MappingEntry>, builtin: LookupResult<'_, BuiltinEntry>) -> Resolution {
	match (user.value(), builtin.value()) {
		(Some(u), Some(_)) => {
			if matches!(user, LookupResult::ExactAndPrefix(_)) {
				Resolution::WaitShortUser(u.clone())
			} else {
				Resolution::User(u.clone())
			}
		}
		(Some(u), None) => {
			if builtin.has_prefix() {
				Resolution::Wait
			} else if matches!(user, LookupResult::ExactAndPrefix(_)) {
				Resolution::WaitShortUser(u.clone())
			} else {
				Resolution::User(u.clone())
			}
		}
		(None, Some(b)) => {
			if user.has_prefix() {
				Resolution::Wait
			} else if matches!(builtin, LookupResult::ExactAndPrefix(_)) {
				Resolution::WaitShortBuiltin(*b)
			} else {
				Resolution::Builtin(*b)
			}
		}
		(None, None) => {
			if user.has_prefix() || builtin.has_prefix() {
				Resolution::Wait
			} else {
				Resolution::Unknown
			}
		}
	}
}

/// One attempt at consuming a complete dispatch from the front of the
/// pending buffer.
enum StepOutcome {
	Dispatched,
	MappingExpanded,
	Wait,
	WaitShort(u64),
	Unknown,
	Error(EngineError),
}

impl<M: Eq + Hash + Copy> Engine<M> {
	/// Feeds one key to the engine.
	///
	/// Runs the dispatch loop to a stable point: a single call may trigger
	/// several handler invocations if a user mapping expands into more than
	/// one complete command, or none at all if the buffer is still
	/// ambiguous. Deferred sequences queued by a handler via
	/// [`Engine::execute_deferred`] drain before this call returns.
	pub fn feed<H: CommandHandler<M>>(&mut self, mode: M, key: Key, handler: &mut H) -> DispatchStatus {
		self.pending.push(key);
		let status = self.drain(mode, handler, false);
		self.drain_deferred(mode, handler, status)
	}

	/// Forces resolution of an ambiguous prefix, as if a timeout elapsed
	/// without further input: a `WaitShort` commits to its shorter binding,
	/// a plain `Wait` with nothing to commit to resolves to `Unknown`.
	pub fn feed_timeout<H: CommandHandler<M>>(&mut self, mode: M, handler: &mut H) -> DispatchStatus {
		let status = self.drain(mode, handler, true);
		self.drain_deferred(mode, handler, status)
	}

	/// Pushes `sequence` into the pending buffer and drains it synchronously,
	/// resolving every wait as if it had immediately timed out.
	pub fn exec_timed_out<H: CommandHandler<M>>(&mut self, mode: M, sequence: Vec<Key>, handler: &mut H) -> DispatchStatus {
		self.pending.extend(sequence);
		let status = self.drain(mode, handler, true);
		self.drain_deferred(mode, handler, status)
	}

	fn drain_deferred<H: CommandHandler<M>>(&mut self, mode: M, handler: &mut H, status: DispatchStatus) -> DispatchStatus {
		while let Some(sequence) = self.deferred.pop_front() {
			self.pending.extend(sequence);
			self.drain(mode, handler, false);
		}
		status
	}

	/// Runs [`Self::try_step`] until it stops consuming the buffer, i.e.
	/// until it reports anything other than a completed dispatch or a
	/// mapping expansion.
	fn drain<H: CommandHandler<M>>(&mut self, mode: M, handler: &mut H, force_timeout: bool) -> DispatchStatus {
		loop {
			if self.pending.is_empty() {
				return DispatchStatus::Handled;
			}

			match self.try_step(mode, handler, force_timeout) {
				StepOutcome::Dispatched | StepOutcome::MappingExpanded => continue,
				StepOutcome::Wait => return DispatchStatus::Wait,
				StepOutcome::WaitShort(timeout_ms) => return DispatchStatus::WaitShort { timeout_ms },
				StepOutcome::Unknown => return DispatchStatus::Unknown,
				StepOutcome::Error(err) => return DispatchStatus::Error(err),
			}
		}
	}

	fn flush_all(&mut self) {
		self.pending.clear();
	}

	fn try_step<H: CommandHandler<M>>(&mut self, mode: M, handler: &mut H, force_timeout: bool) -> StepOutcome {
		let buf = self.pending.clone();

		let prefix = match parse_prefix(&buf) {
			PrefixOutcome::NeedsRegisterChar => {
				if force_timeout {
					self.flush_all();
					return StepOutcome::Unknown;
				}
				return StepOutcome::Wait;
			}
			PrefixOutcome::Ready(p) => p,
		};

		let remaining = &buf[prefix.consumed..];
		if remaining.is_empty() {
			if force_timeout {
				self.flush_all();
				return StepOutcome::Unknown;
			}
			return StepOutcome::Wait;
		}

		let no_remap_active = self.mapping_stack.no_remap_active();
		let (resolution, user_consumed, builtin_consumed) = match self.modes.get(&mode) {
			None => (Resolution::Unknown, 0, 0),
			Some(trees) => {
				let user_step = if no_remap_active {
					crate::tree::StepMatch { consumed: 0, result: LookupResult::None }
				} else {
					trees.user_commands.step_match(remaining)
				};
				let builtin_step = trees.builtin_commands.step_match(remaining);
				let r = resolve(user_step.result, builtin_step.result);
				(r, user_step.consumed, builtin_step.consumed)
			}
		};

		trace!(mode_tag = ?prefix.register, count = ?prefix.count, "pending prefix parsed");

		let resolution = if force_timeout {
			match resolution {
				Resolution::WaitShortUser(m) => Resolution::User(m),
				Resolution::WaitShortBuiltin(b) => Resolution::Builtin(b),
				Resolution::Wait => Resolution::Unknown,
				other => other,
			}
		} else {
			resolution
		};

		match resolution {
			Resolution::Unknown => {
				warn!("no binding matches pending buffer; flushing");
				self.flush_all();
				StepOutcome::Unknown
			}
			Resolution::Wait => StepOutcome::Wait,
			Resolution::WaitShortUser(_) | Resolution::WaitShortBuiltin(_) => StepOutcome::WaitShort(self.config.timeout_ms),
			Resolution::User(mapping) => self.expand_mapping(&prefix, user_consumed, mapping),
			Resolution::Builtin(entry) => self.dispatch_matched(mode, &prefix, remaining, builtin_consumed, entry, handler, force_timeout),
		}
	}

	fn expand_mapping(&mut self, prefix: &Prefix, lhs_len: usize, mapping: MappingEntry) -> StepOutcome {
		let depth = self.mapping_stack.push(mapping.no_remap, mapping.rhs.len(), self.config.max_mapping_depth);
		if depth.is_none() {
			warn!(max_depth = self.config.max_mapping_depth, "mapping recursion exceeded bound");
			self.flush_all();
			self.mapping_stack.clear();
			return StepOutcome::Error(EngineError::RecursionTooDeep { max_depth: self.config.max_mapping_depth });
		}

		let start = prefix.consumed;
		self.pending.splice(start..start + lhs_len, mapping.rhs);
		StepOutcome::MappingExpanded
	}

	/// Dispatches a matched builtin entry, resolving any `Multikey` or
	/// `Selector` follow-up it declares first.
	fn dispatch_matched<H: CommandHandler<M>>(
		&mut self,
		mode: M,
		prefix: &Prefix,
		remaining: &[Key],
		command_len: usize,
		entry: BuiltinEntry,
		handler: &mut H,
		force_timeout: bool,
	) -> StepOutcome {
		if prefix.register.is_some() && !entry.flags.accepts_register {
			warn!("command does not accept a register");
			self.flush_all();
			return StepOutcome::Unknown;
		}

		let after_command = &remaining[command_len..];

		match entry.flags.followed_by {
			FollowedBy::None => {
				let info = KeyInfo { count: prefix.count, register: prefix.register, multi: None };
				let mut keys_info = KeysInfo::default();
				let total = prefix.consumed + command_len;
				self.mapping_stack.consume(command_len);
				self.pending.drain(0..total);
				debug!(mode_tag = ?prefix.register, count = ?prefix.count, "dispatching command");
				handler.handle_command(self, mode, entry.id, info, &mut keys_info);
				StepOutcome::Dispatched
			}
			FollowedBy::Multikey => {
				let Some(&multi) = after_command.first() else {
					if force_timeout {
						self.flush_all();
						return StepOutcome::Unknown;
					}
					return StepOutcome::Wait;
				};

				let info = KeyInfo { count: prefix.count, register: prefix.register, multi: Some(multi) };
				let mut keys_info = KeysInfo::default();
				let total = prefix.consumed + command_len + 1;
				self.mapping_stack.consume(command_len + 1);
				self.pending.drain(0..total);
				debug!(multi = ?multi, "dispatching multikey command");
				handler.handle_command(self, mode, entry.id, info, &mut keys_info);
				StepOutcome::Dispatched
			}
			FollowedBy::Selector => self.dispatch_with_selector(mode, prefix, command_len, entry, after_command, handler, force_timeout),
		}
	}

	/// Resolves and runs the `register? count? selector_command` that must
	/// follow a command flagged `followed_by = Selector`, then invokes the
	/// selector handler followed by the operator's own handler.
	fn dispatch_with_selector<H: CommandHandler<M>>(
		&mut self,
		mode: M,
		prefix: &Prefix,
		command_len: usize,
		entry: BuiltinEntry,
		after_command: &[Key],
		handler: &mut H,
		force_timeout: bool,
	) -> StepOutcome {
		let mut middle_count = None;
		let mut selector_buf = after_command;
		if !entry.flags.no_count_in_middle {
			let mut pos = 0;
			if let Some(first_digit) = selector_buf.first().and_then(|k| k.as_digit()) {
				if first_digit >= 1 {
					let mut value = first_digit;
					pos += 1;
					while let Some(d) = selector_buf.get(pos).and_then(|k| k.as_digit()) {
						value = value.saturating_mul(10).saturating_add(d);
						pos += 1;
					}
					middle_count = Some(value);
				}
			}
			selector_buf = &selector_buf[pos..];
		}

		let selector_prefix = match parse_prefix(selector_buf) {
			PrefixOutcome::NeedsRegisterChar => {
				if force_timeout {
					self.flush_all();
					return StepOutcome::Unknown;
				}
				return StepOutcome::Wait;
			}
			PrefixOutcome::Ready(p) => p,
		};

		let selector_remaining = &selector_buf[selector_prefix.consumed..];
		if selector_remaining.is_empty() {
			if force_timeout {
				self.flush_all();
				return StepOutcome::Unknown;
			}
			return StepOutcome::Wait;
		}

		let Some(trees) = self.modes.get(&mode) else {
			self.flush_all();
			return StepOutcome::Unknown;
		};
		let step = trees.builtin_selectors.step_match(selector_remaining);
		let selector_resolution = resolve(LookupResult::None, step.result);
		let selector_resolution = if force_timeout {
			match selector_resolution {
				Resolution::WaitShortBuiltin(b) => Resolution::Builtin(b),
				Resolution::Wait => Resolution::Unknown,
				other => other,
			}
		} else {
			selector_resolution
		};

		let selector_entry = match selector_resolution {
			Resolution::Builtin(b) => b,
			Resolution::Wait => return StepOutcome::Wait,
			Resolution::WaitShortBuiltin(_) => return StepOutcome::WaitShort(self.config.timeout_ms),
			Resolution::Unknown | Resolution::User(_) | Resolution::WaitShortUser(_) => {
				self.flush_all();
				return StepOutcome::Unknown;
			}
		};

		let selector_consumed = step.consumed;
		let effective_count = combine_counts(combine_counts(prefix.count, middle_count), selector_prefix.count);

		let mut keys_info = KeysInfo { selector: true, ..Default::default() };
		let selector_info = KeyInfo { count: effective_count, register: selector_prefix.register, multi: None };
		debug!(count = ?effective_count, "dispatching selector");
		handler.handle_selector(self, mode, selector_entry.id, selector_info, &mut keys_info);

		let middle_len = after_command.len() - selector_buf.len();
		let body_len = command_len + middle_len + selector_prefix.consumed + selector_consumed;
		let total = prefix.consumed + body_len;

		self.mapping_stack.consume(body_len);
		self.pending.drain(0..total);

		let operator_info = KeyInfo { count: None, register: prefix.register, multi: None };
		debug!(indexes = keys_info.indexes.len(), "dispatching selector operator");
		handler.handle_command(self, mode, entry.id, operator_info, &mut keys_info);

		StepOutcome::Dispatched
	}
}
