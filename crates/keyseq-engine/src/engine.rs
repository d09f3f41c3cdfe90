//! The engine's owned state and the facade entry points that do not
//! themselves drive a dispatch (insertion, removal, introspection, reset).
//! The dispatch loop proper (`feed`, `feed_timeout`, `exec_timed_out`) lives
//! in [`crate::dispatch`], as an additional `impl<M>` block on [`Engine`].

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use keyseq_parser::Key;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::mapping::MappingStack;
use crate::tree::KeyTree;
use crate::types::{BuiltinEntry, CommandFlags, CommandId, Kind, MappingEntry};

#[derive(Debug, Default)]
pub(crate) struct ModeTrees {
	pub(crate) builtin_commands: KeyTree<BuiltinEntry>,
	pub(crate) user_commands: KeyTree<MappingEntry>,
	pub(crate) builtin_selectors: KeyTree<BuiltinEntry>,
}

/// A binding as returned by [`Engine::list`]: either a builtin command/
/// selector or a user-defined mapping.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
	Builtin(&'a BuiltinEntry),
	Mapping(&'a MappingEntry),
}

/// The modal key-binding engine.
///
/// `M` is the caller's closed set of mode tags (an enum implementing `Copy
/// + Eq + Hash`, typically `Copy` over a handful of variants). The engine
/// owns no threads and no timer; a host drives it by calling [`Engine::feed`]
/// for every key and [`Engine::feed_timeout`] when an advised timeout
/// elapses without further input.
#[derive(Debug)]
pub struct Engine<M> {
	pub(crate) config: EngineConfig,
	pub(crate) modes: HashMap<M, ModeTrees>,
	pub(crate) pending: Vec<Key>,
	pub(crate) mapping_stack: MappingStack,
	pub(crate) deferred: VecDeque<Vec<Key>>,
}

impl<M> Default for Engine<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> Engine<M> {
	pub fn new() -> Self {
		Self::with_config(EngineConfig::default())
	}

	pub fn with_config(config: EngineConfig) -> Self {
		Self {
			config,
			modes: HashMap::new(),
			pending: Vec::new(),
			mapping_stack: MappingStack::new(),
			deferred: VecDeque::new(),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Whether a user-mapping expansion is currently in progress.
	pub fn inside_mapping(&self) -> bool {
		!self.mapping_stack.is_empty()
	}

	/// Enqueues `sequence` to be parsed after the handler that called this
	/// returns, and before the triggering `feed` call reports its status.
	pub fn execute_deferred(&mut self, sequence: Vec<Key>) {
		self.deferred.push_back(sequence);
	}
}

impl<M: Eq + Hash + Copy> Engine<M> {
	fn trees_mut(&mut self, mode: M) -> &mut ModeTrees {
		self.modes.entry(mode).or_default()
	}

	/// Inserts a builtin command or selector binding.
	///
	/// # Errors
	///
	/// Returns [`EngineError::AlreadyExists`] if `sequence` already
	/// terminates a binding of the same `kind` in this mode.
	pub fn add_binding(&mut self, mode: M, kind: Kind, sequence: &[Key], id: CommandId, flags: CommandFlags) -> Result<(), EngineError> {
		let entry = BuiltinEntry { id, flags };
		let tree = match kind {
			Kind::Command => &mut self.trees_mut(mode).builtin_commands,
			Kind::Selector => &mut self.trees_mut(mode).builtin_selectors,
		};
		tree.insert(sequence, entry)
	}

	/// Inserts a user-defined mapping of `lhs` to `rhs`.
	///
	/// # Errors
	///
	/// Returns [`EngineError::AlreadyExists`] if `lhs` already has a user
	/// mapping in this mode.
	pub fn add_user_mapping(&mut self, mode: M, lhs: &[Key], rhs: Vec<Key>, no_remap: bool) -> Result<(), EngineError> {
		self.trees_mut(mode).user_commands.insert(lhs, MappingEntry { rhs, no_remap })
	}

	/// Removes the user mapping bound to `lhs`.
	///
	/// # Errors
	///
	/// Returns [`EngineError::NotFound`] if no such mapping exists.
	pub fn remove_user_mapping(&mut self, mode: M, lhs: &[Key]) -> Result<MappingEntry, EngineError> {
		self.modes.get_mut(&mode).ok_or(EngineError::NotFound)?.user_commands.remove(lhs)
	}

	/// Lists every binding of `kind` in `mode`, in key-lexicographic order.
	pub fn list(&self, mode: M, kind: Kind) -> Vec<(Vec<Key>, Binding<'_>)> {
		let Some(trees) = self.modes.get(&mode) else {
			return Vec::new();
		};

		match kind {
			Kind::Command => {
				let mut all: Vec<_> = trees
					.builtin_commands
					.iter()
					.map(|(seq, v)| (seq, Binding::Builtin(v)))
					.chain(trees.user_commands.iter().map(|(seq, v)| (seq, Binding::Mapping(v))))
					.collect();
				all.sort_by(|a, b| a.0.cmp(&b.0));
				all
			}
			Kind::Selector => trees.builtin_selectors.iter().map(|(seq, v)| (seq, Binding::Builtin(v))).collect(),
		}
	}

	/// Empties the pending buffer and mapping stack, discarding any
	/// in-progress sequence. `mode` is accepted for facade symmetry with the
	/// source design; the pending buffer itself is not mode-scoped since
	/// only one sequence is ever being composed at a time.
	pub fn reset(&mut self, _mode: M) {
		self.pending.clear();
		self.mapping_stack.clear();
		self.deferred.clear();
	}
}
