//! Per-dispatch records and the payloads stored in a [`crate::tree::KeyTree`].

use keyseq_parser::Key;

use crate::error::EngineError;

/// Which tree a sequence is inserted into or looked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Command,
	Selector,
}

/// What a command requires after its own sequence is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FollowedBy {
	#[default]
	None,
	/// Read exactly one more key verbatim as [`KeyInfo::multi`].
	Multikey,
	/// Recursively dispatch through the selector tree to produce indexes.
	Selector,
}

/// An opaque handle to a caller-registered command, carried on a tree node
/// and handed back to the host's own handler table. A real function pointer
/// would have to be either `'static` or threaded through a lifetime the
/// trees do not otherwise need; an opaque id keeps the engine free of any
/// bound on the host's handler representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u32);

/// Flags carried by a builtin command's tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommandFlags {
	pub followed_by: FollowedBy,
	/// "nim": forbids a count between this command and its follow-up.
	pub no_count_in_middle: bool,
	pub silent: bool,
	pub skip_suggestion: bool,
	/// Whether a `"x` register prefix is accepted before this command.
	pub accepts_register: bool,
}

/// The payload stored at a builtin command node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinEntry {
	pub id: CommandId,
	pub flags: CommandFlags,
}

/// The payload stored at a user-mapping node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
	pub rhs: Vec<Key>,
	pub no_remap: bool,
}

/// Per-dispatch record passed to a command handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyInfo {
	/// `None` stands for the source design's `NO_COUNT` sentinel.
	pub count: Option<u32>,
	/// `None` stands for `NO_REGISTER`.
	pub register: Option<char>,
	/// The verbatim follow-up key for a `Multikey` command.
	pub multi: Option<Key>,
}

/// Per-dispatch record threaded through a command/selector invocation pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysInfo {
	/// Set when this dispatch was produced by expanding a user mapping.
	pub mapped: bool,
	/// Set while this invocation is itself acting as a selector.
	pub selector: bool,
	/// Number of items a selector produced; zero means "produced nothing".
	pub count: u32,
	/// Ordered indexes produced by a selector, consumed by its operator.
	pub indexes: Vec<i64>,
}

/// Outcome of [`crate::engine::Engine::feed`] / `feed_timeout`.
#[derive(Debug)]
pub enum DispatchStatus {
	/// A command was matched and its handler ran to completion.
	Handled,
	/// The pending buffer is an unambiguous prefix of a longer binding.
	Wait,
	/// The pending buffer both matches a binding and prefixes a longer one;
	/// the caller should wait `timeout_ms` then call `feed_timeout`.
	WaitShort { timeout_ms: u64 },
	/// Nothing in the current mode matches the pending buffer.
	Unknown,
	/// A fatal condition occurred; the pending buffer has already been
	/// returned to `START` with no residual state.
	Error(EngineError),
}

impl DispatchStatus {
	pub fn is_handled(&self) -> bool {
		matches!(self, DispatchStatus::Handled)
	}
}
