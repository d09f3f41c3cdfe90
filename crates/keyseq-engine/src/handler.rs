//! The callback contract a host implements to receive dispatched commands.

use crate::engine::Engine;
use crate::types::{CommandId, KeyInfo, KeysInfo};

/// Receives commands and selectors dispatched by an [`Engine`].
///
/// `engine` is re-borrowed from the very [`Engine::feed`] call that invoked
/// this handler — a handler may read or mutate engine state through it (for
/// example calling `execute_deferred`) but MUST NOT call `feed` or
/// `feed_timeout` reentrantly; nothing here prevents the borrow checker from
/// allowing it, so it is a contract, not a compile-time guarantee, exactly
/// as in the source design.
pub trait CommandHandler<M> {
	/// Invoked when a builtin or user-mapped command completes dispatch.
	/// `keys_info` carries selector results when the command declared
	/// `followed_by = Selector`.
	fn handle_command(&mut self, engine: &mut Engine<M>, mode: M, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo);

	/// Invoked when a selector completes dispatch, before its operator runs.
	/// The handler MUST populate `keys_info.indexes` and `keys_info.count`.
	fn handle_selector(&mut self, engine: &mut Engine<M>, mode: M, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo);
}
