//! The error kinds surfaced across the facade and the persistence layer.

/// Errors returned from entry points that do not go through
/// [`crate::types::DispatchStatus`] (insertion, removal, persistence).
///
/// [`feed`](crate::engine::Engine::feed) never returns this type directly —
/// recursion and parse failures surface as [`crate::types::DispatchStatus`]
/// variants so a dispatch loop never has to unwind an outer `Result`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("binding already exists for this sequence")]
	AlreadyExists,

	#[error("no such mapping")]
	NotFound,

	#[error("bad key sequence at byte {position}: {message}")]
	BadSequence { message: String, position: usize },

	#[error("mapping recursion exceeded depth {max_depth}")]
	RecursionTooDeep { max_depth: usize },

	#[error("out of memory")]
	NoMemory,

	#[error("I/O error reading/writing mappings")]
	Io(#[from] std::io::Error),
}

impl From<keyseq_parser::ParseError> for EngineError {
	fn from(err: keyseq_parser::ParseError) -> Self {
		EngineError::BadSequence {
			message: err.message,
			position: err.position,
		}
	}
}
