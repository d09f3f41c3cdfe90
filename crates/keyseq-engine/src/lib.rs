//! A modal key-binding dispatch engine.
//!
//! Hosts register builtin commands and selectors against a trie keyed by
//! [`keyseq_parser::Key`] sequences, let users layer recursive mappings on
//! top, and drive dispatch by calling [`Engine::feed`] once per key and
//! [`Engine::feed_timeout`] when an advised timeout elapses with no further
//! input. [`keyseq_parser`] provides the sequence-literal syntax (`dd`,
//! `^W`, `<F5>`) used to author bindings outside of raw [`Key`] values.
//!
//! ```
//! use keyseq_engine::{CommandFlags, CommandHandler, CommandId, DispatchStatus, Engine, KeyInfo, Kind, KeysInfo};
//! use keyseq_parser::parse_sequence;
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash)]
//! enum Mode {
//!     Normal,
//! }
//!
//! struct Logger(Vec<CommandId>);
//!
//! impl CommandHandler<Mode> for Logger {
//!     fn handle_command(&mut self, _: &mut Engine<Mode>, _: Mode, id: CommandId, _: KeyInfo, _: &mut KeysInfo) {
//!         self.0.push(id);
//!     }
//!     fn handle_selector(&mut self, _: &mut Engine<Mode>, _: Mode, _: CommandId, _: KeyInfo, _: &mut KeysInfo) {}
//! }
//!
//! let mut engine = Engine::new();
//! engine
//!     .add_binding(Mode::Normal, Kind::Command, &parse_sequence("dd").unwrap(), CommandId(1), CommandFlags::default())
//!     .unwrap();
//!
//! let mut logger = Logger(Vec::new());
//! assert!(matches!(engine.feed(Mode::Normal, keyseq_parser::Key::Char('d'), &mut logger), DispatchStatus::Wait));
//! assert!(engine.feed(Mode::Normal, keyseq_parser::Key::Char('d'), &mut logger).is_handled());
//! assert_eq!(logger.0, vec![CommandId(1)]);
//! ```

mod config;
mod dispatch;
mod engine;
mod error;
mod handler;
mod mapping;
mod persist;
mod tree;
mod types;

pub use config::EngineConfig;
pub use engine::{Binding, Engine};
pub use error::EngineError;
pub use handler::CommandHandler;
pub use persist::{format_mapping_record, parse_mapping_record, MappingRecord};
pub use tree::LookupResult;
pub use types::{BuiltinEntry, CommandFlags, CommandId, DispatchStatus, FollowedBy, KeyInfo, KeysInfo, Kind, MappingEntry};
