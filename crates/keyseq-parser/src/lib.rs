//! Parsing and formatting for modal key-sequence literals.
//!
//! A sequence literal is a run of self-delimiting tokens with no separators:
//! plain characters, `^X` control forms, and `<Name>` escapes for keys with
//! no printable representation. [`parse_sequence`] and [`format_sequence`]
//! are exact inverses of each other for any sequence this crate can produce.
//!
//! # Examples
//!
//! ```
//! use keyseq_parser::{parse_sequence, format_sequence, Key};
//!
//! let keys = parse_sequence("dd").unwrap();
//! assert_eq!(keys, vec![Key::Char('d'), Key::Char('d')]);
//! assert_eq!(format_sequence(&keys), "dd");
//! ```

pub mod key;
pub mod parser;

pub use key::{Key, Special};
pub use parser::{ParseError, format_sequence, parse_sequence};
