//! # Parser
//!
//! This module parses plain-text key-sequence literals into a list of
//! [`Key`] values. A sequence has no separators between its tokens; each
//! token is self-delimiting:
//!
//! ```text
//! sequence = token*
//! token    = control | named | char
//! control  = "^" ctrl-letter
//! named    = "<" name ">"
//! char     = any-char-except "^" or "<"
//! ```
//!
//! `<lt>` is the escape for a literal `<` and `^` followed by anything other
//! than a recognized control letter is a plain two-character literal (`^`
//! has no meaning on its own).

use crate::key::{Key, Special};

#[cfg(test)]
mod tests;

/// Function pointer type for parser combinators.
type ParserFn<T> = fn(&mut Parser) -> Result<Option<T>, ParseError>;

/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "parse error at position {}: {}", self.position, self.message)
	}
}

impl std::error::Error for ParseError {}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	/// The input string being parsed.
	input: &'a str,
	/// Current byte position in the input.
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn next(&mut self) -> Option<char> {
		if let Some(ch) = self.peek() {
			self.position += ch.len_utf8();
			self.input = &self.input[ch.len_utf8()..];
			Some(ch)
		} else {
			None
		}
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Consumes the next character if it matches the expected one.
	fn take(&mut self, expected: char) -> Result<(), ParseError> {
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(ParseError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(ParseError {
				message: format!("expected '{expected}', found end of input"),
				position: self.position,
			}),
		}
	}

	/// Attempts to parse with a fallback: restores state if parsing fails.
	fn try_parse<T, F>(&mut self, f: F) -> Result<Option<T>, ParseError>
	where
		F: FnOnce(&mut Parser<'a>) -> Result<Option<T>, ParseError>,
	{
		let snapshot = (self.input, self.position);
		match f(self) {
			Ok(Some(val)) => Ok(Some(val)),
			Ok(None) | Err(_) => {
				self.input = snapshot.0;
				self.position = snapshot.1;
				Ok(None)
			}
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> String
	where
		F: Fn(char) -> bool,
	{
		let mut result = String::new();
		while let Some(ch) = self.peek() {
			if predicate(ch) {
				result.push(ch);
				self.next();
			} else {
				break;
			}
		}
		result
	}

	fn alt<T>(&mut self, parsers: &[ParserFn<T>]) -> Result<Option<T>, ParseError> {
		for p in parsers {
			if let Some(value) = p(self)? {
				return Ok(Some(value));
			}
		}
		Ok(None)
	}

	fn error(&self, message: String) -> ParseError {
		ParseError {
			message,
			position: self.position,
		}
	}
}

/// Parses a key-sequence literal into its constituent keys.
///
/// # Errors
///
/// Returns a [`ParseError`] if any token in the sequence does not match the
/// grammar, or if a `^` or `<...>` escape names something unrecognized.
///
/// # Examples
///
/// ```
/// use keyseq_parser::{parse_sequence, Key};
///
/// let keys = parse_sequence("dd").unwrap();
/// assert_eq!(keys, vec![Key::Char('d'), Key::Char('d')]);
///
/// let keys = parse_sequence("^Wq").unwrap();
/// assert_eq!(keys, vec![Key::Char('\u{17}'), Key::Char('q')]);
/// ```
pub fn parse_sequence(s: &str) -> Result<Vec<Key>, ParseError> {
	let mut parser = Parser::new(s);
	let mut keys = Vec::new();

	while !parser.is_end() {
		keys.push(parse_token(&mut parser)?);
	}

	if keys.is_empty() {
		return Err(parser.error("empty key sequence".to_string()));
	}

	Ok(keys)
}

fn parse_token(parser: &mut Parser) -> Result<Key, ParseError> {
	match parser.alt(&[try_parse_control, try_parse_named])? {
		Some(key) => Ok(key),
		None => parse_plain_char(parser),
	}
}

/// Attempts to parse a `^X` control form.
fn try_parse_control(parser: &mut Parser) -> Result<Option<Key>, ParseError> {
	parser.try_parse(|p| {
		if p.peek() != Some('^') {
			return Ok(None);
		}
		p.next();

		let Some(letter) = p.peek() else {
			return Ok(None);
		};

		let code = match letter {
			'A'..='Z' => (letter as u32) - ('A' as u32) + 1,
			'a'..='z' => (letter.to_ascii_uppercase() as u32) - ('A' as u32) + 1,
			'[' => 0x1b,
			']' => 0x1d,
			'\\' => 0x1c,
			'^' => 0x1e,
			'_' => 0x1f,
			'@' => 0x00,
			'?' => 0x7f,
			_ => return Ok(None),
		};

		p.next();
		Ok(Some(Key::Char(char::from_u32(code).expect("control code is a valid scalar"))))
	})
}

/// Attempts to parse a `<Name>` form: function keys, navigation keys, or the
/// `<lt>` escape for a literal `<`.
fn try_parse_named(parser: &mut Parser) -> Result<Option<Key>, ParseError> {
	parser.try_parse(|p| {
		if p.peek() != Some('<') {
			return Ok(None);
		}
		p.next();

		let name = p.take_while(|ch| ch != '>');
		if p.peek() != Some('>') {
			return Ok(None);
		}
		p.next();

		Ok(Some(resolve_named(p, &name)?))
	})
}

fn resolve_named(parser: &Parser, name: &str) -> Result<Key, ParseError> {
	if name.eq_ignore_ascii_case("lt") {
		return Ok(Key::Char('<'));
	}

	if let Some(rest) = name.strip_prefix(['F', 'f']) {
		return match rest.parse::<u8>() {
			Ok(n @ 1..=12) => Ok(Key::Special(Special::F(n))),
			_ => Err(parser.error(format!("invalid function key: <{name}>"))),
		};
	}

	let special = match name.to_ascii_lowercase().as_str() {
		"left" => Special::Left,
		"right" => Special::Right,
		"up" => Special::Up,
		"down" => Special::Down,
		"home" => Special::Home,
		"end" => Special::End,
		"pageup" => Special::PageUp,
		"pagedown" => Special::PageDown,
		"backtab" | "s-tab" => Special::BackTab,
		"esc" => return Ok(Key::ESC),
		"tab" => return Ok(Key::TAB),
		"bs" | "backspace" => return Ok(Key::BACKSPACE),
		"cr" | "enter" | "return" => return Ok(Key::ENTER),
		_ => return Err(parser.error(format!("unknown key name: <{name}>"))),
	};

	Ok(Key::Special(special))
}

fn parse_plain_char(parser: &mut Parser) -> Result<Key, ParseError> {
	match parser.next() {
		Some(ch) => Ok(Key::Char(ch)),
		None => Err(parser.error("unexpected end of input".to_string())),
	}
}

/// Formats a key sequence back into its literal form, the inverse of
/// [`parse_sequence`].
///
/// # Examples
///
/// ```
/// use keyseq_parser::{format_sequence, Key};
///
/// assert_eq!(format_sequence(&[Key::Char('d'), Key::Char('d')]), "dd");
/// ```
pub fn format_sequence(keys: &[Key]) -> String {
	keys.iter().map(Key::to_string).collect()
}
