use super::{ParseError, parse_sequence};
use crate::key::{Key, Special};
use crate::parser::format_sequence;

#[test]
fn test_parse_plain_chars() {
	assert_eq!(parse_sequence("dd"), Ok(vec![Key::Char('d'), Key::Char('d')]));
	assert_eq!(
		parse_sequence("gg"),
		Ok(vec![Key::Char('g'), Key::Char('g')])
	);
	assert_eq!(parse_sequence("5"), Ok(vec![Key::Char('5')]));
}

#[test]
fn test_parse_control_forms() {
	for (input, letter) in [
		("^A", 1u32),
		("^Z", 26),
		("^[", 0x1b),
		("^H", 0x08),
		("^I", 0x09),
		("^J", 0x0a),
		("^M", 0x0d),
	] {
		let expected = vec![Key::Char(char::from_u32(letter).unwrap())];
		assert_eq!(parse_sequence(input), Ok(expected));
	}
}

#[test]
fn test_control_letter_is_case_insensitive() {
	assert_eq!(parse_sequence("^w"), parse_sequence("^W"));
}

#[test]
fn test_parse_named_keys() {
	for (input, key) in [
		("<Left>", Key::Special(Special::Left)),
		("<Right>", Key::Special(Special::Right)),
		("<Up>", Key::Special(Special::Up)),
		("<Down>", Key::Special(Special::Down)),
		("<Home>", Key::Special(Special::Home)),
		("<End>", Key::Special(Special::End)),
		("<PageUp>", Key::Special(Special::PageUp)),
		("<PageDown>", Key::Special(Special::PageDown)),
		("<BackTab>", Key::Special(Special::BackTab)),
		("<Esc>", Key::ESC),
		("<Tab>", Key::TAB),
		("<BS>", Key::BACKSPACE),
		("<CR>", Key::ENTER),
	] {
		assert_eq!(parse_sequence(input), Ok(vec![key]));
	}
}

#[test]
fn test_parse_fn_keys() {
	for n in 1..=12u8 {
		let input = format!("<F{n}>");
		assert_eq!(parse_sequence(&input), Ok(vec![Key::Special(Special::F(n))]));
	}

	assert!(parse_sequence("<F13>").is_err());
	assert!(parse_sequence("<F0>").is_err());
}

#[test]
fn test_lt_escape() {
	assert_eq!(parse_sequence("<lt>"), Ok(vec![Key::Char('<')]));
}

#[test]
fn test_unknown_named_key_is_error() {
	assert_eq!(
		parse_sequence("<Bogus>"),
		Err(ParseError {
			message: "unknown key name: <Bogus>".to_string(),
			position: 7,
		})
	);
}

#[test]
fn test_empty_sequence_is_error() {
	assert!(parse_sequence("").is_err());
}

#[test]
fn test_mixed_sequence() {
	let keys = parse_sequence("d^Wd<Left>").unwrap();
	assert_eq!(
		keys,
		vec![
			Key::Char('d'),
			Key::Char('\u{17}'),
			Key::Char('d'),
			Key::Special(Special::Left),
		]
	);
}

#[test]
fn test_format_round_trip() {
	for literal in ["dd", "gg", "^[", "^W", "<Left>", "<F5>", "<lt>", "ZZ", "5dd"] {
		let keys = parse_sequence(literal).unwrap();
		assert_eq!(format_sequence(&keys), literal);
	}
}

#[test]
fn test_format_is_case_normalizing_for_control() {
	let keys = parse_sequence("^w").unwrap();
	assert_eq!(format_sequence(&keys), "^W");
}
