//! A toy NORMAL-mode command registry, just enough to exercise every
//! dispatch path the engine supports.

use keyseq_engine::{CommandFlags, CommandHandler, CommandId, Engine, FollowedBy, KeyInfo, Kind, KeysInfo};
use keyseq_parser::parse_sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
	Normal,
}

pub const DD: CommandId = CommandId(1);
pub const YY: CommandId = CommandId(2);
pub const G: CommandId = CommandId(3);
pub const GG: CommandId = CommandId(4);
pub const DELETE: CommandId = CommandId(5);
pub const YANK: CommandId = CommandId(6);
pub const LINE_DOWN: CommandId = CommandId(7);
pub const LINE_UP: CommandId = CommandId(8);
pub const MARK: CommandId = CommandId(9);

/// Builds an [`Engine`] preloaded with a toy binding set modeled loosely on
/// the teacher's own normal-mode defaults: simple commands (`dd`, `yy`,
/// `g`/`gg`), operator+selector pairs (`d`/`y` followed by `j`/`k`), a
/// multikey command (`m` + mark name), and one user mapping.
pub fn build_engine() -> Engine<Mode> {
	let mut engine = Engine::new();

	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("dd").unwrap(), DD, CommandFlags { accepts_register: true, ..Default::default() }).unwrap();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("yy").unwrap(), YY, CommandFlags { accepts_register: true, ..Default::default() }).unwrap();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("g").unwrap(), G, CommandFlags::default()).unwrap();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("gg").unwrap(), GG, CommandFlags::default()).unwrap();
	engine
		.add_binding(
			Mode::Normal,
			Kind::Command,
			&parse_sequence("d").unwrap(),
			DELETE,
			CommandFlags { followed_by: FollowedBy::Selector, accepts_register: true, ..Default::default() },
		)
		.unwrap();
	engine
		.add_binding(
			Mode::Normal,
			Kind::Command,
			&parse_sequence("y").unwrap(),
			YANK,
			CommandFlags { followed_by: FollowedBy::Selector, accepts_register: true, ..Default::default() },
		)
		.unwrap();
	engine.add_binding(Mode::Normal, Kind::Selector, &parse_sequence("j").unwrap(), LINE_DOWN, CommandFlags::default()).unwrap();
	engine.add_binding(Mode::Normal, Kind::Selector, &parse_sequence("k").unwrap(), LINE_UP, CommandFlags::default()).unwrap();
	engine
		.add_binding(Mode::Normal, Kind::Command, &parse_sequence("m").unwrap(), MARK, CommandFlags { followed_by: FollowedBy::Multikey, ..Default::default() })
		.unwrap();
	engine.add_user_mapping(Mode::Normal, &parse_sequence("ZZ").unwrap(), parse_sequence("gg").unwrap(), false).unwrap();

	engine
}

/// Prints a line for every command and selector dispatch it receives.
pub struct PrintingHandler;

impl CommandHandler<Mode> for PrintingHandler {
	fn handle_command(&mut self, engine: &mut Engine<Mode>, _mode: Mode, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo) {
		let name = command_name(id);
		println!(
			"command {name} count={:?} register={:?} multi={:?} indexes={:?} inside_mapping={}",
			info.count,
			info.register,
			info.multi,
			keys_info.indexes,
			engine.inside_mapping()
		);
	}

	fn handle_selector(&mut self, _engine: &mut Engine<Mode>, _mode: Mode, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo) {
		let count = info.count.unwrap_or(1);
		keys_info.count = count;
		keys_info.indexes = (0..i64::from(count)).collect();
		println!("selector {} count={count} -> indexes={:?}", command_name(id), keys_info.indexes);
	}
}

fn command_name(id: CommandId) -> &'static str {
	match id {
		DD => "dd",
		YY => "yy",
		G => "g",
		GG => "gg",
		DELETE => "d",
		YANK => "y",
		LINE_DOWN => "j",
		LINE_UP => "k",
		MARK => "m",
		_ => "?",
	}
}
