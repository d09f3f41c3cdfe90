//! End-to-end dispatch scenarios driving a toy NORMAL-mode binding set
//! through the public facade.

use keyseq_engine::{CommandFlags, CommandHandler, CommandId, DispatchStatus, Engine, FollowedBy, KeyInfo, Kind, KeysInfo};
use keyseq_parser::{parse_sequence, Key};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Mode {
	Normal,
}

const DD: CommandId = CommandId(1);
const G: CommandId = CommandId(2);
const GG: CommandId = CommandId(3);
const D_OP: CommandId = CommandId(4);
const Y_OP: CommandId = CommandId(5);
const J_SEL: CommandId = CommandId(6);
const COLON: CommandId = CommandId(7);
const ENTER: CommandId = CommandId(8);

#[derive(Debug, Clone)]
enum Call {
	Command { id: CommandId, info: KeyInfo, indexes: Vec<i64>, inside_mapping: bool },
	Selector { id: CommandId, info: KeyInfo },
}

#[derive(Default)]
struct Recorder {
	calls: Vec<Call>,
}

impl CommandHandler<Mode> for Recorder {
	fn handle_command(&mut self, engine: &mut Engine<Mode>, _mode: Mode, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo) {
		self.calls.push(Call::Command {
			id,
			info,
			indexes: keys_info.indexes.clone(),
			inside_mapping: engine.inside_mapping(),
		});
	}

	fn handle_selector(&mut self, _engine: &mut Engine<Mode>, _mode: Mode, id: CommandId, info: KeyInfo, keys_info: &mut KeysInfo) {
		let count = info.count.unwrap_or(1);
		keys_info.count = count;
		keys_info.indexes = (0..count as i64).collect();
		self.calls.push(Call::Selector { id, info });
	}
}

fn feed_str(engine: &mut Engine<Mode>, handler: &mut Recorder, input: &str) -> DispatchStatus {
	let mut status = DispatchStatus::Handled;
	for key in parse_sequence(input).unwrap() {
		status = engine.feed(Mode::Normal, key, handler);
	}
	status
}

#[test]
fn register_and_count_reach_the_handler() {
	let mut engine = Engine::new();
	engine
		.add_binding(
			Mode::Normal,
			Kind::Command,
			&parse_sequence("dd").unwrap(),
			DD,
			CommandFlags { accepts_register: true, ..Default::default() },
		)
		.unwrap();

	let mut handler = Recorder::default();
	let status = feed_str(&mut engine, &mut handler, "\"a12dd");

	assert!(status.is_handled());
	assert_eq!(handler.calls.len(), 1);
	let Call::Command { id, info, .. } = &handler.calls[0] else { panic!("expected a command call") };
	assert_eq!(*id, DD);
	assert_eq!(info.register, Some('a'));
	assert_eq!(info.count, Some(12));
}

#[test]
fn selector_count_flows_into_the_operator() {
	let mut engine = Engine::new();
	engine
		.add_binding(
			Mode::Normal,
			Kind::Command,
			&parse_sequence("d").unwrap(),
			D_OP,
			CommandFlags { followed_by: FollowedBy::Selector, ..Default::default() },
		)
		.unwrap();
	engine.add_binding(Mode::Normal, Kind::Selector, &parse_sequence("j").unwrap(), J_SEL, CommandFlags::default()).unwrap();

	let mut handler = Recorder::default();
	let status = feed_str(&mut engine, &mut handler, "3dj");

	assert!(status.is_handled());
	assert_eq!(handler.calls.len(), 2);
	let Call::Selector { id, info } = &handler.calls[0] else { panic!("expected the selector to run first") };
	assert_eq!(*id, J_SEL);
	assert_eq!(info.count, Some(3));

	let Call::Command { id, indexes, .. } = &handler.calls[1] else { panic!("expected the operator to run second") };
	assert_eq!(*id, D_OP);
	assert_eq!(indexes, &vec![0, 1, 2]);
}

#[test]
fn register_and_selector_count_compose_scenario_six() {
	let mut engine = Engine::new();
	engine
		.add_binding(
			Mode::Normal,
			Kind::Command,
			&parse_sequence("y").unwrap(),
			Y_OP,
			CommandFlags { followed_by: FollowedBy::Selector, accepts_register: true, ..Default::default() },
		)
		.unwrap();
	engine.add_binding(Mode::Normal, Kind::Selector, &parse_sequence("j").unwrap(), J_SEL, CommandFlags::default()).unwrap();

	let mut handler = Recorder::default();
	let status = feed_str(&mut engine, &mut handler, "\"x3yj");

	assert!(status.is_handled());
	let Call::Selector { info: selector_info, .. } = &handler.calls[0] else { panic!() };
	assert_eq!(selector_info.count, Some(3));

	let Call::Command { id, info, .. } = &handler.calls[1] else { panic!() };
	assert_eq!(*id, Y_OP);
	assert_eq!(info.register, Some('x'));
}

#[test]
fn user_mapping_defers_and_reports_inside_mapping() {
	let mut engine = Engine::new();
	engine
		.add_binding(Mode::Normal, Kind::Command, &parse_sequence(":").unwrap(), COLON, CommandFlags::default())
		.unwrap();
	engine
		.add_binding(Mode::Normal, Kind::Command, &parse_sequence("^M").unwrap(), ENTER, CommandFlags::default())
		.unwrap();
	engine.add_user_mapping(Mode::Normal, &parse_sequence(",w").unwrap(), parse_sequence(":^M").unwrap(), false).unwrap();

	let mut handler = Recorder::default();
	let status = feed_str(&mut engine, &mut handler, ",w");

	assert!(status.is_handled());
	assert_eq!(handler.calls.len(), 2);
	let Call::Command { id, inside_mapping, .. } = &handler.calls[0] else { panic!() };
	assert_eq!(*id, COLON);
	assert!(*inside_mapping);

	let Call::Command { id, .. } = &handler.calls[1] else { panic!() };
	assert_eq!(*id, ENTER);
}

#[test]
fn execute_deferred_runs_before_the_triggering_feed_call_returns() {
	#[derive(Default)]
	struct DeferOnColon {
		calls: Vec<CommandId>,
	}

	impl CommandHandler<Mode> for DeferOnColon {
		fn handle_command(&mut self, engine: &mut Engine<Mode>, _mode: Mode, id: CommandId, _info: KeyInfo, _keys_info: &mut KeysInfo) {
			self.calls.push(id);
			if id == COLON {
				engine.execute_deferred(vec![Key::ENTER]);
			}
		}
		fn handle_selector(&mut self, _engine: &mut Engine<Mode>, _mode: Mode, _id: CommandId, _info: KeyInfo, _keys_info: &mut KeysInfo) {}
	}

	let mut engine = Engine::new();
	engine
		.add_binding(Mode::Normal, Kind::Command, &parse_sequence(":").unwrap(), COLON, CommandFlags::default())
		.unwrap();
	engine
		.add_binding(Mode::Normal, Kind::Command, &parse_sequence("^M").unwrap(), ENTER, CommandFlags::default())
		.unwrap();

	let mut handler = DeferOnColon::default();
	let status = engine.feed(Mode::Normal, Key::Char(':'), &mut handler);

	assert!(status.is_handled());
	assert_eq!(handler.calls, vec![COLON, ENTER]);
}

#[test]
fn mutually_recursive_mappings_hit_the_recursion_bound() {
	let mut engine = Engine::new();
	engine.add_user_mapping(Mode::Normal, &parse_sequence("a").unwrap(), parse_sequence("b").unwrap(), false).unwrap();
	engine.add_user_mapping(Mode::Normal, &parse_sequence("b").unwrap(), parse_sequence("a").unwrap(), false).unwrap();

	let mut handler = Recorder::default();
	let status = feed_str(&mut engine, &mut handler, "a");

	assert!(matches!(status, DispatchStatus::Error(keyseq_engine::EngineError::RecursionTooDeep { .. })));
	assert!(handler.calls.is_empty());

	// The pending buffer is empty afterwards: a fresh key starts clean.
	let status = engine.feed(Mode::Normal, Key::Char('x'), &mut handler);
	assert!(matches!(status, DispatchStatus::Unknown));
}

#[test]
fn ambiguous_prefix_without_its_own_binding_times_out_to_unknown() {
	let mut engine = Engine::new();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("gg").unwrap(), GG, CommandFlags::default()).unwrap();

	let mut handler = Recorder::default();
	let status = engine.feed(Mode::Normal, Key::Char('g'), &mut handler);
	assert!(matches!(status, DispatchStatus::Wait));

	let status = engine.feed_timeout(Mode::Normal, &mut handler);
	assert!(matches!(status, DispatchStatus::Unknown));
	assert!(handler.calls.is_empty());
}

#[test]
fn exact_and_prefix_binding_times_out_to_the_short_form() {
	let mut engine = Engine::new();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("g").unwrap(), G, CommandFlags::default()).unwrap();
	engine.add_binding(Mode::Normal, Kind::Command, &parse_sequence("gg").unwrap(), GG, CommandFlags::default()).unwrap();

	let mut handler = Recorder::default();
	let status = engine.feed(Mode::Normal, Key::Char('g'), &mut handler);
	assert!(matches!(status, DispatchStatus::WaitShort { .. }));

	let status = engine.feed_timeout(Mode::Normal, &mut handler);
	assert!(status.is_handled());
	assert_eq!(handler.calls.len(), 1);
	let Call::Command { id, .. } = &handler.calls[0] else { panic!() };
	assert_eq!(*id, G);
}
