use super::*;

fn envelope(id: u64, at: u64, command: Command) -> CommandEnvelope {
    CommandEnvelope {
        id: CommandId(format!("cmd_{id:06}")),
        issued_tick: at,
        execute_at_tick: at,
        command,
    }
}

fn construct_wind(slot_index: u8) -> Command {
    Command::Construct {
        body: earth(),
        category: Category::Enr,
        slot: slot(slot_index),
        building: building("wind_turbine"),
    }
}

#[test]
fn construct_command_applies_on_its_tick() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    let events = tick(
        &mut state,
        &[envelope(0, 0, construct_wind(1))],
        &content,
        &mut rng,
        EventLevel::Normal,
    );

    assert_eq!(state.economy.money, 1850);
    assert!(matches!(
        events[0].event,
        Event::BuildingConstructed { .. }
    ));
    assert_eq!(events[0].tick, 0);
    assert_eq!(state.meta.tick, 1);
}

#[test]
fn rejected_command_emits_event_and_changes_nothing() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();
    let commands = [
        envelope(0, 0, construct_wind(1)),
        envelope(1, 0, construct_wind(1)),
    ];

    let events = tick(&mut state, &commands, &content, &mut rng, EventLevel::Normal);

    assert_eq!(state.economy.money, 1850);
    let rejected: Vec<&CommandId> = events
        .iter()
        .filter_map(|e| match &e.event {
            Event::CommandRejected { command_id, .. } => Some(command_id),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, vec![&CommandId("cmd_000001".to_string())]);
}

#[test]
fn future_command_waits_for_its_tick() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();
    let commands = [envelope(0, 1, construct_wind(1))];

    tick(&mut state, &commands, &content, &mut rng, EventLevel::Normal);
    assert_eq!(state.economy.money, 2000);

    tick(&mut state, &commands, &content, &mut rng, EventLevel::Normal);
    assert!(state
        .bodies
        .get(&earth())
        .unwrap()
        .occupant(Category::Enr, slot(1))
        .is_some());
}

#[test]
fn salvage_and_probe_commands() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();
    tick(
        &mut state,
        &[envelope(0, 0, construct_wind(2))],
        &content,
        &mut rng,
        EventLevel::Normal,
    );

    let commands = [
        envelope(
            1,
            1,
            Command::Salvage {
                body: earth(),
                category: Category::Enr,
                slot: slot(2),
            },
        ),
        envelope(2, 1, Command::Probe { body: rock() }),
    ];
    let events = tick(&mut state, &commands, &content, &mut rng, EventLevel::Normal);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::BuildingSalvaged { refund: 112, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::MissionStarted { cost: 701, .. })));
    // 2000 - 150 + 112 - 701, plus the first tax (round(100 * 0.1)) on tick 1
    assert_eq!(state.economy.money, 1271);
}

#[test]
fn event_ids_are_sequential() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    let events = tick(
        &mut state,
        &[
            envelope(0, 0, construct_wind(1)),
            envelope(1, 0, construct_wind(2)),
        ],
        &content,
        &mut rng,
        EventLevel::Normal,
    );

    let ids: Vec<&str> = events.iter().map(|e| e.id.0.as_str()).collect();
    assert_eq!(ids, vec!["evt_000000", "evt_000001"]);
}
