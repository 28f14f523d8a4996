use super::*;

fn salvage_at(
    state: &mut GameState,
    content: &GameContent,
    category: Category,
    index: u8,
) -> Result<u64, ColonyError> {
    let mut events = Vec::new();
    salvage(state, content, &key(&earth(), category, index), &mut events)
}

#[test]
fn construct_then_salvage_restores_energy_and_refunds() {
    let content = base_content();
    let mut state = base_state(&content);
    build(&mut state, &content, Category::Enr, 1, "wind_turbine").unwrap();
    let before = state.bodies.get(&earth()).unwrap().clone();
    let money_before = state.economy.money;

    build(&mut state, &content, Category::Res, 1, "coal_drill").unwrap();
    let refund = salvage_at(&mut state, &content, Category::Res, 1).unwrap();

    assert_eq!(refund, 225);
    assert_eq!(state.economy.money, money_before - 300 + 225);
    let after = state.bodies.get(&earth()).unwrap();
    assert_eq!(after.energy_usage, before.energy_usage);
    assert_eq!(after.energy_capacity, before.energy_capacity);
    assert!(after.occupant(Category::Res, slot(1)).is_none());
    assert!(!state
        .scheduler
        .is_registered(&JobKey::Slot(key(&earth(), Category::Res, 1))));
}

#[test]
fn refund_rounds_half_to_even() {
    let content = base_content();
    let mut state = base_state(&content);
    build(&mut state, &content, Category::Enr, 1, "wind_turbine").unwrap();

    let refund = salvage_at(&mut state, &content, Category::Enr, 1).unwrap();

    // 150 * 0.75 = 112.5
    assert_eq!(refund, 112);
    assert_eq!(state.economy.money, 2000 - 150 + 112);
    assert_eq!(state.bodies.get(&earth()).unwrap().energy_capacity, 0);
}

#[test]
fn salvaging_empty_slot_fails_without_mutation() {
    let content = base_content();
    let mut state = base_state(&content);

    let err = salvage_at(&mut state, &content, Category::Pro, 3).unwrap_err();

    assert_eq!(
        err,
        ColonyError::SlotEmpty {
            body: earth(),
            category: Category::Pro,
            slot: slot(3),
        }
    );
    assert_eq!(state.economy.money, 2000);
}

#[test]
fn load_bearing_generator_cannot_be_salvaged() {
    let content = base_content();
    let mut state = base_state(&content);
    build(&mut state, &content, Category::Enr, 1, "wind_turbine").unwrap();
    build(&mut state, &content, Category::Hab, 1, "pod_settlement").unwrap();
    let money = state.economy.money;

    let err = salvage_at(&mut state, &content, Category::Enr, 1).unwrap_err();

    assert_eq!(
        err,
        ColonyError::EnergyWouldUnderflow {
            capacity_after: 0,
            usage: 120,
        }
    );
    assert_eq!(state.economy.money, money);
    let body = state.bodies.get(&earth()).unwrap();
    assert_eq!(body.energy_capacity, 150);
    assert!(body.occupant(Category::Enr, slot(1)).is_some());
}

#[test]
fn habitation_salvage_removes_capacity() {
    let content = base_content();
    let mut state = powered_state(&content);
    build(&mut state, &content, Category::Hab, 1, "pod_settlement").unwrap();

    salvage_at(&mut state, &content, Category::Hab, 1).unwrap();

    let body = state.bodies.get(&earth()).unwrap();
    assert_eq!(body.habitation_capacity, 100);
    assert_eq!(body.energy_usage, 0);
}

#[test]
fn salvage_stops_production() {
    let content = base_content();
    let mut state = powered_state(&content);
    build(&mut state, &content, Category::Res, 1, "coal_drill").unwrap();
    run_ticks(&mut state, &content, 3);
    assert_eq!(stock(&state, &earth(), "Coal sacks"), 20);

    salvage_at(&mut state, &content, Category::Res, 1).unwrap();
    run_ticks(&mut state, &content, 9);

    assert_eq!(stock(&state, &earth(), "Coal sacks"), 20);
}

#[test]
fn salvage_clears_fault_message() {
    let content = base_content();
    let mut state = powered_state(&content);
    build(&mut state, &content, Category::Pro, 1, "weapon_forge").unwrap();
    run_ticks(&mut state, &content, 3);
    assert!(state
        .bodies
        .get(&earth())
        .unwrap()
        .messages
        .contains_key(&MessageId("fault_PRO1".to_string())));

    let mut events = Vec::new();
    salvage(
        &mut state,
        &content,
        &key(&earth(), Category::Pro, 1),
        &mut events,
    )
    .unwrap();

    let body = state.bodies.get(&earth()).unwrap();
    assert!(body.messages.is_empty(), "stale fault message left behind");
    assert_eq!(fault_changes(&events), vec![None]);
}

#[test]
fn browned_out_generator_salvages_without_capacity_loss() {
    let content = base_content();
    let mut state = base_state(&content);
    build(&mut state, &content, Category::Enr, 1, "wind_turbine").unwrap();
    build(&mut state, &content, Category::Enr, 2, "coal_generator").unwrap();
    build(&mut state, &content, Category::Dev, 1, "trading_center").unwrap();
    // No coal: the generator browns out on its first run.
    run_ticks(&mut state, &content, 3);
    let body = state.bodies.get(&earth()).unwrap();
    assert_eq!(body.energy_capacity, 150);
    assert_eq!(body.energy_usage, 450);

    let err = salvage_at(&mut state, &content, Category::Enr, 1).unwrap_err();
    assert!(matches!(err, ColonyError::EnergyWouldUnderflow { .. }));

    salvage_at(&mut state, &content, Category::Enr, 2).unwrap();
    let body = state.bodies.get(&earth()).unwrap();
    assert_eq!(body.energy_capacity, 150);
    assert!(body.messages.is_empty());
}
