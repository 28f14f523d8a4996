use super::*;

fn forge_state(content: &GameContent) -> GameState {
    let mut state = powered_state(content);
    build(&mut state, content, Category::Pro, 1, "weapon_forge").unwrap();
    state
}

#[test]
fn missing_input_faults_without_mutation() {
    let content = base_content();
    let mut state = forge_state(&content);
    set_stock(&mut state, &earth(), "Iron ingots", 9);

    let events = run_ticks(&mut state, &content, 3);

    assert_eq!(
        fault_changes(&events),
        vec![Some(FaultKind::MissingInput {
            good: "Iron ingots".to_string()
        })]
    );
    assert_eq!(
        fault_at(&state, &earth(), Category::Pro, 1).unwrap().text,
        "Missing Iron ingots to continue production"
    );
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 9);
    assert_eq!(stock(&state, &earth(), "Weapons"), 0);
}

#[test]
fn replenished_input_clears_fault_next_run() {
    let content = base_content();
    let mut state = forge_state(&content);
    run_ticks(&mut state, &content, 3);
    assert!(fault_at(&state, &earth(), Category::Pro, 1).is_some());

    set_stock(&mut state, &earth(), "Iron ingots", 25);
    let events = run_ticks(&mut state, &content, 3);

    assert_eq!(fault_changes(&events), vec![None]);
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 15);
    assert_eq!(stock(&state, &earth(), "Weapons"), 10);
    assert!(state.bodies.get(&earth()).unwrap().messages.is_empty());
}

#[test]
fn input_is_checked_before_energy() {
    let content = base_content();
    let mut state = forge_state(&content);
    with_body(&mut state, &earth(), |b| b.energy_capacity = 0);

    run_ticks(&mut state, &content, 3);

    assert!(matches!(
        fault_at(&state, &earth(), Category::Pro, 1).unwrap().kind,
        FaultKind::MissingInput { .. }
    ));
}

#[test]
fn energy_shortage_blocks_processing() {
    let content = base_content();
    let mut state = forge_state(&content);
    set_stock(&mut state, &earth(), "Iron ingots", 50);
    with_body(&mut state, &earth(), |b| b.energy_capacity = 100);

    run_ticks(&mut state, &content, 3);

    let fault = fault_at(&state, &earth(), Category::Pro, 1).unwrap();
    assert_eq!(fault.kind, FaultKind::EnergyShortage);
    assert_eq!(fault.text, "Not enough energy to continue production");
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 50);
}

#[test]
fn full_output_storage_keeps_input() {
    let content = base_content();
    let mut state = forge_state(&content);
    set_stock(&mut state, &earth(), "Iron ingots", 50);
    set_stock(&mut state, &earth(), "Weapons", 1000);

    run_ticks(&mut state, &content, 3);

    assert_eq!(
        fault_at(&state, &earth(), Category::Pro, 1).unwrap().kind,
        FaultKind::StorageFull
    );
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 50);
    assert_eq!(stock(&state, &earth(), "Weapons"), 1000);
}

#[test]
fn output_is_clamped_at_storage_cap() {
    let content = base_content();
    let mut state = forge_state(&content);
    set_stock(&mut state, &earth(), "Iron ingots", 50);
    set_stock(&mut state, &earth(), "Weapons", 995);

    run_ticks(&mut state, &content, 3);

    assert_eq!(stock(&state, &earth(), "Iron ingots"), 40);
    assert_eq!(stock(&state, &earth(), "Weapons"), 1000);
    assert!(fault_at(&state, &earth(), Category::Pro, 1).is_none());
}

#[test]
fn mine_feeds_forge_chain() {
    let content = base_content();
    let mut state = forge_state(&content);
    build(&mut state, &content, Category::Res, 1, "iron_mine").unwrap();

    // The mine runs first in key order, so the forge always sees fresh ore.
    run_ticks(&mut state, &content, 3);
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 5);
    assert_eq!(stock(&state, &earth(), "Weapons"), 10);

    run_ticks(&mut state, &content, 30);
    assert_eq!(stock(&state, &earth(), "Iron ingots"), 55);
    assert_eq!(stock(&state, &earth(), "Weapons"), 110);
}
