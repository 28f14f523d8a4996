use crate::construction::{construct, salvage};
use crate::missions::{colonise, probe};
use crate::{
    Command, CommandEnvelope, ColonyError, Event, EventEnvelope, GameContent, GameState, SlotKey,
};

/// Applies every command scheduled for the current tick, in order.
///
/// Rejections become `CommandRejected` events; a rejected command leaves the
/// state untouched.
pub(crate) fn apply_commands(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;

    for envelope in commands {
        if envelope.execute_at_tick != current_tick {
            continue;
        }
        if let Err(err) = apply_command(state, &envelope.command, content, events) {
            tracing::warn!(command = %envelope.id, error = %err, "command rejected");
            events.push(crate::emit(
                &mut state.counters,
                current_tick,
                Event::CommandRejected {
                    command_id: envelope.id.clone(),
                    reason: err.to_string(),
                },
            ));
        }
    }
}

fn apply_command(
    state: &mut GameState,
    command: &Command,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Result<(), ColonyError> {
    match command {
        Command::Construct {
            body,
            category,
            slot,
            building,
        } => {
            let key = SlotKey {
                body: body.clone(),
                category: *category,
                slot: *slot,
            };
            construct(state, content, &key, building, events)
        }
        Command::Salvage {
            body,
            category,
            slot,
        } => {
            let key = SlotKey {
                body: body.clone(),
                category: *category,
                slot: *slot,
            };
            salvage(state, content, &key, events).map(|_refund| ())
        }
        Command::Probe { body } => probe(state, content, body, events),
        Command::Colonise { body } => colonise(state, content, body, events),
    }
}
