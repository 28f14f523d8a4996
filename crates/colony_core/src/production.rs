//! Slot jobs: extraction, processing and fuel consumption.
//!
//! Each run makes at most one inventory mutation. Fault state is written only
//! when it changes, and every change mirrors into the body's message list.

use crate::scheduler::{JobKey, JobKind};
use crate::{
    CelestialBody, Category, Event, EventEnvelope, Fault, FaultKind, GameContent, GameState,
    Message, MessageId, MessageKind, SlotIndex, SlotKey,
};

pub(crate) fn fault_message_id(category: Category, slot: SlotIndex) -> MessageId {
    MessageId(format!("fault_{category}{slot}"))
}

fn energy_shortage(activity: &str) -> Fault {
    Fault {
        kind: FaultKind::EnergyShortage,
        text: format!("Not enough energy to continue {activity}"),
    }
}

fn storage_full() -> Fault {
    Fault {
        kind: FaultKind::StorageFull,
        text: "Storage is full".to_string(),
    }
}

fn missing_input(good: &str, activity: &str) -> Fault {
    Fault {
        kind: FaultKind::MissingInput {
            good: good.to_string(),
        },
        text: format!("Missing {good} to continue {activity}"),
    }
}

/// Runs one due slot job against its body.
///
/// A job whose body or occupant has disappeared is stale and gets cancelled.
pub(crate) fn run_slot_job(
    state: &mut GameState,
    content: &GameContent,
    key: &SlotKey,
    kind: &JobKind,
    events: &mut Vec<EventEnvelope>,
) {
    let storage_cap = content.constants.storage_cap;
    let current_tick = state.meta.tick;

    let Some(body) = state.bodies.get_mut(&key.body) else {
        state.scheduler.cancel(&JobKey::Slot(key.clone()));
        return;
    };
    if body.occupant(key.category, key.slot).is_none() {
        state.scheduler.cancel(&JobKey::Slot(key.clone()));
        return;
    }

    let fault = match kind {
        JobKind::Extraction { good, rate } => extract(body, key, good, *rate, storage_cap),
        JobKind::Processing {
            input,
            input_rate,
            output,
            output_rate,
        } => process(
            body,
            key,
            (input, *input_rate),
            (output, *output_rate),
            storage_cap,
        ),
        JobKind::Consumption {
            input,
            input_rate,
            capacity,
        } => consume(body, key, input, *input_rate, *capacity),
        JobKind::MissionCountdown | JobKind::Population => return,
    };

    if let Some(event) = transition_fault(body, key.category, key.slot, fault) {
        events.push(crate::emit(&mut state.counters, current_tick, event));
    }
}

fn extract(
    body: &mut CelestialBody,
    key: &SlotKey,
    good: &str,
    rate: u32,
    storage_cap: u32,
) -> Option<Fault> {
    if body.energy_usage > body.energy_capacity {
        return Some(energy_shortage("extraction"));
    }
    let stock = body.stock(good);
    if stock >= storage_cap {
        return Some(storage_full());
    }
    let added = rate.min(storage_cap - stock);
    body.goods.insert(good.to_string(), stock + added);
    credit_output(body, key, added);
    None
}

fn process(
    body: &mut CelestialBody,
    key: &SlotKey,
    (input, input_rate): (&str, u32),
    (output, output_rate): (&str, u32),
    storage_cap: u32,
) -> Option<Fault> {
    let input_stock = body.stock(input);
    if input_stock < input_rate {
        return Some(missing_input(input, "production"));
    }
    if body.energy_usage > body.energy_capacity {
        return Some(energy_shortage("production"));
    }
    let output_stock = body.stock(output);
    if output_stock >= storage_cap {
        return Some(storage_full());
    }
    body.goods
        .insert(input.to_string(), input_stock - input_rate);
    let added = output_rate.min(storage_cap - output_stock);
    body.goods.insert(output.to_string(), output_stock + added);
    credit_output(body, key, added);
    None
}

/// Fuel burn for generators. Running dry takes the generator's capacity
/// offline once; refuelling brings it back and burns in the same run.
fn consume(
    body: &mut CelestialBody,
    key: &SlotKey,
    input: &str,
    input_rate: u32,
    capacity: u32,
) -> Option<Fault> {
    let browned_out = body
        .occupant(key.category, key.slot)
        .is_some_and(|occupant| occupant.fault.is_some());
    let stock = body.stock(input);
    if stock < input_rate {
        if !browned_out {
            body.energy_capacity = body.energy_capacity.saturating_sub(capacity);
        }
        return Some(missing_input(input, "service"));
    }
    if browned_out {
        body.energy_capacity = body.energy_capacity.saturating_add(capacity);
    }
    body.goods.insert(input.to_string(), stock - input_rate);
    None
}

fn credit_output(body: &mut CelestialBody, key: &SlotKey, amount: u32) {
    if let Some(occupant) = body.occupant_mut(key.category, key.slot) {
        occupant.output += u64::from(amount);
    }
}

/// Writes the new fault state if it differs from the current one.
pub(crate) fn transition_fault(
    body: &mut CelestialBody,
    category: Category,
    slot: SlotIndex,
    fault: Option<Fault>,
) -> Option<Event> {
    let occupant = body.occupant_mut(category, slot)?;
    if occupant.fault == fault {
        return None;
    }
    occupant.fault.clone_from(&fault);

    let message_id = fault_message_id(category, slot);
    match &fault {
        Some(f) => {
            tracing::debug!(body = %body.id, %category, %slot, fault = %f.text, "slot faulted");
            body.messages.insert(
                message_id,
                Message {
                    kind: MessageKind::Fault,
                    text: f.text.clone(),
                    remaining_ticks: None,
                },
            );
        }
        None => {
            tracing::debug!(body = %body.id, %category, %slot, "slot fault cleared");
            body.messages.remove(&message_id);
        }
    }

    Some(Event::FaultChanged {
        body: body.id.clone(),
        category,
        slot,
        fault: fault.as_ref().map(|f| f.kind.clone()),
        text: fault.map(|f| f.text),
    })
}
