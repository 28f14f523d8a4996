//! Probe and colonise missions.
//!
//! A mission lives as an info message on the target body plus a countdown job.
//! Completing it flips the body's lifecycle flag and removes the message.

use crate::scheduler::{JobKey, JobKind};
use crate::{
    BodyId, BodyKind, ColonyError, Constants, Event, EventEnvelope, GameContent, GameState,
    Message, MessageKind, MissionKind, Position,
};

/// Cost and duration in ticks of a mission over `distance`.
pub fn mission_terms(kind: MissionKind, distance: f64, constants: &Constants) -> (u64, u64) {
    let (base, per_distance, ticks_per_distance) = match kind {
        MissionKind::Probe => (
            constants.probe_base_cost,
            constants.probe_cost_per_distance,
            constants.probe_ticks_per_distance,
        ),
        MissionKind::Colonise => (
            constants.colonise_base_cost,
            constants.colonise_cost_per_distance,
            constants.colonise_ticks_per_distance,
        ),
    };
    let cost = base + (distance * per_distance).round_ties_even() as u64;
    let ticks = (distance * ticks_per_distance).round_ties_even() as u64;
    (cost, ticks)
}

/// Distance from the capital to `body`; the origin stands in without a capital.
pub fn distance_from_capital(state: &GameState, body: &BodyId) -> Result<f64, ColonyError> {
    let target = state.bodies.get(body)?;
    let origin = state
        .capital
        .as_ref()
        .and_then(|capital| state.bodies.get(capital).ok())
        .map_or_else(Position::default, |capital| capital.position);
    Ok(origin.distance_to(target.position))
}

pub fn probe(
    state: &mut GameState,
    content: &GameContent,
    body: &BodyId,
    events: &mut Vec<EventEnvelope>,
) -> Result<(), ColonyError> {
    start_mission(state, content, body, MissionKind::Probe, events)
}

pub fn colonise(
    state: &mut GameState,
    content: &GameContent,
    body: &BodyId,
    events: &mut Vec<EventEnvelope>,
) -> Result<(), ColonyError> {
    start_mission(state, content, body, MissionKind::Colonise, events)
}

fn check_target(state: &GameState, body: &BodyId, kind: MissionKind) -> Result<(), ColonyError> {
    let target = state.bodies.get(body)?;
    if target.kind == BodyKind::Star {
        return Err(ColonyError::InvalidMissionTarget { body: body.clone() });
    }
    match kind {
        MissionKind::Probe => {
            if target.probed {
                return Err(ColonyError::AlreadyProbed { body: body.clone() });
            }
        }
        MissionKind::Colonise => {
            if target.colonised {
                return Err(ColonyError::AlreadyColonised { body: body.clone() });
            }
            if !target.probed {
                return Err(ColonyError::NotProbed { body: body.clone() });
            }
        }
    }
    if let Some(active) = target.active_mission() {
        return Err(ColonyError::MissionInProgress {
            body: body.clone(),
            kind: active,
        });
    }
    Ok(())
}

fn start_mission(
    state: &mut GameState,
    content: &GameContent,
    body: &BodyId,
    kind: MissionKind,
    events: &mut Vec<EventEnvelope>,
) -> Result<(), ColonyError> {
    check_target(state, body, kind)?;
    let distance = distance_from_capital(state, body)?;
    let (cost, ticks) = mission_terms(kind, distance, &content.constants);
    if state.economy.money < cost {
        return Err(ColonyError::InsufficientFunds {
            needed: cost,
            available: state.economy.money,
        });
    }

    let text = match kind {
        MissionKind::Probe => "Probing Mission",
        MissionKind::Colonise => "Colonising Mission",
    };
    state.bodies.add_message(
        body,
        kind.message_id(),
        Message {
            kind: MessageKind::Info,
            text: text.to_string(),
            remaining_ticks: Some(ticks),
        },
    )?;
    state.economy.money -= cost;
    state.scheduler.register(
        JobKey::Mission {
            body: body.clone(),
            kind,
        },
        JobKind::MissionCountdown,
        content.constants.mission_interval_ticks,
    );

    tracing::info!(%body, mission = kind.label(), distance, cost, ticks, "mission started");
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::MissionStarted {
            body: body.clone(),
            kind,
            cost,
            remaining_ticks: ticks,
        },
    ));
    Ok(())
}

/// One countdown step. Completes in the same run the countdown reaches zero.
pub(crate) fn advance_mission(
    state: &mut GameState,
    content: &GameContent,
    body_id: &BodyId,
    kind: MissionKind,
    events: &mut Vec<EventEnvelope>,
) {
    let job_key = JobKey::Mission {
        body: body_id.clone(),
        kind,
    };
    let message_id = kind.message_id();
    let current_tick = state.meta.tick;

    let Some(body) = state.bodies.get_mut(body_id) else {
        state.scheduler.cancel(&job_key);
        return;
    };
    let Some(remaining) = body
        .messages
        .get_mut(&message_id)
        .and_then(|message| message.remaining_ticks.as_mut())
    else {
        state.scheduler.cancel(&job_key);
        return;
    };
    *remaining = remaining.saturating_sub(1);
    let remaining_ticks = *remaining;
    events.push(crate::emit(
        &mut state.counters,
        current_tick,
        Event::MissionProgress {
            body: body_id.clone(),
            kind,
            remaining_ticks,
        },
    ));
    if remaining_ticks > 0 {
        return;
    }

    body.messages.remove(&message_id);
    body.probed = true;
    if kind == MissionKind::Colonise {
        body.colonised = true;
        if state.capital.is_none() {
            body.habitation_capacity = body
                .habitation_capacity
                .max(content.constants.capital_habitation_capacity);
            state.capital = Some(body_id.clone());
        }
        state.scheduler.register(
            JobKey::Population(body_id.clone()),
            JobKind::Population,
            content.constants.population_interval_ticks,
        );
    }
    state.scheduler.cancel(&job_key);

    tracing::info!(body = %body_id, mission = kind.label(), "mission completed");
    events.push(crate::emit(
        &mut state.counters,
        current_tick,
        Event::MissionCompleted {
            body: body_id.clone(),
            kind,
        },
    ));
}
