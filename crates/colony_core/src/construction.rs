//! Construction and salvage of slot buildings.
//!
//! Both operations validate fully before touching state; an `Err` means
//! nothing changed.

use crate::production::{fault_message_id, transition_fault};
use crate::scheduler::{JobKey, JobKind};
use crate::{
    Abundance, BuildingDef, BuildingId, Category, CelestialBody, ColonyError, Constants, Event,
    EventEnvelope, GameContent, GameState, Requirement, SlotKey, SlotOccupant,
};

/// Places `building` into an empty slot and starts its job.
pub fn construct(
    state: &mut GameState,
    content: &GameContent,
    key: &SlotKey,
    building: &BuildingId,
    events: &mut Vec<EventEnvelope>,
) -> Result<(), ColonyError> {
    let body = state.bodies.get(&key.body)?;
    if !body.colonised {
        return Err(ColonyError::BodyNotColonised {
            body: key.body.clone(),
        });
    }
    let def = content.building(key.category, building)?;
    if body.occupant(key.category, key.slot).is_some() {
        return Err(ColonyError::SlotOccupied {
            body: key.body.clone(),
            category: key.category,
            slot: key.slot,
        });
    }
    if state.economy.money < def.price {
        return Err(ColonyError::InsufficientFunds {
            needed: def.price,
            available: state.economy.money,
        });
    }
    if key.category != Category::Enr
        && body.energy_usage.saturating_add(def.energy_drain) > body.energy_capacity
    {
        return Err(ColonyError::InsufficientEnergy {
            needed: def.energy_drain,
            available: body.energy_capacity.saturating_sub(body.energy_usage),
        });
    }
    let abundance = if key.category == Category::Res {
        check_requirement(body, def)?
    } else {
        None
    };

    state.economy.money -= def.price;
    state.bodies.mutate(&key.body, |body| {
        match key.category {
            Category::Enr => body.energy_capacity += def.output_rate,
            Category::Hab => {
                body.habitation_capacity += def.output_rate;
                body.energy_usage += def.energy_drain;
            }
            Category::Res | Category::Pro | Category::Dev => {
                body.energy_usage += def.energy_drain;
            }
        }
        body.slots
            .entry(key.category)
            .or_default()
            .insert(key.slot, SlotOccupant::new(def.id.clone()));
    })?;

    if let Some((kind, interval)) = job_for(def, abundance, &content.constants) {
        state
            .scheduler
            .register(JobKey::Slot(key.clone()), kind, interval);
    }

    tracing::info!(
        body = %key.body,
        slot = %format_args!("{}{}", key.category, key.slot),
        building = %def.id,
        price = def.price,
        "building constructed"
    );
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::BuildingConstructed {
            body: key.body.clone(),
            category: key.category,
            slot: key.slot,
            building: def.id.clone(),
        },
    ));
    Ok(())
}

/// Extraction sites need their atmosphere or native resource on the body.
/// Returns the resource's abundance when yield should scale with it.
fn check_requirement(
    body: &CelestialBody,
    def: &BuildingDef,
) -> Result<Option<Abundance>, ColonyError> {
    let missing = |requirement: &str| ColonyError::MissingResourcePrecondition {
        body: body.id.clone(),
        building: def.id.clone(),
        requirement: requirement.to_string(),
    };
    match &def.requirement {
        Requirement::Atmosphere => {
            if body.atmosphere {
                Ok(None)
            } else {
                Err(missing("an atmosphere"))
            }
        }
        Requirement::NativeResource(resource) => body
            .resources
            .get(resource)
            .copied()
            .map(Some)
            .ok_or_else(|| missing(resource)),
        _ => Ok(None),
    }
}

fn job_for(
    def: &BuildingDef,
    abundance: Option<Abundance>,
    constants: &Constants,
) -> Option<(JobKind, u64)> {
    match def.category {
        Category::Res => {
            let rate = abundance.map_or(def.output_rate, |a| {
                (f64::from(def.output_rate) * a.yield_multiplier()).round_ties_even() as u32
            });
            let kind = JobKind::Extraction {
                good: def.output_good.clone()?,
                rate,
            };
            Some((kind, constants.production_interval_ticks))
        }
        Category::Pro => {
            let kind = JobKind::Processing {
                input: def.input_good.clone()?,
                input_rate: def.input_rate,
                output: def.output_good.clone()?,
                output_rate: def.output_rate,
            };
            Some((kind, constants.production_interval_ticks))
        }
        Category::Enr if def.input_rate > 0 => {
            let kind = JobKind::Consumption {
                input: def.input_good.clone()?,
                input_rate: def.input_rate,
                capacity: def.output_rate,
            };
            Some((kind, constants.consumption_interval_ticks))
        }
        Category::Enr | Category::Dev | Category::Hab => None,
    }
}

/// Clears a slot, refunds part of the price and cancels the slot's job.
/// Returns the refund.
pub fn salvage(
    state: &mut GameState,
    content: &GameContent,
    key: &SlotKey,
    events: &mut Vec<EventEnvelope>,
) -> Result<u64, ColonyError> {
    let body = state.bodies.get(&key.body)?;
    let occupant = body
        .occupant(key.category, key.slot)
        .ok_or_else(|| ColonyError::SlotEmpty {
            body: key.body.clone(),
            category: key.category,
            slot: key.slot,
        })?;
    let def = content.building(key.category, &occupant.building)?;

    // A generator that ran dry already took its capacity offline.
    let capacity_contribution = if key.category == Category::Enr && occupant.fault.is_none() {
        def.output_rate
    } else {
        0
    };
    let capacity_after = body.energy_capacity.saturating_sub(capacity_contribution);
    if capacity_contribution > 0 && capacity_after < body.energy_usage {
        return Err(ColonyError::EnergyWouldUnderflow {
            capacity_after,
            usage: body.energy_usage,
        });
    }
    let refund =
        (def.price as f64 * content.constants.salvage_factor).round_ties_even() as u64;
    let had_fault = occupant.fault.is_some();

    let cleared = state.bodies.mutate(&key.body, |body| {
        let cleared = if had_fault {
            transition_fault(body, key.category, key.slot, None)
        } else {
            None
        };
        body.messages
            .remove(&fault_message_id(key.category, key.slot));
        match key.category {
            Category::Enr => body.energy_capacity = capacity_after,
            Category::Hab => {
                body.habitation_capacity =
                    body.habitation_capacity.saturating_sub(def.output_rate);
                body.energy_usage = body.energy_usage.saturating_sub(def.energy_drain);
            }
            Category::Res | Category::Pro | Category::Dev => {
                body.energy_usage = body.energy_usage.saturating_sub(def.energy_drain);
            }
        }
        if let Some(slots) = body.slots.get_mut(&key.category) {
            slots.remove(&key.slot);
            if slots.is_empty() {
                body.slots.remove(&key.category);
            }
        }
        cleared
    })?;
    state.scheduler.cancel(&JobKey::Slot(key.clone()));
    state.economy.money += refund;

    let current_tick = state.meta.tick;
    if let Some(event) = cleared {
        events.push(crate::emit(&mut state.counters, current_tick, event));
    }
    tracing::info!(
        body = %key.body,
        slot = %format_args!("{}{}", key.category, key.slot),
        building = %def.id,
        refund,
        "building salvaged"
    );
    events.push(crate::emit(
        &mut state.counters,
        current_tick,
        Event::BuildingSalvaged {
            body: key.body.clone(),
            category: key.category,
            slot: key.slot,
            building: def.id.clone(),
            refund,
        },
    ));
    Ok(refund)
}
