//! Per-body record store.
//!
//! The ledger exclusively owns all mutable body state. Callers mutate a body
//! through a closure, so no caller can hold a partially updated record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BodyId, CelestialBody, ColonyError, Message, MessageId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    bodies: BTreeMap<BodyId, CelestialBody>,
}

impl Ledger {
    pub fn insert(&mut self, body: CelestialBody) {
        self.bodies.insert(body.id.clone(), body);
    }

    pub fn get(&self, id: &BodyId) -> Result<&CelestialBody, ColonyError> {
        self.bodies
            .get(id)
            .ok_or_else(|| ColonyError::UnknownBody { body: id.clone() })
    }

    /// Runs `f` with exclusive access to one body.
    pub fn mutate<R>(
        &mut self,
        id: &BodyId,
        f: impl FnOnce(&mut CelestialBody) -> R,
    ) -> Result<R, ColonyError> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or_else(|| ColonyError::UnknownBody { body: id.clone() })?;
        Ok(f(body))
    }

    pub fn add_message(
        &mut self,
        id: &BodyId,
        message_id: MessageId,
        message: Message,
    ) -> Result<(), ColonyError> {
        self.mutate(id, |body| {
            body.messages.insert(message_id, message);
        })
    }

    /// Removes a message. Removing an absent message is not an error.
    pub fn remove_message(
        &mut self,
        id: &BodyId,
        message_id: &MessageId,
    ) -> Result<Option<Message>, ColonyError> {
        self.mutate(id, |body| body.messages.remove(message_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.values()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: &BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(id)
    }
}
