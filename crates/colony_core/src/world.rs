//! `World` aggregate: owns content, state and the RNG, and exposes the
//! inbound calls a presentation layer makes.
//!
//! Direct calls (`construct`, `probe`, ...) apply immediately and return
//! their error. Their events are buffered and delivered by the next
//! `tick` or `drain_events`.

use rand::Rng;

use crate::{
    construction, engine, missions, state, BodyId, BuildingId, Category, CelestialBody,
    ColonyError, Command, CommandEnvelope, CommandId, EventEnvelope, EventLevel, GameContent,
    GameState, SlotIndex, SlotKey,
};

pub struct World<R: Rng> {
    content: GameContent,
    state: GameState,
    rng: R,
    event_level: EventLevel,
    queued: Vec<CommandEnvelope>,
    pending_events: Vec<EventEnvelope>,
}

impl<R: Rng> World<R> {
    pub fn new(content: GameContent, seed: u64, rng: R) -> Self {
        let state = state::initial_state(&content, seed);
        Self::from_state(content, state, rng)
    }

    /// Resumes from a previously saved state.
    pub fn from_state(content: GameContent, state: GameState, rng: R) -> Self {
        Self {
            content,
            state,
            rng,
            event_level: EventLevel::Normal,
            queued: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_event_level(mut self, event_level: EventLevel) -> Self {
        self.event_level = event_level;
        self
    }

    /// Restores the starting ledger. Queued commands and undelivered events
    /// are dropped.
    pub fn reset(&mut self) {
        tracing::info!(seed = self.state.meta.seed, "world reset");
        self.state = state::initial_state(&self.content, self.state.meta.seed);
        self.queued.clear();
        self.pending_events.clear();
    }

    pub fn construct(
        &mut self,
        body: &BodyId,
        category: Category,
        slot: SlotIndex,
        building: &BuildingId,
    ) -> Result<(), ColonyError> {
        let key = slot_key(body, category, slot);
        construction::construct(
            &mut self.state,
            &self.content,
            &key,
            building,
            &mut self.pending_events,
        )
    }

    /// Returns the refund.
    pub fn salvage(
        &mut self,
        body: &BodyId,
        category: Category,
        slot: SlotIndex,
    ) -> Result<u64, ColonyError> {
        let key = slot_key(body, category, slot);
        construction::salvage(&mut self.state, &self.content, &key, &mut self.pending_events)
    }

    pub fn probe(&mut self, body: &BodyId) -> Result<(), ColonyError> {
        missions::probe(&mut self.state, &self.content, body, &mut self.pending_events)
    }

    pub fn colonise(&mut self, body: &BodyId) -> Result<(), ColonyError> {
        missions::colonise(&mut self.state, &self.content, body, &mut self.pending_events)
    }

    /// Queues a command for the next tick. Rejections surface as
    /// `CommandRejected` events instead of errors.
    pub fn queue(&mut self, command: Command) -> CommandId {
        let id = CommandId(format!("cmd_{:06}", self.state.counters.next_command_id));
        self.state.counters.next_command_id += 1;
        self.queued.push(CommandEnvelope {
            id: id.clone(),
            issued_tick: self.state.meta.tick,
            execute_at_tick: self.state.meta.tick,
            command,
        });
        id
    }

    /// Queues envelopes from an external command source for the next tick.
    /// Envelopes scheduled for any other tick are ignored.
    pub fn submit(&mut self, commands: impl IntoIterator<Item = CommandEnvelope>) {
        self.queued.extend(commands);
    }

    /// Moves the command id counter past ids an external source allocated
    /// from it, so a saved state keeps numbering where the run left off.
    /// The counter never moves backwards.
    pub fn advance_command_counter(&mut self, next_command_id: u64) {
        let counter = &mut self.state.counters.next_command_id;
        *counter = (*counter).max(next_command_id);
    }

    /// Advances `delta` ticks. Returns buffered events followed by the events
    /// of each tick.
    pub fn tick(&mut self, delta: u64) -> Vec<EventEnvelope> {
        let mut events = std::mem::take(&mut self.pending_events);
        let mut commands = std::mem::take(&mut self.queued);
        for _ in 0..delta {
            events.extend(engine::tick(
                &mut self.state,
                &commands,
                &self.content,
                &mut self.rng,
                self.event_level,
            ));
            commands.clear();
        }
        if delta == 0 {
            self.queued = commands;
        }
        events
    }

    pub fn drain_events(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn content(&self) -> &GameContent {
        &self.content
    }

    pub fn body(&self, id: &BodyId) -> Result<&CelestialBody, ColonyError> {
        self.state.bodies.get(id)
    }

    pub fn money(&self) -> u64 {
        self.state.economy.money
    }
}

fn slot_key(body: &BodyId, category: Category, slot: SlotIndex) -> SlotKey {
    SlotKey {
        body: body.clone(),
        category,
        slot,
    }
}
