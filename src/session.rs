//! A play session: the world plus everything needed to advance it.
//!
//! The session owns the RNG and the raw key state, so the host only has to
//! forward key events, call `step` once per display refresh and read
//! `snapshot` to draw.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{FrameEvent, WorldState};
use crate::input::{InputState, KeyBindings};
use crate::snapshot::RenderSnapshot;

pub struct Session<R: Rng = StdRng> {
    world: WorldState,
    rng: R,
    bindings: [KeyBindings; 2],
    pressed: HashMap<String, bool>,
    restarts: u32,
}

impl Session<StdRng> {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Session::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Session {
            world: init_state(config),
            rng,
            bindings: KeyBindings::defaults(),
            pressed: HashMap::new(),
            restarts: 0,
        }
    }

    pub fn with_bindings(mut self, bindings: [KeyBindings; 2]) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn key_down(&mut self, key: &str) {
        self.pressed.insert(key.to_string(), true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.insert(key.to_string(), false);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn input(&self) -> InputState {
        InputState::sample(&self.pressed, &self.bindings)
    }

    /// Advance one frame with the keys currently held.
    pub fn step(&mut self) -> &WorldState {
        let input = self.input();
        self.world = tick(&self.world, &input, &mut self.rng);
        &self.world
    }

    /// Reset every piece of mutable game state.  The old world's timers are
    /// torn down before the new world registers its own.
    pub fn restart(&mut self) {
        let cancelled = self.world.timers.teardown();
        debug!("restart cancelled {cancelled} pending timer(s)");
        self.world = init_state(self.world.config.clone());
        self.pressed.clear();
        self.restarts += 1;
        info!("session restarted ({} restart(s) so far)", self.restarts);
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Direct access for hosts that stage a scene (tutorials, tests).
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::of(&self.world)
    }

    /// The new score if it changed during the last frame.
    pub fn score_update(&self) -> Option<u32> {
        self.world.events.iter().find_map(|event| match event {
            FrameEvent::ScoreChanged { score } => Some(*score),
            _ => None,
        })
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }
}
