//! Pure game-logic functions.
//!
//! `tick` takes an immutable reference to the current `WorldState`, the
//! sampled input and an RNG handle, and returns a brand-new `WorldState`.
//! Side effects are limited to the injected RNG.
//!
//! Inside a frame the stages run strictly in order, each mutating the copy
//! that will become the next state:
//!
//! 1. `actions`    — held keys become shots, throws and swings
//! 2. `spawn`      — enemies, drones, power-ups and the boss appear
//! 3. `movement`   — everything moves, cooldowns and timers count down
//! 4. `collision`  — hits, kills, splash damage, pickups
//! 5. `prune`      — despawn anything off-canvas, expired or destroyed
//! 6. `transition` — game over / win detection

pub mod actions;
pub mod boss;
pub mod collision;
pub mod movement;
pub mod prune;
pub mod spawn;
pub mod transition;

use log::trace;
use rand::Rng;

use crate::config::{Cadence, GameConfig};
use crate::entities::{Cooldowns, FrameEvent, GameStatus, Player, PlayerId, WorldState};
use crate::input::InputState;
use crate::timers::{TimerPurpose, TimerRegistry};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial world for a configuration: both players on the ground
/// row, empty collections and the spawn timers the configuration asks for.
pub fn init_state(config: GameConfig) -> WorldState {
    let players = PlayerId::ALL.map(|id| new_player(&config, id));

    let mut timers = TimerRegistry::new();
    for (purpose, cadence) in [
        (TimerPurpose::EnemySpawn, config.enemy_spawn),
        (TimerPurpose::DroneSpawn, config.drone_spawn),
        (TimerPurpose::PowerUpSpawn, config.power_up_spawn),
    ] {
        if let Cadence::Every(period) = cadence {
            timers.register(purpose, period);
        }
    }

    let next_boss_score = boss::score_threshold(&config).unwrap_or(0);

    WorldState {
        config,
        players,
        enemies: Vec::new(),
        projectiles: Vec::new(),
        drones: Vec::new(),
        boss: None,
        explosions: Vec::new(),
        power_ups: Vec::new(),
        swings: Vec::new(),
        timers,
        score: 0,
        kills_since_boss: 0,
        next_boss_score,
        bosses_defeated: 0,
        status: GameStatus::Playing,
        frame: 0,
        events: Vec::new(),
    }
}

fn new_player(config: &GameConfig, id: PlayerId) -> Player {
    // Player one starts left of centre, player two right of centre.
    let fraction = match id {
        PlayerId::One => 0.375,
        PlayerId::Two => 0.625,
    };
    Player {
        id,
        x: config.canvas_width * fraction,
        y: config.canvas_height - 2.0 * config.player_height,
        width: config.player_width,
        height: config.player_height,
        speed: config.player_speed,
        health: config.player_max_health,
        rockets: config.start_rockets,
        invincible: 0,
        cooldowns: Cooldowns::default(),
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (tests use a seeded RNG).
///
/// A world in a terminal state is returned unchanged apart from its events,
/// which only ever describe the frame just computed.
pub fn tick(state: &WorldState, input: &InputState, rng: &mut impl Rng) -> WorldState {
    if state.status.is_terminal() {
        let mut frozen = state.clone();
        frozen.events.clear();
        return frozen;
    }

    let mut next = state.clone();
    next.frame += 1;
    next.events.clear();

    actions::apply(&mut next, input);
    spawn::run(&mut next, rng);
    movement::integrate(&mut next, input, rng);
    collision::resolve(&mut next);
    prune::prune(&mut next);
    transition::update(&mut next);

    if next.score != state.score {
        next.events.push(FrameEvent::ScoreChanged { score: next.score });
    }

    trace!(
        "frame {}: {} enemies, {} projectiles, {} drones, boss={}",
        next.frame,
        next.enemies.len(),
        next.projectiles.len(),
        next.drones.len(),
        next.boss.is_some()
    );

    next
}
