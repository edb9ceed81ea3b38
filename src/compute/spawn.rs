//! Entity spawner stage.
//!
//! Each spawn class decides independently: chance cadences draw once per
//! frame, interval cadences fire off the world's timer registry.  Ordinary
//! enemies stay away while a boss is alive.

use rand::Rng;

use crate::config::{Cadence, GameConfig};
use crate::entities::{Drone, Enemy, Faction, PlayerId, PowerUp, PowerUpKind, WorldState};
use crate::timers::TimerPurpose;

use super::boss;

const POWER_UP_KINDS: [PowerUpKind; 3] = [
    PowerUpKind::DroneGrant,
    PowerUpKind::RocketRefill,
    PowerUpKind::Boost,
];

pub fn run(state: &mut WorldState, rng: &mut impl Rng) {
    let fired = state.timers.advance();
    let fired_for = |purpose: TimerPurpose| fired.contains(&purpose);

    let enemy_due = class_due(state.config.enemy_spawn, fired_for(TimerPurpose::EnemySpawn), rng);
    if enemy_due && state.boss.is_none() {
        let enemy = spawn_enemy(&state.config, rng);
        state.enemies.push(enemy);
    }

    if class_due(state.config.drone_spawn, fired_for(TimerPurpose::DroneSpawn), rng) {
        if let Some(drone) = spawn_drone(state, rng) {
            state.drones.push(drone);
        }
    }

    if class_due(state.config.power_up_spawn, fired_for(TimerPurpose::PowerUpSpawn), rng) {
        let power_up = spawn_power_up(&state.config, rng);
        state.power_ups.push(power_up);
    }

    if boss::is_due(state) {
        boss::spawn_boss(state);
    }
}

fn class_due(cadence: Cadence, timer_fired: bool, rng: &mut impl Rng) -> bool {
    match cadence {
        Cadence::Never => false,
        Cadence::Chance(p) => rng.gen::<f64>() < p,
        Cadence::Every(_) => timer_fired,
    }
}

/// Per-entity cadence check.  `countdown` holds frames until the next
/// interval shot and is re-armed when it fires.
pub fn entity_due(cadence: Cadence, countdown: &mut u32, rng: &mut impl Rng) -> bool {
    match cadence {
        Cadence::Never => false,
        Cadence::Chance(p) => rng.gen::<f64>() < p,
        Cadence::Every(period) => {
            if *countdown == 0 {
                *countdown = period.max(1) - 1;
                true
            } else {
                *countdown -= 1;
                false
            }
        }
    }
}

/// A uniform horizontal position that keeps an entity of `width` on canvas.
fn spawn_x(config: &GameConfig, width: f32, rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>() * (config.canvas_width - width).max(0.0)
}

fn first_interval(cadence: Cadence) -> u32 {
    match cadence {
        Cadence::Every(period) => period.max(1) - 1,
        _ => 0,
    }
}

pub fn spawn_enemy(config: &GameConfig, rng: &mut impl Rng) -> Enemy {
    let span = config.enemy_max_speed - config.enemy_min_speed;
    Enemy {
        x: spawn_x(config, config.enemy_size, rng),
        y: 0.0,
        width: config.enemy_size,
        height: config.enemy_size,
        speed: config.enemy_min_speed + rng.gen::<f32>() * span,
        fire_timer: first_interval(config.enemy_fire),
    }
}

/// A wild drone that hunts the living player closest to its drop column.
/// `None` when nobody is left to hunt.
pub fn spawn_drone(state: &WorldState, rng: &mut impl Rng) -> Option<Drone> {
    let config = &state.config;
    let x = spawn_x(config, config.drone_size, rng);
    let anchor = nearest_player(state, x + config.drone_size / 2.0)?;
    Some(Drone {
        x,
        y: 0.0,
        width: config.drone_size,
        height: config.drone_size,
        speed: config.drone_speed,
        health: config.drone_health,
        faction: Faction::Hostile,
        anchor,
        latched: false,
        fire_timer: first_interval(config.drone_fire),
    })
}

/// An escort drone, already in formation above its owner.
pub fn escort_drone(state: &WorldState, owner: PlayerId) -> Drone {
    let config = &state.config;
    let player = state.player(owner);
    Drone {
        x: player.x + player.width / 2.0 - config.drone_size / 2.0,
        y: player.y - config.drone_offset,
        width: config.drone_size,
        height: config.drone_size,
        speed: config.drone_speed,
        health: config.drone_health,
        faction: Faction::Allied,
        anchor: owner,
        latched: true,
        fire_timer: first_interval(config.drone_fire),
    }
}

pub fn spawn_power_up(config: &GameConfig, rng: &mut impl Rng) -> PowerUp {
    PowerUp {
        x: spawn_x(config, config.power_up_size, rng),
        y: 0.0,
        width: config.power_up_size,
        height: config.power_up_size,
        speed: config.power_up_speed,
        kind: POWER_UP_KINDS[rng.gen_range(0..POWER_UP_KINDS.len())],
        lifetime: config.power_up_lifetime,
    }
}

/// The living player whose centre column is closest to `x`.
pub fn nearest_player(state: &WorldState, x: f32) -> Option<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| p.is_alive())
        .min_by(|a, b| {
            let da = (a.x + a.width / 2.0 - x).abs();
            let db = (b.x + b.width / 2.0 - x).abs();
            da.total_cmp(&db)
        })
        .map(|p| p.id)
}
