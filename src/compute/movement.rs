//! Movement integrator stage.
//!
//! Adds every velocity to its position once, runs the drone and boss AI
//! (follow, patrol, periodic fire) and counts down every per-frame timer:
//! player cooldowns, invincibility, explosions, power-up lifetimes and
//! melee swings.

use log::debug;
use rand::Rng;

use crate::entities::{Drone, Faction, Motion, Ordnance, Player, Projectile, Source, WorldState};
use crate::input::InputState;

use super::{boss, spawn};

pub fn integrate(state: &mut WorldState, input: &InputState, rng: &mut impl Rng) {
    move_players(state, input);
    move_enemies(state, rng);
    move_projectiles(state);
    move_drones(state, rng);
    boss::advance(state);
    age_effects(state);
}

// ── Players ──────────────────────────────────────────────────────────────────

fn move_players(state: &mut WorldState, input: &InputState) {
    let (width, height) = (state.config.canvas_width, state.config.canvas_height);
    for player in state.players.iter_mut() {
        tick_timers(player);
        if !player.is_alive() {
            continue;
        }
        let held = input.player(player.id);
        player.x += held.horizontal() * player.speed;
        player.y += held.vertical() * player.speed;
        clamp_to_canvas(player, width, height);
    }
}

fn tick_timers(player: &mut Player) {
    let cd = &mut player.cooldowns;
    cd.fire = cd.fire.saturating_sub(1);
    cd.grenade = cd.grenade.saturating_sub(1);
    cd.rocket = cd.rocket.saturating_sub(1);
    cd.melee = cd.melee.saturating_sub(1);
    player.invincible = player.invincible.saturating_sub(1);
}

/// Keep the whole player box inside the canvas.
pub fn clamp_to_canvas(player: &mut Player, canvas_width: f32, canvas_height: f32) {
    player.x = player.x.clamp(0.0, (canvas_width - player.width).max(0.0));
    player.y = player.y.clamp(0.0, (canvas_height - player.height).max(0.0));
}

// ── Enemies ──────────────────────────────────────────────────────────────────

fn move_enemies(state: &mut WorldState, rng: &mut impl Rng) {
    let config = &state.config;
    for enemy in state.enemies.iter_mut() {
        enemy.y += enemy.speed;
        if spawn::entity_due(config.enemy_fire, &mut enemy.fire_timer, rng) {
            state.projectiles.push(Projectile {
                x: enemy.x + enemy.width / 2.0 - config.bullet_width / 2.0,
                y: enemy.y + enemy.height,
                width: config.bullet_width,
                height: config.bullet_height,
                motion: Motion::Straight {
                    dy: config.enemy_shot_speed,
                },
                ordnance: Ordnance::Bullet,
                source: Source::Enemy,
            });
        }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

fn move_projectiles(state: &mut WorldState) {
    let gravity = state.config.gravity;
    for shot in state.projectiles.iter_mut() {
        step_projectile(shot, gravity);
    }
}

pub fn step_projectile(shot: &mut Projectile, gravity: f32) {
    match &mut shot.motion {
        Motion::Straight { dy } => shot.y += *dy,
        Motion::Spread { dx, dy } => {
            shot.x += *dx;
            shot.y += *dy;
        }
        Motion::Arc { dx, dy } => {
            *dy += gravity;
            shot.x += *dx;
            shot.y += *dy;
        }
    }
}

// ── Drones ───────────────────────────────────────────────────────────────────

fn move_drones(state: &mut WorldState, rng: &mut impl Rng) {
    let WorldState {
        config,
        players,
        drones,
        projectiles,
        ..
    } = state;

    // Living players that already have an escort.  Each player keeps at most one.
    let mut escorted = [false; 2];
    for drone in drones.iter() {
        let owner = drone.anchor.index();
        if drone.faction == Faction::Allied && drone.health > 0 && players[owner].is_alive() {
            escorted[owner] = true;
        }
    }

    for drone in drones.iter_mut() {
        // A drone whose player went down looks for someone else to follow.
        // Escorts only move to a player without one; otherwise they are lost.
        if !players[drone.anchor.index()].is_alive() {
            let allied = drone.faction == Faction::Allied;
            let heir = players
                .iter()
                .find(|p| p.is_alive() && !(allied && escorted[p.id.index()]))
                .map(|p| p.id);
            match heir {
                Some(id) => {
                    drone.anchor = id;
                    drone.latched = false;
                    if allied {
                        escorted[id.index()] = true;
                    }
                }
                None if allied => {
                    debug!("escort of fallen player {:?} disbanded", drone.anchor);
                    drone.health = 0;
                    continue;
                }
                None => {}
            }
        }
        follow(drone, &players[drone.anchor.index()], config.drone_offset);

        if spawn::entity_due(config.drone_fire, &mut drone.fire_timer, rng) {
            // Hostile drones shoot down at their player, escorts shoot up.
            let (y, dy) = match drone.faction {
                Faction::Hostile => (drone.y + drone.height, config.drone_shot_speed),
                Faction::Allied => (drone.y - config.bullet_height, -config.drone_shot_speed),
            };
            projectiles.push(Projectile {
                x: drone.x + drone.width / 2.0 - config.bullet_width / 2.0,
                y,
                width: config.bullet_width,
                height: config.bullet_height,
                motion: Motion::Straight { dy },
                ordnance: Ordnance::Bullet,
                source: Source::Drone(drone.faction),
            });
        }
    }
}

/// Descend until level with the anchor's band, then hold station `offset`
/// above the anchor, centred on it.
pub fn follow(drone: &mut Drone, anchor: &Player, offset: f32) {
    let station_y = anchor.y - offset;
    if !drone.latched {
        drone.y += drone.speed;
        if drone.y >= station_y {
            drone.latched = true;
        }
    }
    if drone.latched {
        drone.x = anchor.x + anchor.width / 2.0 - drone.width / 2.0;
        drone.y = station_y;
    }
}

// ── Timed effects ────────────────────────────────────────────────────────────

fn age_effects(state: &mut WorldState) {
    for explosion in state.explosions.iter_mut() {
        explosion.timer = explosion.timer.saturating_sub(1);
    }
    for power_up in state.power_ups.iter_mut() {
        power_up.y += power_up.speed;
        power_up.lifetime = power_up.lifetime.saturating_sub(1);
    }
    for swing in state.swings.iter_mut() {
        swing.timer = swing.timer.saturating_sub(1);
    }
}
