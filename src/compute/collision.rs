//! Collision resolver stage.
//!
//! Every live projectile is tested against target classes in a fixed order
//! (enemies, drones, boss, players).  The first overlap wins and consumes the
//! projectile, so one projectile causes at most one direct effect.  Targets
//! on the shooter's own side are skipped, never hit, and hostile fire passes
//! through drones of either side.
//!
//! Explosive ordnance detonates on its first hit, and grenades also on
//! reaching the ground.  A detonation removes every enemy whose box the blast
//! circle reaches, in the same pass.  Melee swings and power-up pickups are
//! resolved here as well.

use log::{debug, info};

use crate::config::GameConfig;
use crate::entities::{
    Bounds, Explosion, Faction, FrameEvent, KillMethod, Motion, Ordnance, PlayerId, PowerUpKind,
    Projectile, Rect, WorldState,
};

use super::{boss, spawn};

/// What a projectile struck first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Enemy(usize),
    Drone(usize),
    Boss,
    Player(PlayerId),
}

pub fn resolve(state: &mut WorldState) {
    let mut enemy_alive = vec![true; state.enemies.len()];

    resolve_swings(state, &mut enemy_alive);
    resolve_projectiles(state, &mut enemy_alive);
    resolve_pickups(state);

    // Consumed and killed entities leave in one retain pass each, so an
    // entity removed twice in a frame is simply removed once.
    let mut alive = enemy_alive.into_iter();
    state.enemies.retain(|_| alive.next().unwrap_or(true));
}

// ── Projectiles ──────────────────────────────────────────────────────────────

fn resolve_projectiles(state: &mut WorldState, enemy_alive: &mut [bool]) {
    let mut spent = vec![false; state.projectiles.len()];

    for index in 0..state.projectiles.len() {
        let shot = state.projectiles[index];
        match first_hit(state, &shot, enemy_alive) {
            Some(hit) => {
                spent[index] = true;
                apply_hit(state, &shot, hit, enemy_alive);
                if shot.ordnance.is_explosive() {
                    let (cx, cy) = shot.rect().center();
                    detonate(state, cx, cy, enemy_alive);
                }
            }
            None if grounded(&state.config, &shot) => {
                spent[index] = true;
                let (cx, cy) = shot.rect().center();
                detonate(state, cx, cy, enemy_alive);
            }
            None => {}
        }
    }

    let mut spent = spent.into_iter();
    state.projectiles.retain(|_| !spent.next().unwrap_or(false));
}

/// A grenade that has reached the ground.
fn grounded(config: &GameConfig, shot: &Projectile) -> bool {
    matches!(shot.motion, Motion::Arc { .. }) && shot.y + shot.height >= config.canvas_height
}

/// The first live target the projectile overlaps, in priority order.
pub fn first_hit(state: &WorldState, shot: &Projectile, enemy_alive: &[bool]) -> Option<Hit> {
    let faction = shot.source.faction();
    let area = shot.rect();

    if faction == Faction::Allied {
        let enemy = state
            .enemies
            .iter()
            .enumerate()
            .position(|(i, e)| enemy_alive[i] && area.overlaps(&e.rect()));
        if let Some(i) = enemy {
            return Some(Hit::Enemy(i));
        }
    }

    // Only allied fire damages drones, and only hostile ones.
    if faction == Faction::Allied {
        let drone = state.drones.iter().position(|d| {
            d.faction == Faction::Hostile && d.health > 0 && area.overlaps(&d.rect())
        });
        if let Some(i) = drone {
            return Some(Hit::Drone(i));
        }
    }

    if faction == Faction::Allied {
        if let Some(b) = &state.boss {
            if b.health > 0 && area.overlaps(&b.rect()) {
                return Some(Hit::Boss);
            }
        }
    }

    if faction == Faction::Hostile {
        let player = state
            .players
            .iter()
            .find(|p| p.is_alive() && area.overlaps(&p.rect()));
        if let Some(p) = player {
            return Some(Hit::Player(p.id));
        }
    }

    None
}

fn apply_hit(state: &mut WorldState, shot: &Projectile, hit: Hit, enemy_alive: &mut [bool]) {
    match hit {
        Hit::Enemy(i) => kill_enemy(state, i, KillMethod::Direct, enemy_alive),
        Hit::Drone(i) => damage_drone(state, i),
        Hit::Boss => {
            let amount = match shot.ordnance {
                Ordnance::Bullet => 1,
                Ordnance::Rocket | Ordnance::Grenade => state.config.heavy_damage,
            };
            boss::damage(state, amount);
        }
        Hit::Player(id) => damage_player(state, id),
    }
}

// ── Effects ──────────────────────────────────────────────────────────────────

fn kill_enemy(state: &mut WorldState, index: usize, method: KillMethod, enemy_alive: &mut [bool]) {
    if !enemy_alive[index] {
        return;
    }
    enemy_alive[index] = false;
    state.score += match method {
        KillMethod::Direct => state.config.score_direct,
        KillMethod::Melee => state.config.score_melee,
        KillMethod::Splash => state.config.score_splash,
    };
    state.kills_since_boss += 1;
    state.events.push(FrameEvent::EnemyKilled { method });
}

fn damage_drone(state: &mut WorldState, index: usize) {
    let drone = &mut state.drones[index];
    if drone.health == 0 {
        return;
    }
    drone.health -= 1;
    if drone.health == 0 {
        let faction = drone.faction;
        state.events.push(FrameEvent::DroneDestroyed { faction });
    }
}

/// Hostile hit on a player.  Absorbed while invincible; health floors at 0.
pub fn damage_player(state: &mut WorldState, id: PlayerId) {
    let (instant_death, hit_damage) = (state.config.instant_death, state.config.hit_damage);
    let player = state.player_mut(id);
    if !player.is_alive() || player.invincible > 0 {
        return;
    }
    let damage = if instant_death {
        player.health
    } else {
        hit_damage.min(player.health)
    };
    player.health -= damage;
    let defeated = !player.is_alive();

    state.events.push(FrameEvent::PlayerHit { player: id, damage });
    if defeated {
        state.events.push(FrameEvent::PlayerDefeated { player: id });
        info!("player {:?} has been defeated", id);
    }
}

/// Record an explosion and remove every live enemy the blast reaches.
pub fn detonate(state: &mut WorldState, cx: f32, cy: f32, enemy_alive: &mut [bool]) {
    let radius = state.config.explosion_radius;
    let caught: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, e)| enemy_alive[*i] && e.rect().touches_circle(cx, cy, radius))
        .map(|(i, _)| i)
        .collect();
    for i in caught {
        kill_enemy(state, i, KillMethod::Splash, enemy_alive);
    }

    state.explosions.push(Explosion {
        x: cx,
        y: cy,
        radius,
        timer: state.config.explosion_frames,
    });
    state.events.push(FrameEvent::Detonation { x: cx, y: cy });
}

// ── Melee ────────────────────────────────────────────────────────────────────

/// Each swing deals its damage once, on the frame it was made.
fn resolve_swings(state: &mut WorldState, enemy_alive: &mut [bool]) {
    let fresh: Vec<Rect> = state
        .swings
        .iter_mut()
        .filter(|s| !s.resolved)
        .map(|s| {
            s.resolved = true;
            s.rect()
        })
        .collect();

    for blade in fresh {
        let struck: Vec<usize> = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| enemy_alive[*i] && blade.overlaps(&e.rect()))
            .map(|(i, _)| i)
            .collect();
        for i in struck {
            kill_enemy(state, i, KillMethod::Melee, enemy_alive);
        }

        let drones: Vec<usize> = state
            .drones
            .iter()
            .enumerate()
            .filter(|(_, d)| d.faction == Faction::Hostile && blade.overlaps(&d.rect()))
            .map(|(i, _)| i)
            .collect();
        for i in drones {
            damage_drone(state, i);
        }

        let boss_struck = state
            .boss
            .as_ref()
            .is_some_and(|b| blade.overlaps(&b.rect()));
        if boss_struck {
            let amount = state.config.heavy_damage;
            boss::damage(state, amount);
        }
    }
}

// ── Pickups ──────────────────────────────────────────────────────────────────

/// The first living player touching a power-up takes it; its effect applies once.
fn resolve_pickups(state: &mut WorldState) {
    let mut collected: Vec<(usize, PlayerId, PowerUpKind)> = Vec::new();
    for (i, item) in state.power_ups.iter().enumerate() {
        let taker = state
            .players
            .iter()
            .find(|p| p.is_alive() && item.overlaps(*p));
        if let Some(p) = taker {
            collected.push((i, p.id, item.kind));
        }
    }

    for &(_, id, kind) in &collected {
        apply_power_up(state, id, kind);
    }

    let mut index = 0;
    state.power_ups.retain(|_| {
        let keep = !collected.iter().any(|(i, _, _)| *i == index);
        index += 1;
        keep
    });
}

pub fn apply_power_up(state: &mut WorldState, id: PlayerId, kind: PowerUpKind) {
    match kind {
        PowerUpKind::DroneGrant => {
            let repair = state.config.drone_health;
            let escort = state
                .drones
                .iter_mut()
                .find(|d| d.faction == Faction::Allied && d.anchor == id);
            if let Some(drone) = escort {
                drone.health = repair;
            } else {
                let drone = spawn::escort_drone(state, id);
                state.drones.push(drone);
            }
        }
        PowerUpKind::RocketRefill => {
            let max = state.config.max_rockets;
            state.player_mut(id).rockets = max;
        }
        PowerUpKind::Boost => {
            let config = &state.config;
            let (max, boost, shield) = (
                config.player_max_health,
                config.boost_health,
                config.boost_invincibility,
            );
            let player = state.player_mut(id);
            player.health = (player.health + boost).min(max);
            player.invincible = shield;
        }
    }
    state.events.push(FrameEvent::PowerUpCollected { player: id, kind });
    debug!("player {:?} collected {:?}", id, kind);
}
