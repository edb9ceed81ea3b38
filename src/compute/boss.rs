//! Boss lifecycle: absent → active → defeated → absent.

use log::info;

use crate::config::{BossTrigger, GameConfig};
use crate::entities::{Boss, FrameEvent, Motion, Ordnance, Projectile, Source, WorldState};

/// Horizontal deltas of the five-shot fan.
const BURST_SPREAD: [f32; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

/// The score at which the first boss appears, if bosses are score-gated.
pub fn score_threshold(config: &GameConfig) -> Option<u32> {
    match config.boss_trigger {
        BossTrigger::Score(points) => Some(points),
        BossTrigger::Kills(_) => None,
    }
}

/// True when no boss is alive and the configured threshold has been crossed.
pub fn is_due(state: &WorldState) -> bool {
    if state.boss.is_some() {
        return false;
    }
    match state.config.boss_trigger {
        BossTrigger::Score(_) => state.score >= state.next_boss_score,
        BossTrigger::Kills(kills) => state.kills_since_boss >= kills,
    }
}

/// Bring in a fresh boss at the top centre.  A no-op while one is alive.
pub fn spawn_boss(state: &mut WorldState) -> bool {
    if state.boss.is_some() {
        return false;
    }
    let config = &state.config;
    state.boss = Some(Boss {
        x: config.canvas_width / 2.0 - config.boss_width / 2.0,
        y: config.boss_y,
        width: config.boss_width,
        height: config.boss_height,
        speed: config.boss_speed,
        direction: 1.0,
        health: config.boss_health,
        max_health: config.boss_health,
        shoot_timer: 0,
        shoot_interval: config.boss_shoot_interval,
    });
    state.events.push(FrameEvent::BossSpawned);
    info!("boss spawned at score {} (frame {})", state.score, state.frame);
    true
}

/// Patrol one step and, when the shoot timer elapses, fire the fan.
pub fn advance(state: &mut WorldState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    patrol(boss, state.config.canvas_width);

    boss.shoot_timer += 1;
    if boss.shoot_timer >= boss.shoot_interval {
        boss.shoot_timer = 0;
        let shots = burst(&state.config, boss);
        state.projectiles.extend(shots);
    }
}

/// Move horizontally and reflect at the canvas edges.  The boss may overshoot
/// an edge by up to one step before heading back.
pub fn patrol(boss: &mut Boss, canvas_width: f32) {
    boss.x += boss.speed * boss.direction;
    if boss.x <= 0.0 {
        boss.direction = 1.0;
    } else if boss.x + boss.width >= canvas_width {
        boss.direction = -1.0;
    }
}

pub fn burst(config: &GameConfig, boss: &Boss) -> Vec<Projectile> {
    BURST_SPREAD
        .iter()
        .map(|&dx| Projectile {
            x: boss.x + boss.width / 2.0 - config.bullet_width / 2.0,
            y: boss.y + boss.height,
            width: config.bullet_width,
            height: config.bullet_height,
            motion: Motion::Spread {
                dx,
                dy: config.boss_shot_speed,
            },
            ordnance: Ordnance::Bullet,
            source: Source::Boss,
        })
        .collect()
}

/// Apply damage; on the killing blow remove the boss, pay the bonus once and
/// re-arm the gate so a later boss can appear.
pub fn damage(state: &mut WorldState, amount: u32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.health = boss.health.saturating_sub(amount);
    if boss.health == 0 {
        defeat(state);
    }
}

fn defeat(state: &mut WorldState) {
    if state.boss.take().is_none() {
        return;
    }
    let bonus = state.config.boss_bonus;
    state.score += bonus;
    state.bosses_defeated += 1;
    state.kills_since_boss = 0;
    if let BossTrigger::Score(points) = state.config.boss_trigger {
        state.next_boss_score = state.score + points;
    }
    state.events.push(FrameEvent::BossDefeated { bonus });
    info!(
        "boss defeated (+{bonus}), score {} after {} boss kill(s)",
        state.score, state.bosses_defeated
    );
}
