//! Input sampler stage: turn held action keys into projectiles and swings.
//!
//! Every action is gated by its cooldown; firing re-arms the cooldown.
//! Defeated players do nothing.

use crate::config::GameConfig;
use crate::entities::{MeleeSwing, Motion, Ordnance, Player, Projectile, Source, WorldState};
use crate::input::{InputState, PlayerInput};

pub fn apply(state: &mut WorldState, input: &InputState) {
    let WorldState {
        config,
        players,
        projectiles,
        swings,
        ..
    } = state;

    for player in players.iter_mut().filter(|p| p.is_alive()) {
        let held = input.player(player.id);
        if held.fire && player.cooldowns.fire == 0 {
            projectiles.push(bullet(config, player));
            player.cooldowns.fire = config.fire_cooldown;
        }
        if held.grenade && player.cooldowns.grenade == 0 {
            projectiles.push(grenade(config, player, held));
            player.cooldowns.grenade = config.grenade_cooldown;
        }
        if held.rocket && player.rockets > 0 && player.cooldowns.rocket == 0 {
            projectiles.push(rocket(config, player));
            player.rockets -= 1;
            player.cooldowns.rocket = config.rocket_cooldown;
        }
        if held.melee && player.cooldowns.melee == 0 {
            swings.push(swing(config, player));
            player.cooldowns.melee = config.melee_cooldown;
        }
    }
}

/// A straight shot from the top centre of the player.
pub fn bullet(config: &GameConfig, player: &Player) -> Projectile {
    Projectile {
        x: player.x + player.width / 2.0 - config.bullet_width / 2.0,
        y: player.y - config.bullet_height,
        width: config.bullet_width,
        height: config.bullet_height,
        motion: Motion::Straight {
            dy: -config.bullet_speed,
        },
        ordnance: Ordnance::Bullet,
        source: Source::Player(player.id),
    }
}

/// A lobbed grenade, thrown toward the held horizontal direction.
pub fn grenade(config: &GameConfig, player: &Player, held: &PlayerInput) -> Projectile {
    Projectile {
        x: player.x + player.width / 2.0 - config.grenade_size / 2.0,
        y: player.y - config.grenade_size,
        width: config.grenade_size,
        height: config.grenade_size,
        motion: Motion::Arc {
            dx: config.grenade_throw_dx * held.horizontal(),
            dy: config.grenade_throw_dy,
        },
        ordnance: Ordnance::Grenade,
        source: Source::Player(player.id),
    }
}

pub fn rocket(config: &GameConfig, player: &Player) -> Projectile {
    Projectile {
        x: player.x + player.width / 2.0 - config.rocket_width / 2.0,
        y: player.y - config.rocket_height,
        width: config.rocket_width,
        height: config.rocket_height,
        motion: Motion::Straight {
            dy: -config.rocket_speed,
        },
        ordnance: Ordnance::Rocket,
        source: Source::Player(player.id),
    }
}

/// The blade sweeps a band `melee_reach` deep directly above the player,
/// overhanging each side by half the reach.
pub fn swing(config: &GameConfig, player: &Player) -> MeleeSwing {
    let reach = config.melee_reach;
    MeleeSwing {
        owner: player.id,
        x: player.x - reach / 2.0,
        y: player.y - reach,
        width: player.width + reach,
        height: reach,
        timer: config.melee_frames,
        resolved: false,
    }
}
