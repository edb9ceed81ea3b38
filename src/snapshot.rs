//! Read-only view of a world for renderers and UI.

use serde::Serialize;

use crate::entities::{
    Bounds, Faction, GameStatus, Ordnance, PlayerId, PowerUpKind, Rect, Source, WorldState,
};

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub rockets: u32,
    pub invincible: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectileView {
    pub rect: Rect,
    pub ordnance: Ordnance,
    pub source: Source,
}

#[derive(Clone, Debug, Serialize)]
pub struct DroneView {
    pub rect: Rect,
    pub health: u32,
    pub faction: Faction,
}

#[derive(Clone, Debug, Serialize)]
pub struct BossView {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PowerUpView {
    pub rect: Rect,
    pub kind: PowerUpKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExplosionView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub score: u32,
    pub status: GameStatus,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<Rect>,
    pub projectiles: Vec<ProjectileView>,
    pub drones: Vec<DroneView>,
    pub boss: Option<BossView>,
    pub power_ups: Vec<PowerUpView>,
    pub explosions: Vec<ExplosionView>,
    pub swings: Vec<Rect>,
}

impl RenderSnapshot {
    pub fn of(state: &WorldState) -> Self {
        RenderSnapshot {
            frame: state.frame,
            canvas_width: state.config.canvas_width,
            canvas_height: state.config.canvas_height,
            score: state.score,
            status: state.status,
            players: state
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    rect: p.rect(),
                    health: p.health,
                    max_health: state.config.player_max_health,
                    rockets: p.rockets,
                    invincible: p.invincible > 0,
                })
                .collect(),
            enemies: state.enemies.iter().map(Bounds::rect).collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    rect: p.rect(),
                    ordnance: p.ordnance,
                    source: p.source,
                })
                .collect(),
            drones: state
                .drones
                .iter()
                .map(|d| DroneView {
                    rect: d.rect(),
                    health: d.health,
                    faction: d.faction,
                })
                .collect(),
            boss: state.boss.as_ref().map(|b| BossView {
                rect: b.rect(),
                health: b.health,
                max_health: b.max_health,
            }),
            power_ups: state
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    rect: p.rect(),
                    kind: p.kind,
                })
                .collect(),
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    x: e.x,
                    y: e.y,
                    radius: e.radius,
                })
                .collect(),
            swings: state.swings.iter().map(Bounds::rect).collect(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
