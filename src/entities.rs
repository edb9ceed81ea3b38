//! All game entity types — pure data, no game rules.
//!
//! Positions are canvas pixels with the origin at the top-left corner and y
//! growing downward.  Every entity stores its top-left corner plus a size,
//! except `Explosion`, which is a circle stored by its centre.

use serde::Serialize;

use crate::config::GameConfig;
use crate::timers::TimerRegistry;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict AABB overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True when a circle at (`cx`, `cy`) with radius `r` reaches into the box.
    pub fn touches_circle(&self, cx: f32, cy: f32, r: f32) -> bool {
        let nx = cx.clamp(self.x, self.x + self.w);
        let ny = cy.clamp(self.y, self.y + self.h);
        let (dx, dy) = (cx - nx, cy - ny);
        dx * dx + dy * dy <= r * r
    }
}

/// Anything that occupies a bounding box on the canvas.
pub trait Bounds {
    fn rect(&self) -> Rect;

    fn overlaps<B: Bounds + ?Sized>(&self, other: &B) -> bool {
        self.rect().overlaps(&other.rect())
    }
}

macro_rules! impl_bounds {
    ($($ty:ty),* $(,)?) => {
        $(impl Bounds for $ty {
            fn rect(&self) -> Rect {
                Rect::new(self.x, self.y, self.width, self.height)
            }
        })*
    };
}

impl Bounds for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

impl_bounds!(Player, Enemy, Projectile, Drone, Boss, PowerUp, MeleeSwing);

// ── Players ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

/// Per-action countdowns.  An action is gated while its counter is non-zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldowns {
    pub fire: u32,
    pub grenade: u32,
    pub rocket: u32,
    pub melee: u32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Always within `0..=GameConfig::player_max_health`.
    pub health: u32,
    pub rockets: u32,
    /// Frames of remaining invincibility; hits are absorbed while non-zero.
    pub invincible: u32,
    pub cooldowns: Cooldowns,
}

impl Player {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Downward speed, sampled once at spawn.
    pub speed: f32,
    pub fire_timer: u32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Faction {
    /// Players and the drones they were granted.
    Allied,
    /// Enemies, wild drones and the boss.
    Hostile,
}

/// Who fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Source {
    Player(PlayerId),
    Drone(Faction),
    Enemy,
    Boss,
}

impl Source {
    pub fn faction(self) -> Faction {
        match self {
            Source::Player(_) => Faction::Allied,
            Source::Drone(faction) => faction,
            Source::Enemy | Source::Boss => Faction::Hostile,
        }
    }
}

/// Motion rule, each variant carrying exactly the velocity it needs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Motion {
    /// Vertical travel only.
    Straight { dy: f32 },
    /// Constant diagonal travel (boss fan shots).
    Spread { dx: f32, dy: f32 },
    /// Ballistic travel; `dy` grows by the configured gravity every frame.
    Arc { dx: f32, dy: f32 },
}

/// What happens on impact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Ordnance {
    Bullet,
    /// Explodes on its first hit; heavy damage against the boss.
    Rocket,
    /// Explodes on its first hit or when it reaches the ground.
    Grenade,
}

impl Ordnance {
    pub fn is_explosive(self) -> bool {
        matches!(self, Ordnance::Rocket | Ordnance::Grenade)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub motion: Motion,
    pub ordnance: Ordnance,
    pub source: Source,
}

// ── Drones ────────────────────────────────────────────────────────────────────

/// A small flying unit pinned above a player once it reaches that player's
/// vertical band.  Hostile drones hunt the player they track; allied drones
/// escort the player that picked up a drone power-up.
#[derive(Clone, Debug)]
pub struct Drone {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: u32,
    pub faction: Faction,
    /// The player this drone follows.
    pub anchor: PlayerId,
    /// Set once the drone has descended to its anchor's band.
    pub latched: bool,
    pub fire_timer: u32,
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// +1.0 moving right, -1.0 moving left.
    pub direction: f32,
    pub health: u32,
    pub max_health: u32,
    /// Counts up each frame; a burst is fired when it reaches `shoot_interval`.
    pub shoot_timer: u32,
    pub shoot_interval: u32,
}

// ── Effects & pickups ─────────────────────────────────────────────────────────

/// Visual marker left by a detonation.  Its area damage is dealt once, when
/// it is created.
#[derive(Clone, Debug)]
pub struct Explosion {
    /// Centre of the blast.
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Remaining frames to display.
    pub timer: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Grants an allied drone (or repairs the one already escorting).
    DroneGrant,
    /// Refills the rocket rack.
    RocketRefill,
    /// Restores health and grants a short invincibility window.
    Boost,
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kind: PowerUpKind,
    /// Frames until the item fades away.
    pub lifetime: u32,
}

/// A melee blade sweep in front of a player.  Damage is resolved on the
/// frame it is swung; it then lingers for display until `timer` runs out.
#[derive(Clone, Debug)]
pub struct MeleeSwing {
    pub owner: PlayerId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub timer: u32,
    pub resolved: bool,
}

// ── Status & events ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Playing,
    Won,
    GameOver,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum KillMethod {
    Direct,
    Melee,
    Splash,
}

/// Something notable that happened during one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    EnemyKilled { method: KillMethod },
    DroneDestroyed { faction: Faction },
    PlayerHit { player: PlayerId, damage: u32 },
    PlayerDefeated { player: PlayerId },
    BossSpawned,
    BossDefeated { bonus: u32 },
    PowerUpCollected { player: PlayerId, kind: PowerUpKind },
    Detonation { x: f32, y: f32 },
    ScoreChanged { score: u32 },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game world.  Cloneable so the per-frame update can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub config: GameConfig,
    /// Indexed by `PlayerId::index`.
    pub players: [Player; 2],
    pub enemies: Vec<Enemy>,
    /// Every live projectile of every faction, boss shots included.
    pub projectiles: Vec<Projectile>,
    pub drones: Vec<Drone>,
    /// At most one boss at a time.
    pub boss: Option<Boss>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    pub swings: Vec<MeleeSwing>,
    /// Frame-clocked spawn timers.
    pub timers: TimerRegistry,
    /// Never decreases.
    pub score: u32,
    /// Kills since the last boss went down (kill-count boss gating).
    pub kills_since_boss: u32,
    /// Score at which the next boss appears (score-threshold boss gating).
    pub next_boss_score: u32,
    pub bosses_defeated: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Events raised during the most recent frame only.
    pub events: Vec<FrameEvent>,
}

impl WorldState {
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }
}
