//! Tunable game parameters.
//!
//! Two presets reproduce the two rule sets the game ships with; a JSON file
//! can override any subset of fields on top of the classic preset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Chance-per-frame spawns, a 10-hit boss after 10 points.
    Classic,
    /// Interval spawns, power-ups, a 100-hit boss after 20 kills, one-hit deaths.
    Extended,
}

/// How often something happens, measured on the frame clock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Never,
    /// Independent Bernoulli draw every frame.
    Chance(f64),
    /// Exactly once every N frames.
    Every(u32),
}

/// What brings the boss in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossTrigger {
    /// Score gained since the previous boss fell (or since the start).
    Score(u32),
    /// Enemies killed since the previous boss fell (or since the start).
    Kills(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Canvas ──
    pub canvas_width: f32,
    pub canvas_height: f32,

    // ── Players ──
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_max_health: u32,
    pub start_rockets: u32,
    pub max_rockets: u32,
    /// Health lost per hostile hit (ignored when `instant_death` is set).
    pub hit_damage: u32,
    pub instant_death: bool,
    pub fire_cooldown: u32,
    pub grenade_cooldown: u32,
    pub rocket_cooldown: u32,
    pub melee_cooldown: u32,

    // ── Player ordnance ──
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    pub grenade_size: f32,
    /// Horizontal throw speed, signed by the held direction key.
    pub grenade_throw_dx: f32,
    pub grenade_throw_dy: f32,
    pub gravity: f32,
    pub rocket_width: f32,
    pub rocket_height: f32,
    pub rocket_speed: f32,
    /// Depth of the melee sweep above the player, and its overhang on each side.
    pub melee_reach: f32,
    pub melee_frames: u32,
    pub explosion_radius: f32,
    pub explosion_frames: u32,

    // ── Enemies ──
    pub enemy_size: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub enemy_spawn: Cadence,
    pub enemy_fire: Cadence,
    pub enemy_shot_speed: f32,

    // ── Drones ──
    pub drone_size: f32,
    pub drone_speed: f32,
    pub drone_health: u32,
    /// Vertical gap between a latched drone and its anchor's top edge.
    pub drone_offset: f32,
    pub drone_spawn: Cadence,
    pub drone_fire: Cadence,
    pub drone_shot_speed: f32,

    // ── Power-ups ──
    pub power_up_size: f32,
    pub power_up_speed: f32,
    pub power_up_lifetime: u32,
    pub power_up_spawn: Cadence,
    pub boost_health: u32,
    pub boost_invincibility: u32,

    // ── Boss ──
    pub boss_width: f32,
    pub boss_height: f32,
    pub boss_y: f32,
    pub boss_speed: f32,
    pub boss_health: u32,
    pub boss_shoot_interval: u32,
    pub boss_shot_speed: f32,
    pub boss_trigger: BossTrigger,
    pub boss_bonus: u32,
    /// Boss damage from rockets, grenades and melee; bullets always deal 1.
    pub heavy_damage: u32,

    // ── Scoring & outcome ──
    pub score_direct: u32,
    pub score_melee: u32,
    pub score_splash: u32,
    /// `None` plays on until every player is down.
    pub bosses_to_win: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::classic()
    }
}

impl GameConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => GameConfig::classic(),
            Variant::Extended => GameConfig::extended(),
        }
    }

    pub fn classic() -> Self {
        GameConfig {
            canvas_width: 800.0,
            canvas_height: 600.0,

            player_width: 50.0,
            player_height: 50.0,
            player_speed: 5.0,
            player_max_health: 100,
            start_rockets: 0,
            max_rockets: 5,
            hit_damage: 10,
            instant_death: false,
            fire_cooldown: 10,
            grenade_cooldown: 60,
            rocket_cooldown: 30,
            melee_cooldown: 30,

            bullet_width: 5.0,
            bullet_height: 10.0,
            bullet_speed: 7.0,
            grenade_size: 10.0,
            grenade_throw_dx: 3.0,
            grenade_throw_dy: -10.0,
            gravity: 0.5,
            rocket_width: 6.0,
            rocket_height: 16.0,
            rocket_speed: 8.0,
            melee_reach: 40.0,
            melee_frames: 8,
            explosion_radius: 50.0,
            explosion_frames: 20,

            enemy_size: 50.0,
            enemy_min_speed: 2.0,
            enemy_max_speed: 5.0,
            enemy_spawn: Cadence::Chance(0.02),
            enemy_fire: Cadence::Never,
            enemy_shot_speed: 4.0,

            drone_size: 30.0,
            drone_speed: 2.0,
            drone_health: 3,
            drone_offset: 50.0,
            drone_spawn: Cadence::Chance(0.01),
            drone_fire: Cadence::Chance(0.02),
            drone_shot_speed: 7.0,

            power_up_size: 20.0,
            power_up_speed: 1.0,
            power_up_lifetime: 300,
            power_up_spawn: Cadence::Chance(0.002),
            boost_health: 30,
            boost_invincibility: 180,

            boss_width: 200.0,
            boss_height: 100.0,
            boss_y: 50.0,
            boss_speed: 2.0,
            boss_health: 10,
            boss_shoot_interval: 60,
            boss_shot_speed: 5.0,
            boss_trigger: BossTrigger::Score(10),
            boss_bonus: 10,
            heavy_damage: 20,

            score_direct: 1,
            score_melee: 10,
            score_splash: 50,
            bosses_to_win: None,
        }
    }

    pub fn extended() -> Self {
        GameConfig {
            start_rockets: 3,
            instant_death: true,
            enemy_spawn: Cadence::Every(60),
            enemy_fire: Cadence::Chance(0.003),
            drone_spawn: Cadence::Never,
            drone_fire: Cadence::Every(45),
            power_up_spawn: Cadence::Every(600),
            boss_health: 100,
            boss_trigger: BossTrigger::Kills(20),
            boss_bonus: 100,
            bosses_to_win: Some(1),
            ..GameConfig::classic()
        }
    }

    /// Read a JSON config; missing fields fall back to the classic preset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make spawning or movement ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let widest = self
            .player_width
            .max(self.enemy_size)
            .max(self.drone_size)
            .max(self.power_up_size)
            .max(self.boss_width);
        if !(self.canvas_width > widest) {
            return Err(invalid(
                "canvas_width",
                format!("{} must exceed the widest entity ({widest})", self.canvas_width),
            ));
        }
        let tallest = self
            .player_height
            .max(self.enemy_size)
            .max(self.boss_y + self.boss_height);
        if !(self.canvas_height > tallest) {
            return Err(invalid(
                "canvas_height",
                format!("{} must exceed the tallest entity ({tallest})", self.canvas_height),
            ));
        }
        if self.enemy_min_speed > self.enemy_max_speed {
            return Err(invalid(
                "enemy_min_speed",
                format!(
                    "{} is greater than enemy_max_speed {}",
                    self.enemy_min_speed, self.enemy_max_speed
                ),
            ));
        }
        for (field, cadence) in [
            ("enemy_spawn", self.enemy_spawn),
            ("enemy_fire", self.enemy_fire),
            ("drone_spawn", self.drone_spawn),
            ("drone_fire", self.drone_fire),
            ("power_up_spawn", self.power_up_spawn),
        ] {
            check_cadence(field, cadence)?;
        }
        if self.player_max_health == 0 {
            return Err(invalid("player_max_health", "must be at least 1".to_string()));
        }
        if self.boss_health == 0 {
            return Err(invalid("boss_health", "must be at least 1".to_string()));
        }
        if self.boss_shoot_interval == 0 {
            return Err(invalid("boss_shoot_interval", "must be at least 1".to_string()));
        }
        if self.drone_health == 0 {
            return Err(invalid("drone_health", "must be at least 1".to_string()));
        }
        if self.explosion_radius < 0.0 {
            return Err(invalid(
                "explosion_radius",
                format!("{} is negative", self.explosion_radius),
            ));
        }
        Ok(())
    }
}

fn check_cadence(field: &'static str, cadence: Cadence) -> Result<(), ConfigError> {
    match cadence {
        Cadence::Chance(p) if !(0.0..=1.0).contains(&p) => Err(invalid(
            field,
            format!("probability {p} is outside [0, 1]"),
        )),
        Cadence::Every(0) => Err(invalid(field, "interval must be at least 1 frame".to_string())),
        _ => Ok(()),
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
