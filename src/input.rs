//! Keyboard state → per-player intent.
//!
//! The host delivers a map of key identifiers to pressed state (keys never
//! seen are treated as released).  Each player has a binding table mapping
//! identifiers to actions; sampling combines the two into an `InputState`.

use std::collections::HashMap;

use crate::entities::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Grenade,
    Rocket,
    Melee,
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
    keys: HashMap<String, Action>,
}

impl KeyBindings {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, Action)>) -> Self {
        KeyBindings {
            keys: pairs
                .into_iter()
                .map(|(key, action)| (key.to_string(), action))
                .collect(),
        }
    }

    /// W A S D to move, F fire, Space grenade, E rocket, Q melee.
    pub fn player_one() -> Self {
        KeyBindings::new([
            ("a", Action::Left),
            ("d", Action::Right),
            ("w", Action::Up),
            ("s", Action::Down),
            ("f", Action::Fire),
            (" ", Action::Grenade),
            ("e", Action::Rocket),
            ("q", Action::Melee),
        ])
    }

    /// Arrow keys to move, Enter fire, / grenade, . rocket, , melee.
    pub fn player_two() -> Self {
        KeyBindings::new([
            ("ArrowLeft", Action::Left),
            ("ArrowRight", Action::Right),
            ("ArrowUp", Action::Up),
            ("ArrowDown", Action::Down),
            ("Enter", Action::Fire),
            ("/", Action::Grenade),
            (".", Action::Rocket),
            (",", Action::Melee),
        ])
    }

    pub fn defaults() -> [KeyBindings; 2] {
        [KeyBindings::player_one(), KeyBindings::player_two()]
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

/// What one player is holding down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub grenade: bool,
    pub rocket: bool,
    pub melee: bool,
}

impl PlayerInput {
    pub fn press(&mut self, action: Action) {
        match action {
            Action::Left => self.left = true,
            Action::Right => self.right = true,
            Action::Up => self.up = true,
            Action::Down => self.down = true,
            Action::Fire => self.fire = true,
            Action::Grenade => self.grenade = true,
            Action::Rocket => self.rocket = true,
            Action::Melee => self.melee = true,
        }
    }

    /// -1.0, 0.0 or +1.0 from the horizontal keys.
    pub fn horizontal(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    pub fn vertical(&self) -> f32 {
        (self.down as i8 - self.up as i8) as f32
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    players: [PlayerInput; 2],
}

impl InputState {
    /// No keys held.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn sample(pressed: &HashMap<String, bool>, bindings: &[KeyBindings; 2]) -> Self {
        let mut input = InputState::idle();
        for (key, _) in pressed.iter().filter(|(_, down)| **down) {
            for id in PlayerId::ALL {
                if let Some(action) = bindings[id.index()].action_for(key) {
                    input.players[id.index()].press(action);
                }
            }
        }
        input
    }

    /// Build input directly from intents, bypassing key bindings.
    pub fn with_player(mut self, id: PlayerId, input: PlayerInput) -> Self {
        self.players[id.index()] = input;
        self
    }

    pub fn player(&self, id: PlayerId) -> &PlayerInput {
        &self.players[id.index()]
    }
}
