//! Lifecycle pruner stage.
//!
//! Removes everything that meets its despawn predicate.  Running it twice on
//! the same state changes nothing the second time.

use crate::entities::{Bounds, Rect, WorldState};

pub fn prune(state: &mut WorldState) {
    let (width, height) = (state.config.canvas_width, state.config.canvas_height);

    state.enemies.retain(|e| e.y < height);
    state
        .projectiles
        .retain(|p| on_canvas(&p.rect(), width, height));
    state.drones.retain(|d| d.health > 0 && d.y < height);
    if state.boss.as_ref().is_some_and(|b| b.health == 0) {
        state.boss = None;
    }
    state.explosions.retain(|e| e.timer > 0);
    state
        .power_ups
        .retain(|p| p.lifetime > 0 && p.y < height);
    state.swings.retain(|s| s.timer > 0);
}

/// False once a box has left the canvas past any edge.  Like enemies, a box
/// whose edge sits exactly on the far border counts as gone.
pub fn on_canvas(rect: &Rect, width: f32, height: f32) -> bool {
    rect.x + rect.w > 0.0 && rect.x < width && rect.y + rect.h > 0.0 && rect.y < height
}
