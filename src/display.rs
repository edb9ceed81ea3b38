//! Rendering layer — all terminal output lives here.
//!
//! Each function receives a mutable writer and a `RenderSnapshot`.  No game
//! logic is performed; this module only maps canvas pixels onto terminal
//! cells and translates the snapshot into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use duo_shooter::entities::{Faction, GameStatus, Ordnance, PlayerId, PowerUpKind, Rect};
use duo_shooter::snapshot::{PlayerView, ProjectileView, RenderSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER_ONE: Color = Color::Blue;
const C_PLAYER_TWO: Color = Color::DarkYellow;
const C_INVINCIBLE: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_DRONE_HOSTILE: Color = Color::Magenta;
const C_DRONE_ALLIED: Color = Color::Green;
const C_BOSS: Color = Color::DarkMagenta;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_HOSTILE: Color = Color::Magenta;
const C_GRENADE: Color = Color::Grey;
const C_ROCKET: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_SWING: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── Canvas → cell mapping ─────────────────────────────────────────────────────

/// The play area inside the border: columns `1..width-1`, rows `2..height-2`.
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(snap: &RenderSnapshot, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(4).max(1);
        Viewport {
            left: 1,
            top: 2,
            cols,
            rows,
            sx: cols as f32 / snap.canvas_width,
            sy: rows as f32 / snap.canvas_height,
        }
    }

    /// Cell span (col, row, cols, rows) covered by a canvas box, at least one
    /// cell, clipped to the play area.  `None` when entirely outside.
    fn span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = (rect.x * self.sx).floor();
        let r0 = (rect.y * self.sy).floor();
        let c1 = ((rect.x + rect.w) * self.sx).ceil().max(c0 + 1.0);
        let r1 = ((rect.y + rect.h) * self.sy).ceil().max(r0 + 1.0);

        let (cols, rows) = (self.cols as f32, self.rows as f32);
        if c1 <= 0.0 || r1 <= 0.0 || c0 >= cols || r0 >= rows {
            return None;
        }
        let (c0, r0) = (c0.max(0.0), r0.max(0.0));
        let (c1, r1) = (c1.min(cols), r1.min(rows));
        Some((
            self.left + c0 as u16,
            self.top + r0 as u16,
            (c1 - c0) as u16,
            (r1 - r0) as u16,
        ))
    }

    fn point(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        self.span(&Rect::new(x, y, 0.0, 0.0)).map(|(c, r, _, _)| (c, r))
    }
}

fn fill<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row, cols, rows)) = view.span(rect) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(color))?;
    let line = glyph.repeat(cols as usize);
    for r in row..row + rows {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(snap, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, snap, width)?;

    for explosion in &snap.explosions {
        let r = explosion.radius;
        let blast = Rect::new(explosion.x - r, explosion.y - r, 2.0 * r, 2.0 * r);
        fill(out, &view, &blast, "░", C_EXPLOSION)?;
    }
    for enemy in &snap.enemies {
        fill(out, &view, enemy, "▓", C_ENEMY)?;
    }
    for drone in &snap.drones {
        let color = match drone.faction {
            Faction::Hostile => C_DRONE_HOSTILE,
            Faction::Allied => C_DRONE_ALLIED,
        };
        fill(out, &view, &drone.rect, "◆", color)?;
    }
    if let Some(boss) = &snap.boss {
        fill(out, &view, &boss.rect, "█", C_BOSS)?;
        draw_bar(out, &view, &boss.rect, boss.health, boss.max_health)?;
    }
    for item in &snap.power_ups {
        let (glyph, color) = match item.kind {
            PowerUpKind::DroneGrant => ("D", Color::Green),
            PowerUpKind::RocketRefill => ("R", Color::Yellow),
            PowerUpKind::Boost => ("+", Color::Cyan),
        };
        fill(out, &view, &item.rect, glyph, color)?;
    }
    for swing in &snap.swings {
        fill(out, &view, swing, "~", C_SWING)?;
    }
    for player in &snap.players {
        draw_player(out, &view, player)?;
    }
    for shot in &snap.projectiles {
        draw_projectile(out, &view, shot)?;
    }

    draw_controls_hint(out, height)?;

    if snap.status.is_terminal() {
        draw_end_overlay(out, snap, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &RenderSnapshot, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", snap.score)))?;

    if let Some(boss) = &snap.boss {
        let tag = format!("[ BOSS {:>3}/{} ]", boss.health, boss.max_health);
        let bx = (width / 2).saturating_sub(tag.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(bx, 0))?;
        out.queue(style::SetForegroundColor(C_BOSS))?;
        out.queue(Print(&tag))?;
    }

    let status: Vec<String> = snap
        .players
        .iter()
        .map(|p| {
            let label = match p.id {
                PlayerId::One => "P1",
                PlayerId::Two => "P2",
            };
            format!("{label} ♥{:>3} ⇑{}", p.health, p.rockets)
        })
        .collect();
    let right = status.join("  ");
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, p: &PlayerView) -> std::io::Result<()> {
    if p.health == 0 {
        return fill(out, view, &p.rect, "x", C_HINT);
    }
    let color = match (p.invincible, p.id) {
        (true, _) => C_INVINCIBLE,
        (false, PlayerId::One) => C_PLAYER_ONE,
        (false, PlayerId::Two) => C_PLAYER_TWO,
    };
    fill(out, view, &p.rect, "█", color)?;
    draw_bar(out, view, &p.rect, p.health, p.max_health)
}

fn draw_projectile<W: Write>(
    out: &mut W,
    view: &Viewport,
    shot: &ProjectileView,
) -> std::io::Result<()> {
    let (cx, cy) = shot.rect.center();
    let Some((col, row)) = view.point(cx, cy) else {
        return Ok(());
    };
    let (glyph, color) = match (shot.ordnance, shot.source.faction()) {
        (Ordnance::Grenade, _) => ("●", C_GRENADE),
        (Ordnance::Rocket, _) => ("⇑", C_ROCKET),
        (Ordnance::Bullet, Faction::Allied) => ("│", C_SHOT_PLAYER),
        (Ordnance::Bullet, Faction::Hostile) => ("↓", C_SHOT_HOSTILE),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// A one-row health bar directly above `rect`, coloured by remaining share.
fn draw_bar<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    health: u32,
    max: u32,
) -> std::io::Result<()> {
    let Some((col, row, cols, _)) = view.span(rect) else {
        return Ok(());
    };
    if row <= view.top {
        return Ok(());
    }
    let share = health as f32 / max.max(1) as f32;
    let filled = ((cols as f32) * share).round() as usize;
    let color = if share > 0.5 {
        Color::Green
    } else if share > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    };
    out.queue(cursor::MoveTo(col, row - 1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print("▀".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("▀".repeat(cols as usize - filled.min(cols as usize))))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "P1 WASD F:fire SPC:grenade E:rocket Q:blade │ P2 ←↑↓→ ⏎:fire /:grenade .:rocket ,:blade │ ESC quit",
    ))?;
    Ok(())
}

// ── Game-over / victory overlay ───────────────────────────────────────────────

fn draw_end_overlay<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (banner, color) = match snap.status {
        GameStatus::Won => ("║     VICTORY!       ║", Color::Green),
        _ => ("║    GAME  OVER      ║", Color::Red),
    };
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", color),
        (banner, color),
        ("╚════════════════════╝", color),
    ];
    let score_line = format!("Final Score: {:>6}", snap.score);
    let hint = "R - Play Again  M - Menu  ESC - Quit";

    let cx = width / 2;
    let total_rows = lines.len() + 2;
    let start_row = (height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
