mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{debug, error, info};

use duo_shooter::config::{GameConfig, Variant};
use duo_shooter::session::Session;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Classic,
    Extended,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Extended => Variant::Extended,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "duo_shooter", about = "Two-player arcade shooter in the terminal")]
struct Opts {
    /// Rule set; when omitted a menu asks for it.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// JSON config file; takes precedence over --variant.
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
    /// Run without a terminal UI and print the final snapshot as JSON.
    #[arg(long)]
    headless: bool,
    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Where logs go while the terminal UI is up.
    #[arg(long, default_value = "duo_shooter.log")]
    log_file: PathBuf,
}

fn init_logging(log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        // The terminal belongs to the game; logs go to a file or nowhere.
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

/// The explicit config file if given, else the chosen preset.
fn resolve_config(opts: &Opts, variant: Option<Variant>) -> Option<GameConfig> {
    if let Some(path) = &opts.config {
        return match GameConfig::load(path) {
            Ok(config) => Some(config),
            Err(err) => {
                error!("{err}");
                eprintln!("duo_shooter: {err}");
                std::process::exit(2);
            }
        };
    }
    variant.map(GameConfig::preset)
}

// ── Key mapping ───────────────────────────────────────────────────────────────

/// Translate a terminal key into the identifier the key bindings use.
fn key_identifier(code: &KeyCode) -> Option<String> {
    let id = match code {
        KeyCode::Char(c) => c.to_ascii_lowercase().to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        _ => return None,
    };
    Some(id)
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(last_seen: u64, frame: u64) -> bool {
    frame.saturating_sub(last_seen) <= HOLD_WINDOW
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Variant),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  DUO  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select rule set:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Classic ", Color::Green, "Random waves, 10-hit boss"),
        ("2", "Extended", Color::Red, "Timed waves, power-ups, one-hit deaths"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<9}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups: D drone escort, R rockets, + health & shield"))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 5))?;
    out.queue(Print("ESC : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => {
                if kind == KeyEventKind::Release {
                    continue;
                }
                match code {
                    KeyCode::Char('1') => return Ok(MenuResult::Start(Variant::Classic)),
                    KeyCode::Char('2') => return Ok(MenuResult::Start(Variant::Extended)),
                    KeyCode::Esc => return Ok(MenuResult::Quit),
                    _ => {}
                }
            }
            Ok(_) => {}
            // Input thread is gone; nothing more can arrive.
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the keys that are still
/// "fresh" (within `HOLD_WINDOW` frames) are handed to the session as held,
/// so both players can hold any combination of keys at once.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            // Resizes, focus and mouse events are skipped, not a stop signal.
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    let ended = session.world().status.is_terminal();
                    match code {
                        KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if ended => {
                            session.restart();
                            key_frame.clear();
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if ended => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Hand the held keys to the session ─────────────────────────────────
        session.release_all();
        for (code, &last_seen) in &key_frame {
            if is_held(last_seen, frame) {
                if let Some(id) = key_identifier(code) {
                    session.key_down(&id);
                }
            }
        }

        session.step();
        if let Some(score) = session.score_update() {
            debug!("score is now {score}");
        }

        display::render(out, &session.snapshot())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Headless run ──────────────────────────────────────────────────────────────

fn run_headless(config: GameConfig, seed: u64, frames: u64) -> std::io::Result<()> {
    let mut session = Session::new(config, seed);
    for _ in 0..frames {
        if session.world().status.is_terminal() {
            break;
        }
        session.step();
    }
    info!(
        "headless run stopped at frame {} with score {}",
        session.world().frame,
        session.world().score
    );
    let json = serde_json::to_string_pretty(&session.snapshot())
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    println!("{json}");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let opts = Opts::parse();
    let seed = opts.seed.unwrap_or_else(rand::random);

    if opts.headless {
        init_logging(None);
        let variant = Variant::from(opts.variant.unwrap_or(VariantArg::Classic));
        let config = resolve_config(&opts, Some(variant)).unwrap_or_default();
        return run_headless(config, seed, opts.frames);
    }

    init_logging(Some(&opts.log_file));
    // Fail on a bad config file before taking over the terminal.
    let preset = resolve_config(&opts, opts.variant.map(Variant::from));
    info!("starting with seed {seed}");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, preset, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    preset: Option<GameConfig>,
    seed: u64,
) -> std::io::Result<()> {
    loop {
        let config = match &preset {
            Some(config) => config.clone(),
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(variant) => GameConfig::preset(variant),
            },
        };

        let mut session = Session::new(config, seed);
        let quit = game_loop(out, &mut session, rx)?;
        info!(
            "session ended at frame {} with score {}",
            session.world().frame,
            session.world().score
        );

        // With a fixed rule set there is no menu to go back to.
        if quit || preset.is_some() {
            break;
        }
    }
    Ok(())
}
