use duo_shooter::compute::{actions, boss, collision, init_state, movement, prune, tick};
use duo_shooter::config::{Cadence, GameConfig};
use duo_shooter::entities::*;
use duo_shooter::input::{InputState, PlayerInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Classic rules with every random spawn switched off, so a test controls
/// exactly which entities exist.
fn quiet_config() -> GameConfig {
    GameConfig {
        enemy_spawn: Cadence::Never,
        drone_spawn: Cadence::Never,
        drone_fire: Cadence::Never,
        power_up_spawn: Cadence::Never,
        ..GameConfig::classic()
    }
}

fn make_state() -> WorldState {
    init_state(quiet_config())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        x,
        y,
        width: 40.0,
        height: 40.0,
        speed: 0.0,
        fire_timer: 0,
    }
}

fn shot(x: f32, y: f32, ordnance: Ordnance, source: Source) -> Projectile {
    Projectile {
        x,
        y,
        width: 5.0,
        height: 10.0,
        motion: Motion::Straight { dy: -7.0 },
        ordnance,
        source,
    }
}

fn player_bullet(x: f32, y: f32) -> Projectile {
    shot(x, y, Ordnance::Bullet, Source::Player(PlayerId::One))
}

fn hostile_drone_at(x: f32, y: f32) -> Drone {
    Drone {
        x,
        y,
        width: 30.0,
        height: 30.0,
        speed: 0.0,
        health: 3,
        faction: Faction::Hostile,
        anchor: PlayerId::One,
        latched: true,
        fire_timer: 0,
    }
}

fn holding(id: PlayerId, f: impl FnOnce(&mut PlayerInput)) -> InputState {
    let mut held = PlayerInput::default();
    f(&mut held);
    InputState::idle().with_player(id, held)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_places_both_players_on_the_ground_row() {
    let s = make_state();
    let one = s.player(PlayerId::One);
    let two = s.player(PlayerId::Two);

    assert_eq!((one.x, one.y), (300.0, 500.0));
    assert_eq!((two.x, two.y), (500.0, 500.0));
    assert_eq!(one.health, 100);
    assert_eq!(two.health, 100);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemies.is_empty());
    assert!(s.projectiles.is_empty());
    assert!(s.boss.is_none());
}

#[test]
fn init_state_registers_only_interval_timers() {
    assert!(make_state().timers.is_empty());
    // Extended: enemy every 60, power-up every 600, no drone spawns.
    assert_eq!(init_state(GameConfig::extended()).timers.len(), 2);
}

#[test]
fn init_state_arms_the_score_gate() {
    assert_eq!(make_state().next_boss_score, 10);
}

// ── tick ─────────────────────────────────────────────────────────────────────

#[test]
fn tick_does_not_mutate_input_state() {
    let s = make_state();
    let input = holding(PlayerId::One, |p| p.fire = true);
    let next = tick(&s, &input, &mut seeded_rng());

    assert!(s.projectiles.is_empty());
    assert_eq!(s.frame, 0);
    assert_eq!(next.frame, 1);
    assert_eq!(next.projectiles.len(), 1);
}

#[test]
fn tick_is_deterministic_for_a_seed() {
    let s = init_state(GameConfig::classic());
    let (mut a, mut b) = (s.clone(), s);
    let (mut ra, mut rb) = (seeded_rng(), seeded_rng());
    for _ in 0..300 {
        a = tick(&a, &InputState::idle(), &mut ra);
        b = tick(&b, &InputState::idle(), &mut rb);
    }
    assert_eq!(a.enemies.len(), b.enemies.len());
    assert_eq!(a.drones.len(), b.drones.len());
    assert_eq!(a.score, b.score);
    for (x, y) in a.enemies.iter().zip(&b.enemies) {
        assert_eq!((x.x, x.y), (y.x, y.y));
    }
}

#[test]
fn terminal_state_is_frozen() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.enemies.push(Enemy {
        speed: 5.0,
        ..enemy_at(100.0, 100.0)
    });

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    assert_eq!(next.frame, s.frame);
    assert_eq!(next.enemies[0].y, 100.0);
}

#[test]
fn score_change_is_announced() {
    let mut s = make_state();
    s.enemies.push(enemy_at(98.0, 95.0));
    s.projectiles.push(player_bullet(100.0, 110.0));

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    assert_eq!(next.score, 1);
    assert!(next.events.contains(&FrameEvent::ScoreChanged { score: 1 }));

    let quiet = tick(&next, &InputState::idle(), &mut seeded_rng());
    assert!(!quiet
        .events
        .iter()
        .any(|e| matches!(e, FrameEvent::ScoreChanged { .. })));
}

// ── Movement ─────────────────────────────────────────────────────────────────

#[test]
fn enemy_crossing_the_bottom_edge_is_pruned() {
    let mut s = make_state();
    s.enemies.push(Enemy {
        x: 100.0,
        y: 590.0,
        width: 40.0,
        height: 40.0,
        speed: 5.0,
        fire_timer: 0,
    });
    let mut rng = seeded_rng();

    movement::integrate(&mut s, &InputState::idle(), &mut rng);
    assert_eq!(s.enemies[0].y, 595.0);
    prune::prune(&mut s);
    assert_eq!(s.enemies.len(), 1);

    movement::integrate(&mut s, &InputState::idle(), &mut rng);
    assert_eq!(s.enemies[0].y, 600.0);
    prune::prune(&mut s);
    assert!(s.enemies.is_empty());
}

#[test]
fn player_moves_by_speed_and_stays_on_canvas() {
    let mut s = make_state();
    let right = holding(PlayerId::One, |p| p.right = true);
    movement::integrate(&mut s, &right, &mut seeded_rng());
    assert_eq!(s.player(PlayerId::One).x, 305.0);
    assert_eq!(s.player(PlayerId::Two).x, 500.0);

    s.player_mut(PlayerId::One).x = 2.0;
    let left = holding(PlayerId::One, |p| p.left = true);
    movement::integrate(&mut s, &left, &mut seeded_rng());
    assert_eq!(s.player(PlayerId::One).x, 0.0);

    s.player_mut(PlayerId::One).y = 548.0;
    let down = holding(PlayerId::One, |p| p.down = true);
    movement::integrate(&mut s, &down, &mut seeded_rng());
    assert_eq!(s.player(PlayerId::One).y, 550.0);
}

#[test]
fn defeated_player_does_not_move() {
    let mut s = make_state();
    s.player_mut(PlayerId::One).health = 0;
    let right = holding(PlayerId::One, |p| p.right = true);
    movement::integrate(&mut s, &right, &mut seeded_rng());
    assert_eq!(s.player(PlayerId::One).x, 300.0);
}

#[test]
fn grenade_follows_a_ballistic_arc() {
    let mut grenade = Projectile {
        motion: Motion::Arc { dx: 3.0, dy: -10.0 },
        ordnance: Ordnance::Grenade,
        ..player_bullet(100.0, 400.0)
    };
    movement::step_projectile(&mut grenade, 0.5);

    assert_eq!(grenade.x, 103.0);
    assert_eq!(grenade.y, 390.5);
    assert_eq!(grenade.motion, Motion::Arc { dx: 3.0, dy: -9.5 });
}

#[test]
fn hostile_drone_descends_then_latches_above_its_player() {
    let s = make_state();
    let anchor = s.player(PlayerId::One).clone();
    let mut drone = Drone {
        speed: 2.0,
        latched: false,
        ..hostile_drone_at(0.0, 449.0)
    };

    movement::follow(&mut drone, &anchor, 50.0);
    assert!(drone.latched);
    assert_eq!(drone.x, 310.0);
    assert_eq!(drone.y, 450.0);
}

#[test]
fn drone_re_anchors_when_its_player_falls() {
    let mut s = make_state();
    s.player_mut(PlayerId::One).health = 0;
    s.drones.push(hostile_drone_at(300.0, 450.0));

    movement::integrate(&mut s, &InputState::idle(), &mut seeded_rng());
    assert_eq!(s.drones[0].anchor, PlayerId::Two);
}

#[test]
fn orphaned_escort_joins_a_player_without_one() {
    let mut s = make_state();
    collision::apply_power_up(&mut s, PlayerId::One, PowerUpKind::DroneGrant);
    s.player_mut(PlayerId::One).health = 0;

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    assert_eq!(next.drones.len(), 1);
    assert_eq!(next.drones[0].faction, Faction::Allied);
    assert_eq!(next.drones[0].anchor, PlayerId::Two);
}

#[test]
fn orphaned_escort_is_dropped_when_the_survivor_has_one() {
    let mut s = make_state();
    collision::apply_power_up(&mut s, PlayerId::One, PowerUpKind::DroneGrant);
    collision::apply_power_up(&mut s, PlayerId::Two, PowerUpKind::DroneGrant);
    assert_eq!(s.drones.len(), 2);
    s.player_mut(PlayerId::One).health = 0;

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    let escorts: Vec<_> = next
        .drones
        .iter()
        .filter(|d| d.faction == Faction::Allied)
        .collect();
    assert_eq!(escorts.len(), 1);
    assert_eq!(escorts[0].anchor, PlayerId::Two);
}

// ── Actions ──────────────────────────────────────────────────────────────────

#[test]
fn fire_is_gated_by_its_cooldown() {
    let mut s = make_state();
    let fire = holding(PlayerId::One, |p| p.fire = true);
    let mut rng = seeded_rng();

    for _ in 0..10 {
        s = tick(&s, &fire, &mut rng);
    }
    assert_eq!(s.projectiles.len(), 1);

    s = tick(&s, &fire, &mut rng);
    assert_eq!(s.projectiles.len(), 2);
    assert!(s
        .projectiles
        .iter()
        .all(|p| p.source == Source::Player(PlayerId::One)));
}

#[test]
fn rockets_are_limited_by_the_rack() {
    let mut s = make_state();
    let launch = holding(PlayerId::Two, |p| p.rocket = true);

    actions::apply(&mut s, &launch);
    assert!(s.projectiles.is_empty());

    s.player_mut(PlayerId::Two).rockets = 1;
    actions::apply(&mut s, &launch);
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.projectiles[0].ordnance, Ordnance::Rocket);
    assert_eq!(s.player(PlayerId::Two).rockets, 0);
}

#[test]
fn grenade_is_thrown_toward_the_held_direction() {
    let mut s = make_state();
    let throw = holding(PlayerId::One, |p| {
        p.grenade = true;
        p.left = true;
    });
    actions::apply(&mut s, &throw);

    assert_eq!(
        s.projectiles[0].motion,
        Motion::Arc {
            dx: -3.0,
            dy: -10.0
        }
    );
}

#[test]
fn defeated_player_cannot_act() {
    let mut s = make_state();
    s.player_mut(PlayerId::One).health = 0;
    actions::apply(&mut s, &holding(PlayerId::One, |p| p.fire = true));
    assert!(s.projectiles.is_empty());
}

// ── Boss ─────────────────────────────────────────────────────────────────────

#[test]
fn boss_falls_after_ten_bullets_and_pays_once() {
    let mut s = make_state();
    assert!(boss::spawn_boss(&mut s));
    assert_eq!(s.boss.as_ref().map(|b| b.health), Some(10));

    for _ in 0..9 {
        s.projectiles.push(player_bullet(390.0, 100.0));
        collision::resolve(&mut s);
    }
    assert_eq!(s.boss.as_ref().map(|b| b.health), Some(1));
    assert_eq!(s.score, 0);

    s.projectiles.push(player_bullet(390.0, 100.0));
    collision::resolve(&mut s);
    assert!(s.boss.is_none());
    assert_eq!(s.score, 10);
    assert_eq!(s.bosses_defeated, 1);

    // A later shot through the same spot has nothing left to hit.
    s.projectiles.push(player_bullet(390.0, 100.0));
    collision::resolve(&mut s);
    assert_eq!(s.score, 10);
    let defeats = s
        .events
        .iter()
        .filter(|e| matches!(e, FrameEvent::BossDefeated { .. }))
        .count();
    assert_eq!(defeats, 1);
}

#[test]
fn spawn_boss_is_a_no_op_while_one_is_alive() {
    let mut s = make_state();
    assert!(boss::spawn_boss(&mut s));
    if let Some(b) = s.boss.as_mut() {
        b.health = 4;
    }

    assert!(!boss::spawn_boss(&mut s));
    assert_eq!(s.boss.as_ref().map(|b| b.health), Some(4));
}

#[test]
fn boss_reflects_at_the_right_edge() {
    let mut s = make_state();
    boss::spawn_boss(&mut s);
    let mut b = s.boss.clone().unwrap();
    b.x = 599.0;

    boss::patrol(&mut b, 800.0);
    assert_eq!(b.x, 601.0);
    assert_eq!(b.direction, -1.0);

    boss::patrol(&mut b, 800.0);
    assert_eq!(b.x, 599.0);
}

#[test]
fn boss_fires_a_five_shot_fan_on_its_interval() {
    let mut s = make_state();
    boss::spawn_boss(&mut s);
    if let Some(b) = s.boss.as_mut() {
        b.shoot_timer = 59;
    }

    boss::advance(&mut s);
    assert_eq!(s.projectiles.len(), 5);
    assert_eq!(s.boss.as_ref().map(|b| b.shoot_timer), Some(0));

    let spreads: Vec<f32> = s
        .projectiles
        .iter()
        .map(|p| match p.motion {
            Motion::Spread { dx, dy } => {
                assert_eq!(dy, 5.0);
                dx
            }
            other => panic!("unexpected motion {other:?}"),
        })
        .collect();
    assert_eq!(spreads, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    assert!(s.projectiles.iter().all(|p| p.source == Source::Boss));
}

#[test]
fn rocket_deals_heavy_damage_to_the_boss() {
    let mut s = init_state(GameConfig {
        boss_health: 100,
        ..quiet_config()
    });
    boss::spawn_boss(&mut s);
    s.projectiles
        .push(shot(390.0, 100.0, Ordnance::Rocket, Source::Player(PlayerId::Two)));

    collision::resolve(&mut s);
    assert_eq!(s.boss.as_ref().map(|b| b.health), Some(80));
    assert_eq!(s.explosions.len(), 1);
    assert!(s.projectiles.is_empty());
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn long_random_session_keeps_players_in_bounds() {
    let mut s = init_state(GameConfig::classic());
    let mut rng = seeded_rng();
    let mut keys = StdRng::seed_from_u64(7);
    let mut last_score = 0;

    for _ in 0..2000 {
        let mut input = InputState::idle();
        for id in PlayerId::ALL {
            let held = PlayerInput {
                left: keys.gen_bool(0.3),
                right: keys.gen_bool(0.3),
                up: keys.gen_bool(0.3),
                down: keys.gen_bool(0.3),
                fire: keys.gen_bool(0.5),
                grenade: keys.gen_bool(0.05),
                rocket: keys.gen_bool(0.05),
                melee: keys.gen_bool(0.05),
            };
            input = input.with_player(id, held);
        }
        s = tick(&s, &input, &mut rng);

        for p in &s.players {
            assert!(p.health <= 100);
            assert!(p.x >= 0.0 && p.x + p.width <= 800.0);
            assert!(p.y >= 0.0 && p.y + p.height <= 600.0);
        }
        assert!(s.score >= last_score);
        last_score = s.score;
        assert!(s.enemies.iter().all(|e| e.y < 600.0));
        if s.status.is_terminal() {
            break;
        }
    }
}

#[test]
fn pruning_twice_changes_nothing() {
    let mut s = init_state(GameConfig::classic());
    let mut rng = seeded_rng();
    for _ in 0..400 {
        s = tick(&s, &holding(PlayerId::One, |p| p.fire = true), &mut rng);
    }

    let counts = |w: &WorldState| {
        (
            w.enemies.len(),
            w.projectiles.len(),
            w.drones.len(),
            w.explosions.len(),
            w.power_ups.len(),
            w.swings.len(),
            w.boss.is_some(),
        )
    };
    let before = counts(&s);
    prune::prune(&mut s);
    assert_eq!(counts(&s), before);
}

#[test]
fn projectile_touching_the_far_edge_is_pruned() {
    let mut s = make_state();
    s.projectiles.push(player_bullet(100.0, 600.0));
    s.projectiles.push(player_bullet(800.0, 100.0));
    s.projectiles.push(player_bullet(100.0, 589.0));

    prune::prune(&mut s);
    assert_eq!(s.projectiles.len(), 1);
    assert_eq!(s.projectiles[0].y, 589.0);
}

#[test]
fn game_over_when_both_players_are_down() {
    let mut s = make_state();
    s.player_mut(PlayerId::One).health = 0;
    s.player_mut(PlayerId::Two).health = 10;
    s.projectiles
        .push(shot(510.0, 510.0, Ordnance::Bullet, Source::Enemy));

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    assert_eq!(next.player(PlayerId::Two).health, 0);
    assert_eq!(next.status, GameStatus::GameOver);
}

#[test]
fn extended_rules_are_won_by_defeating_the_boss() {
    let mut s = init_state(GameConfig {
        enemy_spawn: Cadence::Never,
        enemy_fire: Cadence::Never,
        power_up_spawn: Cadence::Never,
        drone_fire: Cadence::Never,
        ..GameConfig::extended()
    });
    boss::spawn_boss(&mut s);
    if let Some(b) = s.boss.as_mut() {
        b.health = 1;
    }
    s.projectiles.push(player_bullet(390.0, 120.0));

    let next = tick(&s, &InputState::idle(), &mut seeded_rng());
    assert!(next.boss.is_none());
    assert_eq!(next.score, 100);
    assert_eq!(next.status, GameStatus::Won);
}
