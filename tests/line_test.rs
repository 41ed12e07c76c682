use rand::rngs::StdRng;
use rand::SeedableRng;
use speedlines_sim::physic_engine::config::EmitterSettingsBuilder;
use speedlines_sim::physic_engine::{
    EmitterContext, EmitterSettings, EmitterType, Line, SpawnMode, Vector2,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn radial(speed: f32) -> EmitterSettings {
    EmitterSettingsBuilder::default()
        .emitter_type(EmitterType::Radial)
        .speed(speed)
        .emitter_radius(200.0)
        .build()
        .unwrap()
}

// ==================================
// 1. Flux linéaire
// ==================================

#[test]
fn test_linear_step_follows_angle_and_jittered_speed() {
    let settings = EmitterSettingsBuilder::default()
        .count(1)
        .speed(-20.0)
        .length(1000.0)
        .angle(45.0)
        .build()
        .unwrap();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut rng = rng();

    let line = Line::spawn(&ctx, SpawnMode::Initial, &mut rng);
    let step = line.vel.length();
    assert!((10.0..=20.0).contains(&step), "step {}", step);
    // 45° avec une vitesse négative : les deux composantes sont égales et négatives
    assert!((line.vel.x - line.vel.y).abs() < 1e-4);
    assert!(line.vel.x < 0.0);
}

#[test]
fn test_linear_wrap_keeps_line_on_canvas() {
    let settings = EmitterSettingsBuilder::default()
        .speed(-20.0)
        .angle(45.0)
        .build()
        .unwrap();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut rng = rng();
    let mut line = Line::spawn(&ctx, SpawnMode::Initial, &mut rng);

    let mut wrapped = false;
    for _ in 0..200 {
        let before = line.pos;
        let recycled = line.update(&ctx, &mut rng);
        assert!(!recycled, "linear lines are never recycled");

        assert!((0.0..=800.0).contains(&line.pos.x), "x = {}", line.pos.x);
        assert!((0.0..=600.0).contains(&line.pos.y), "y = {}", line.pos.y);

        // un bouclage fait sauter la coordonnée au bord opposé
        if (line.pos.x - before.x).abs() > 20.0 || (line.pos.y - before.y).abs() > 20.0 {
            wrapped = true;
            assert!(line.pos.x == 800.0 || line.pos.y == 600.0);
        }
    }
    assert!(wrapped, "200 steps of at least 7px must cross an edge");
}

#[test]
fn test_linear_overshoot_wraps_to_zero_not_clamped() {
    let settings = EmitterSettingsBuilder::default()
        .speed(20.0)
        .angle(0.0)
        .build()
        .unwrap();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut line = Line {
        pos: Vector2::new(790.0, 100.0),
        vel: Vector2::new(15.0, 0.0),
        ..Default::default()
    };
    line.update(&ctx, &mut rng());
    assert_eq!(line.pos, Vector2::new(0.0, 100.0));
}

#[test]
fn test_linear_end_pos_trails_behind() {
    let settings = EmitterSettings::default();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let line = Line {
        pos: Vector2::new(100.0, 100.0),
        vel: Vector2::new(3.0, 4.0),
        length: 50.0,
        ..Default::default()
    };
    let end = line.end_pos(&ctx);
    assert!((end.x - 70.0).abs() < 1e-4);
    assert!((end.y - 60.0).abs() < 1e-4);
}

// ==================================
// 2. Flux radial
// ==================================

#[test]
fn test_radial_initial_spawn_distance_range() {
    let settings = radial(10.0);
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut rng = rng();

    for _ in 0..500 {
        let line = Line::spawn(&ctx, SpawnMode::Initial, &mut rng);
        let d = line.pos.distance(ctx.emitter_pos());
        let r = line.randomized_emitter_radius;
        assert!((100.0..=200.0).contains(&r));
        assert!(d >= r - 1e-2 && d < r + 800.0 + 1e-2, "d = {}, r = {}", d, r);
    }
}

#[test]
fn test_radial_outward_recycles_past_half_extent() {
    let settings = radial(10.0);
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let emitter = ctx.emitter_pos();
    let mut line = Line {
        pos: emitter + Vector2::new(500.0, 0.0),
        vel: Vector2::new(5.0, 0.0),
        speed: 5.0,
        length: 100.0,
        randomized_emitter_radius: 150.0,
        sizes: [1.0, 10.0, 1.0],
    };

    let mut rng = rng();
    assert!(line.update(&ctx, &mut rng));
    let d = line.pos.distance(emitter);
    assert!((d - line.randomized_emitter_radius).abs() < 1e-2);
    assert!(line.speed > 0.0);
}

#[test]
fn test_radial_outward_inside_field_keeps_moving() {
    let settings = radial(10.0);
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let emitter = ctx.emitter_pos();
    let mut line = Line {
        pos: emitter + Vector2::new(300.0, 0.0),
        vel: Vector2::new(5.0, 0.0),
        speed: 5.0,
        randomized_emitter_radius: 150.0,
        ..Default::default()
    };
    assert!(!line.update(&ctx, &mut rng()));
    assert_eq!(line.pos, emitter + Vector2::new(305.0, 0.0));
}

#[test]
fn test_radial_inward_converges_then_respawns_far() {
    let settings = radial(-20.0);
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let emitter = ctx.emitter_pos();
    let mut rng = rng();

    let mut line = Line {
        pos: emitter + Vector2::new(300.0, 0.0),
        vel: Vector2::new(10.0, 0.0),
        speed: -10.0,
        randomized_emitter_radius: 200.0,
        ..Default::default()
    };
    assert!(!line.update(&ctx, &mut rng));
    assert_eq!(line.pos, emitter + Vector2::new(290.0, 0.0));

    line.pos = emitter + Vector2::new(150.0, 0.0);
    assert!(line.update(&ctx, &mut rng));
    let d = line.pos.distance(emitter);
    let expected = line.randomized_emitter_radius + 800.0;
    assert!((d - expected).abs() < 1e-1, "d = {}, expected {}", d, expected);
    assert!(line.speed < 0.0);
}

#[test]
fn test_radial_end_pos_points_away_from_emitter() {
    let settings = radial(10.0);
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let emitter = ctx.emitter_pos();
    let line = Line {
        pos: emitter + Vector2::new(0.0, 100.0),
        length: 40.0,
        ..Default::default()
    };
    let end = line.end_pos(&ctx);
    assert!((end.distance(emitter) - 140.0).abs() < 1e-3);
}

// ==================================
// 3. Bruit des paramètres
// ==================================

#[test]
fn test_jittered_copies_stay_in_half_to_full_range() {
    let settings = EmitterSettings::default();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut rng = rng();

    for _ in 0..500 {
        let line = Line::spawn(&ctx, SpawnMode::Recycled, &mut rng);
        assert!((-20.0..=-10.0).contains(&line.speed), "speed {}", line.speed);
        assert!((500.0..=1000.0).contains(&line.length));
        assert!((125.0..=250.0).contains(&line.randomized_emitter_radius));
        for (size, base) in line.sizes.iter().zip(settings.sizes()) {
            assert!(*size >= base * 0.5 && *size <= base);
        }
    }
}

#[test]
fn test_initialize_keeps_identity_but_redraws() {
    let settings = EmitterSettings::default();
    let ctx = EmitterContext::new(&settings, 800.0, 600.0);
    let mut rng = rng();
    let mut line = Line::spawn(&ctx, SpawnMode::Initial, &mut rng);
    let before = line.clone();
    line.initialize(&ctx, SpawnMode::Recycled, &mut rng);
    assert_ne!(line, before);
}
