use rand::rngs::StdRng;
use rand::SeedableRng;
use speedlines_sim::physic_engine::{EmitterSettings, PhysicEngine, SpeedlinesField};
use speedlines_sim::utils::ConsoleCommand;
use speedlines_sim::window_engine::{WindowEngine, WindowEvent};
use speedlines_sim::Simulator;
mod helpers;
use helpers::{DummyWindow, RecordingRenderer};

type TestSimulator = Simulator<RecordingRenderer, SpeedlinesField<StdRng>, DummyWindow>;

fn simulator(events: Vec<Vec<WindowEvent>>, settings_path: &std::path::Path) -> TestSimulator {
    let window = DummyWindow::init(800, 600, "Test Simulator")
        .unwrap()
        .with_events(events);
    let renderer = RecordingRenderer::new(800.0, 600.0);
    let mut field = SpeedlinesField::with_rng(
        EmitterSettings::default(),
        800.0,
        600.0,
        StdRng::seed_from_u64(11),
    );
    field.start();
    Simulator::new(renderer, field, window, settings_path)
}

fn no_file() -> &'static std::path::Path {
    std::path::Path::new("does/not/exist.toml")
}

#[test]
fn test_step_draws_and_presents() {
    let mut sim = simulator(vec![], no_file());
    assert!(sim.step());
    assert!(sim.step());

    assert_eq!(sim.frames(), 2);
    assert_eq!(sim.renderer_engine().presents, 2);
    assert_eq!(sim.renderer_engine().last_presented, 60);
    assert_eq!(sim.window_engine().swaps, 2);
}

#[test]
fn test_paused_animation_still_presents_last_frame() {
    let mut sim = simulator(vec![vec![], vec![WindowEvent::ToggleAnimation]], no_file());
    sim.step();
    sim.step();

    assert!(!sim.physic_engine().is_running());
    assert_eq!(sim.frames(), 1);
    assert_eq!(sim.renderer_engine().presents, 2);
    assert_eq!(sim.renderer_engine().last_presented, 60);
}

#[test]
fn test_resize_event_reaches_renderer_and_field() {
    let mut sim = simulator(vec![vec![WindowEvent::Resized(320, 240)]], no_file());
    sim.step();

    assert_eq!(sim.renderer_engine().window_sizes, vec![(320, 240)]);
    assert_eq!(sim.physic_engine().size(), (320.0, 240.0));
    assert_eq!(sim.physic_engine().lines().len(), 30);
}

#[test]
fn test_close_request_ends_loop() {
    let mut sim = simulator(vec![vec![WindowEvent::CloseRequested]], no_file());
    assert!(!sim.step());
    assert_eq!(sim.renderer_engine().presents, 0);
    sim.run().unwrap();

    sim.close();
    assert!(sim.renderer_engine().closed);
    assert!(!sim.physic_engine().is_running());
}

#[test]
fn test_fullscreen_toggle() {
    let mut sim = simulator(vec![vec![WindowEvent::ToggleFullscreen]], no_file());
    sim.step();
    assert!(sim.window_engine().is_fullscreen());
}

#[test]
fn test_console_commands_drive_the_field() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sim = simulator(vec![], no_file()).with_console(rx);

    tx.send("set count 5".to_string()).unwrap();
    tx.send("stop".to_string()).unwrap();
    sim.step();

    assert_eq!(sim.physic_engine().lines().len(), 5);
    assert!(!sim.physic_engine().is_running());
    assert_eq!(sim.frames(), 0);

    // un émetteur déconnecté n'empêche pas la boucle de tourner
    drop(tx);
    assert!(sim.step());
}

#[test]
fn test_execute_command_replies() {
    let mut sim = simulator(vec![], no_file());

    assert_eq!(sim.handle_console_line("get count"), "count = 30");
    assert!(sim.handle_console_line("set speed -20").contains("unchanged"));
    let reply = sim.handle_console_line("set speed 4 count 3");
    assert!(reply.contains("speed") && reply.contains("count"), "{}", reply);
    assert!(reply.contains("respawn: true, rebuild: true"), "{}", reply);

    assert_eq!(sim.execute_command(ConsoleCommand::Start), "already running");
    assert!(sim.handle_console_line("show").lines().count() == 12);
    assert!(sim.handle_console_line("bogus").starts_with("❌"));
    assert!(sim.handle_console_line("reload").starts_with("❌ reload failed"));
}

#[test]
fn test_save_and_reload_settings_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("speedlines.toml");
    let mut sim = simulator(vec![], &path);

    sim.handle_console_line("set count 7 color #00ff00");
    let saved = sim.save_config(None)?;
    assert_eq!(saved, path);

    sim.handle_console_line("set count 2");
    assert_eq!(sim.physic_engine().lines().len(), 2);

    let outcome = sim.reload_config()?;
    assert!(outcome.rebuild);
    assert_eq!(sim.physic_engine().lines().len(), 7);
    assert_eq!(sim.physic_engine().get_config().color.to_string(), "#00ff00");
    Ok(())
}

#[test]
fn test_keyboard_save_writes_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.toml");
    let mut sim = simulator(vec![vec![WindowEvent::SaveSettings]], &path);
    sim.step();
    assert!(path.exists());
}
