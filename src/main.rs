//! Drift Runner entry point
//!
//! Headless native run: drives a session with scripted input and logs the HUD.
//! An optional first argument names a tuning JSON file.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use drift_runner::consts::SIM_DT;
    use drift_runner::renderer::shapes;
    use drift_runner::sim::{Bounds, GamePhase};
    use drift_runner::{Game, GameEvent, Key, SimContext, Tuning};
    use glam::Vec2;

    env_logger::init();
    log::info!("Drift Runner (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using default tuning", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let ctx = SimContext::new();
    ctx.bus.subscribe::<GameEvent>(|event| match event {
        GameEvent::ZoneCompleted { zones_completed } => {
            log::info!("Zone complete ({} so far)", zones_completed)
        }
        GameEvent::HazardSplit { level, .. } => log::debug!("Split into level {}", level),
        _ => {}
    });

    let bounds = Bounds::new(1280.0, 720.0);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = Game::new(ctx, tuning, bounds, seed);
    game.start();

    // Sit in the first zone, turning and firing at the screen edges
    let frame_dt = 1.0 / 60.0;
    let frames = (120.0 / frame_dt) as u32;
    game.press_key(Key::Right);
    for frame in 0..frames {
        if frame % 15 == 0 {
            let t = frame as f32 * frame_dt;
            game.click(bounds.center() + Vec2::from_angle(t) * 400.0);
        }
        game.frame(frame_dt);

        if frame % 60 == 0 {
            let hud = game.hud();
            let vertex_count = shapes::batch(&game.drawables()).len();
            log::info!(
                "{} | {} | zones {} | {} vertices",
                hud.score_text(),
                hud.playtime_text(),
                hud.zones_completed,
                vertex_count
            );
        }
        if matches!(game.state().phase, GamePhase::GameOver | GamePhase::Win) {
            break;
        }
    }

    let hud = game.hud();
    match hud.results.as_deref() {
        Some(results) => println!("{}", results),
        None => println!(
            "Still playing after {} ticks ({:.1} s simulated)\n{}",
            game.state().time_ticks,
            game.state().time_ticks as f32 * SIM_DT,
            hud.score_text()
        ),
    }
    game.back_to_menu();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo only; a browser host drives `Game` directly
}
