use anyhow::{Context, Result, anyhow};
use doomcaster::audio_manager::{AudioManager, AudioSink, SilentAudio};
use doomcaster::config::EngineConfig;
use doomcaster::game::animation::AnimationTimer;
use doomcaster::game::clock::{FrameClock, FrameTick};
use doomcaster::game::grid::GridMap;
use doomcaster::game::input::process_events;
use doomcaster::game::world::World;
use doomcaster::render::assets::GameAssets;
use doomcaster::render::background::Background;
use doomcaster::render::compositor::Compositor;
use doomcaster::render::framebuffer::Framebuffer;
use doomcaster::render::hud::{HudInfo, draw_hud};
use doomcaster::render::walls::WallRenderer;
use env_logger::Env;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use raylib::prelude::*;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "engine.toml";
/// Pulse shared by all death animations.
const GLOBAL_TRIGGER_MS: u64 = 40;
const DAMAGE_TINT: f32 = 0.45;

fn main() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cfg_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = EngineConfig::load(&cfg_path)?;

    let grid = match &cfg.map.path {
        Some(path) => GridMap::load(path).with_context(|| format!("loading map {path}"))?,
        None => GridMap::builtin(),
    };
    info!("map {}x{} with {} walls", grid.cols, grid.rows, grid.wall_count());

    let (width, height) = (cfg.window.width, cfg.window.height);
    let (mut window, raylib_thread) = raylib::init().size(width, height).title(&cfg.window.title).build();
    window.disable_cursor();

    let resources = PathBuf::from(&cfg.assets.resources_dir);
    let assets = GameAssets::load(&resources)
        .with_context(|| format!("loading core assets from {}", resources.display()))?;

    let audio: Box<dyn AudioSink> = match AudioManager::new(cfg.audio.volume) {
        Some(mut am) => {
            am.load_sfx(&assets.sounds_dir());
            if cfg.audio.music {
                am.play_music_loop(&assets.sounds_dir().join("theme.wav"));
            }
            Box::new(am)
        }
        None => {
            warn!("no audio output device, running silent");
            Box::new(SilentAudio)
        }
    };

    let mut framebuffer = Framebuffer::new(width as u32, height as u32);
    let blank = Image::gen_image_color(width, height, Color::BLACK);
    let mut screen = window
        .load_texture_from_image(&raylib_thread, &blank)
        .map_err(|e| anyhow!("creating the screen texture: {e}"))?;

    let walls = WallRenderer::new(&cfg, assets.walls.clone());
    let mut background = Background::new(&cfg, assets.sky);
    let mut compositor = Compositor::new();
    let mut clock = FrameClock::new(cfg.frame_duration_ms());
    let mut global_timer = AnimationTimer::new(GLOBAL_TRIGGER_MS, 0);
    let mut world = World::new(&cfg, grid.clone(), &assets, StdRng::from_entropy(), clock.now_ms());

    while !window.window_should_close() {
        let input = process_events(&mut window);
        let now_ms = clock.now_ms();
        let tick = FrameTick { now_ms, dt_ms: clock.dt_ms(), global_trigger: global_timer.check(now_ms) };

        if world.restart_due(now_ms) {
            info!("starting a new game");
            world = World::new(&cfg, grid.clone(), &assets, StdRng::from_entropy(), now_ms);
        }
        world.update(&input, tick, audio.as_ref());

        // ---- software render ----
        let view = world.view();
        background.update(world.player.rel);
        background.draw(&mut framebuffer, &assets.textures, view.horizon_shift);
        walls.cast_columns(&world.grid, &view, &assets.textures, &mut compositor);
        world.queue_sprites(&mut compositor);
        compositor.composite(&mut framebuffer, &assets.textures);
        world.weapon.draw(&mut framebuffer, &assets.textures, view.horizon_shift);
        if world.player.damage_flash_ms > 0 {
            framebuffer.apply_damage_tint(DAMAGE_TINT);
        }
        framebuffer.upload_to_texture(&mut screen);

        // ---- present ----
        let hud = HudInfo {
            health: world.player.health,
            max_health: world.player.max_health,
            fps: window.get_fps(),
            enemies_left: world.alive_agents(),
            banner: world.banner(),
        };
        {
            let mut d = window.begin_drawing(&raylib_thread);
            d.clear_background(Color::BLACK);
            d.draw_texture(&screen, 0, 0, Color::WHITE);
            draw_hud(&mut d, &hud, width, height);
        }

        clock.pace();
    }

    info!("window closed");
    Ok(())
}
