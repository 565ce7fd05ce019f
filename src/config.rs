//! Engine configuration loaded from `engine.toml`.
//!
//! Every field has a default so a partial (or absent) file is fine.
use anyhow::{Context, Result, ensure};
use log::info;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub render: RenderConfig,
    pub audio: AudioConfig,
    pub spawn: SpawnConfig,
    pub assets: AssetsConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: (f32, f32),
    pub angle: f32,
    /// Cells per millisecond.
    pub speed: f32,
    pub radius: f32,
    pub max_health: i32,
    pub damage_resistance: f32,
    pub health_recovery_ms: u64,
    pub mouse_sensitivity: f32,
    pub mouse_max_rel: f32,
    pub pitch_sensitivity: f32,
    pub max_pitch: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fov: f32,
    /// Zero means "half the window width".
    pub num_rays: u32,
    pub max_depth: usize,
    pub texture_size: u32,
    pub floor_color: (u8, u8, u8),
    pub sky_color: (u8, u8, u8),
    pub pitch_factor: f32,
    pub sky_parallax: f32,
    pub min_clip_distance: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub volume: f32,
    pub music: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enemies: usize,
    /// Weights for soldier, caco demon, cyber demon.
    pub weights: [u32; 3],
    pub restricted_area: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub resources_dir: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            render: RenderConfig::default(),
            audio: AudioConfig::default(),
            spawn: SpawnConfig::default(),
            assets: AssetsConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 1600, height: 900, fps: 60, title: "doomcaster".to_string() }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: (1.5, 5.0),
            angle: 0.0,
            speed: 0.004,
            radius: 0.2,
            max_health: 300,
            damage_resistance: 0.20,
            health_recovery_ms: 700,
            mouse_sensitivity: 0.0003,
            mouse_max_rel: 40.0,
            pitch_sensitivity: 0.002,
            max_pitch: 1.5,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::PI / 3.0,
            num_rays: 0,
            max_depth: 20,
            texture_size: 256,
            floor_color: (30, 30, 30),
            sky_color: (0, 0, 0),
            pitch_factor: 80.0,
            sky_parallax: 4.5,
            min_clip_distance: 0.5,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 0.3, music: true }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self { enemies: 20, weights: [70, 20, 10], restricted_area: 10 }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { resources_dir: "resources".to_string() }
    }
}

impl EngineConfig {
    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.window.width > 0 && self.window.height > 0, "window size must be positive");
        ensure!(self.window.fps > 0, "fps must be positive");
        ensure!(
            self.render.fov > 0.0 && self.render.fov < std::f32::consts::PI,
            "fov must be within (0, pi)"
        );
        ensure!(self.render.max_depth > 0, "max_depth must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.player.damage_resistance),
            "damage_resistance must be within [0, 1]"
        );
        ensure!(self.player.max_health > 0, "max_health must be positive");
        // walls and sprites use the raw shift, the background clamps its horizon
        ensure!(
            self.player.max_pitch.abs() * self.render.pitch_factor.abs() <= self.window.height as f32,
            "max_pitch * pitch_factor must not exceed the window height"
        );
        Ok(())
    }

    // ---- derived render constants ----

    pub fn num_rays(&self) -> u32 {
        if self.render.num_rays == 0 { (self.window.width as u32 / 2).max(1) } else { self.render.num_rays }
    }

    pub fn half_fov(&self) -> f32 {
        self.render.fov / 2.0
    }

    pub fn delta_angle(&self) -> f32 {
        self.render.fov / self.num_rays() as f32
    }

    pub fn screen_dist(&self) -> f32 {
        (self.window.width as f32 / 2.0) / self.half_fov().tan()
    }

    /// Screen pixels per ray column.
    pub fn column_scale(&self) -> f32 {
        self.window.width as f32 / self.num_rays() as f32
    }

    pub fn frame_duration_ms(&self) -> u64 {
        (1000 / self.window.fps as u64).max(1)
    }
}
