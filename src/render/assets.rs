//! Loads every image the game needs into one [`TextureManager`].
//!
//! Wall textures, the sky and the weapon frames are required. Agent and
//! decoration animations degrade to a base frame or a generated stand-in.
use crate::error::AssetError;
use crate::game::agent::{AgentFrames, AgentKind};
use crate::game::sprite::DecorationKind;
use crate::render::textures::{TexId, TextureManager};
use log::{info, warn};
use raylib::prelude::Color;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const WALL_TEXTURE_COUNT: u8 = 5;
const PLACEHOLDER_SIZE: u32 = 128;

pub struct GameAssets {
    pub textures: TextureManager,
    pub walls: Vec<TexId>,
    pub sky: TexId,
    pub weapon: Vec<TexId>,
    pub agents: HashMap<AgentKind, AgentFrames>,
    pub decorations: HashMap<DecorationKind, (Vec<TexId>, (u32, u32))>,
    pub root: PathBuf,
}

impl GameAssets {
    pub fn load(root: &Path) -> Result<Self, AssetError> {
        let mut tm = TextureManager::new();

        let walls = (1..=WALL_TEXTURE_COUNT)
            .map(|id| tm.load_file(&root.join("textures").join(format!("{id}.png"))))
            .collect::<Result<Vec<_>, _>>()?;
        let sky = tm.load_file(&root.join("textures").join("sky.png"))?;
        let weapon = tm.load_folder(&root.join("sprites").join("weapons"))?;

        let agents = AgentKind::ALL
            .into_iter()
            .map(|kind| (kind, load_agent_frames(&mut tm, root, kind)))
            .collect();
        let decorations = DecorationKind::ALL
            .into_iter()
            .map(|kind| (kind, load_decoration(&mut tm, root, kind)))
            .collect();

        info!("loaded {} images from {}", tm.len(), root.display());
        Ok(Self { textures: tm, walls, sky, weapon, agents, decorations, root: root.to_path_buf() })
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.root.join("sounds")
    }

    pub fn agent_frames(&self, kind: AgentKind) -> Option<&AgentFrames> {
        self.agents.get(&kind)
    }
}

fn placeholder_color(kind: AgentKind) -> Color {
    match kind {
        AgentKind::Soldier => Color::new(150, 120, 80, 255),
        AgentKind::CacoDemon => Color::new(200, 40, 40, 255),
        AgentKind::CyberDemon => Color::new(120, 90, 110, 255),
    }
}

fn load_agent_frames(tm: &mut TextureManager, root: &Path, kind: AgentKind) -> AgentFrames {
    let base = root.join("sprites").join("npc").join(kind.profile().folder);
    let walk = match tm.load_folder(&base.join("walk")) {
        Ok(frames) => frames,
        Err(e) => {
            warn!("{kind:?}: {e}; using a placeholder");
            let pm = TextureManager::make_enemy_flat(PLACEHOLDER_SIZE / 2, PLACEHOLDER_SIZE, placeholder_color(kind));
            vec![tm.insert(pm)]
        }
    };
    // walk is never empty: load_folder rejects empty folders
    let base_frame = walk[0];
    let mut state = |name: &str| match tm.load_folder(&base.join(name)) {
        Ok(frames) => frames,
        Err(e) => {
            warn!("{kind:?} {name}: {e}; using the base frame");
            vec![base_frame]
        }
    };
    let idle = state("idle");
    let attack = state("attack");
    let pain = state("pain");
    let death = state("death");
    let image_size = tm.image_size(base_frame).unwrap_or((PLACEHOLDER_SIZE / 2, PLACEHOLDER_SIZE));
    AgentFrames { idle, walk, attack, pain, death, image_size }
}

fn load_decoration(tm: &mut TextureManager, root: &Path, kind: DecorationKind) -> (Vec<TexId>, (u32, u32)) {
    let frames = match tm.load_folder(&root.join(kind.folder())) {
        Ok(frames) => frames,
        Err(e) => {
            warn!("{kind:?}: {e}; using a generated light");
            let pm = TextureManager::make_glowing_orb(PLACEHOLDER_SIZE / 2, PLACEHOLDER_SIZE, kind.placeholder_color());
            vec![tm.insert(pm)]
        }
    };
    let size = frames
        .first()
        .and_then(|&f| tm.image_size(f))
        .unwrap_or((PLACEHOLDER_SIZE / 2, PLACEHOLDER_SIZE));
    (frames, size)
}
