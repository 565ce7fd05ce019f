//! One game session: map, player, agents, decorations and the weapon, plus
//! the fixed per-tick update order.
use crate::audio_manager::AudioSink;
use crate::config::EngineConfig;
use crate::game::agent::{Agent, AgentContext};
use crate::game::clock::FrameTick;
use crate::game::grid::{Cell, GridMap, cell_of};
use crate::game::input::InputState;
use crate::game::pathfinding::{BfsPathFinder, PathFinder};
use crate::game::player::{CameraView, Player};
use crate::game::spawner;
use crate::game::sprite::{DEFAULT_PLACEMENT, Decoration};
use crate::game::weapon::Weapon;
use crate::render::assets::GameAssets;
use crate::render::compositor::{Compositor, ProjectedItem};
use crate::render::projector::Projector;
use log::{info, warn};
use rand::rngs::StdRng;
use raylib::prelude::Vector2;
use std::collections::HashSet;

/// How long the game-over / victory banner stays up before a restart.
pub const BANNER_MS: u64 = 1500;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    Won,
}

pub struct World {
    pub grid: GridMap,
    pub player: Player,
    pub agents: Vec<Agent>,
    pub decorations: Vec<Decoration>,
    pub weapon: Weapon,
    pub status: GameStatus,
    projector: Projector,
    agent_cells: HashSet<Cell>,
    /// Replaces the grid BFS when set.
    pathfinder: Option<Box<dyn PathFinder>>,
    rng: StdRng,
    pitch_factor: f32,
    max_depth: usize,
    status_since_ms: u64,
}

impl World {
    pub fn new(cfg: &EngineConfig, grid: GridMap, assets: &GameAssets, mut rng: StdRng, now_ms: u64) -> Self {
        let player = Player::new(&cfg.player);
        if !grid.is_free(player.cell()) {
            warn!("player start {:?} is inside a wall", player.cell());
        }

        let agents = spawner::spawn_agents(&grid, &cfg.spawn, &mut rng)
            .into_iter()
            .filter_map(|s| {
                let frames = assets.agent_frames(s.kind)?;
                let (x, y) = s.position();
                Some(Agent::new(s.kind, Vector2::new(x, y), frames, now_ms))
            })
            .collect();

        let decorations = DEFAULT_PLACEMENT
            .iter()
            .filter(|(_, x, y)| grid.is_free(cell_of(*x, *y)))
            .filter_map(|&(kind, x, y)| {
                let (frames, size) = assets.decorations.get(&kind)?;
                Some(Decoration::new(kind, Vector2::new(x, y), frames.clone(), *size, now_ms))
            })
            .collect();

        Self {
            grid,
            player,
            agents,
            decorations,
            weapon: Weapon::new(assets.weapon.clone(), now_ms),
            status: GameStatus::Playing,
            projector: Projector::new(cfg),
            agent_cells: HashSet::new(),
            pathfinder: None,
            rng,
            pitch_factor: cfg.render.pitch_factor,
            max_depth: cfg.render.max_depth,
            status_since_ms: now_ms,
        }
    }

    pub fn view(&self) -> CameraView {
        self.player.view(self.pitch_factor)
    }

    pub fn set_pathfinder(&mut self, pathfinder: Box<dyn PathFinder>) {
        self.pathfinder = Some(pathfinder);
    }

    pub fn alive_agents(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    pub fn update(&mut self, input: &InputState, tick: FrameTick, audio: &dyn AudioSink) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.player.update(input, tick, &self.grid);
        self.weapon.try_fire(input.fire, &mut self.player, audio);

        // dead agents free their cell immediately
        self.agent_cells = self.agents.iter().filter(|a| a.alive).map(Agent::cell).collect();

        let view = self.view();
        for d in &mut self.decorations {
            d.update(tick.now_ms, &self.projector, &view);
        }

        let bfs = BfsPathFinder::new(&self.grid);
        let pathfinder: &dyn PathFinder = match &self.pathfinder {
            Some(pf) => &**pf,
            None => &bfs,
        };
        let mut ctx = AgentContext {
            grid: &self.grid,
            player: &mut self.player,
            view,
            occupied: &self.agent_cells,
            projector: &self.projector,
            pathfinder,
            audio,
            rng: &mut self.rng,
            tick,
            weapon_damage: self.weapon.damage,
            max_depth: self.max_depth,
        };
        for agent in &mut self.agents {
            agent.update(&mut ctx);
        }

        self.weapon.update(tick.now_ms, &mut self.player);
        self.update_status(tick.now_ms);
    }

    fn update_status(&mut self, now_ms: u64) {
        let next = if !self.player.is_alive() {
            GameStatus::GameOver
        } else if self.alive_agents() == 0 {
            GameStatus::Won
        } else {
            GameStatus::Playing
        };
        if next != self.status {
            info!("game status: {:?} -> {next:?}", self.status);
            self.status = next;
            self.status_since_ms = now_ms;
        }
    }

    pub fn banner(&self) -> Option<&'static str> {
        match self.status {
            GameStatus::Playing => None,
            GameStatus::GameOver => Some("GAME OVER"),
            GameStatus::Won => Some("YOU WIN"),
        }
    }

    /// The banner has been shown long enough; the caller builds a new world.
    pub fn restart_due(&self, now_ms: u64) -> bool {
        self.status != GameStatus::Playing && now_ms.saturating_sub(self.status_since_ms) >= BANNER_MS
    }

    /// Queues every visible billboard (decorations and agents, corpses included).
    pub fn queue_sprites(&self, out: &mut Compositor) {
        for d in &self.decorations {
            if let (Some(p), Some(tex)) = (d.projection(), d.current_frame()) {
                out.push(ProjectedItem::billboard(&p, tex, d.image_size()));
            }
        }
        for a in &self.agents {
            if let (Some(p), Some(tex)) = (a.projection(), a.current_frame()) {
                out.push(ProjectedItem::billboard(&p, tex, a.image_size()));
            }
        }
    }
}
