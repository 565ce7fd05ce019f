//! NPC agents: one type parameterised by a per-kind stat/asset profile.
//!
//! Each tick an agent projects itself, checks line of sight from the camera
//! with the shared caster, and then picks exactly one branch in priority
//! order: dead, hit/pain, attack or chase when seen, keep hunting once
//! triggered, or idle.
use crate::audio_manager::{AudioSink, SoundEvent};
use crate::game::animation::{AnimationTimer, FrameCycle};
use crate::game::caster;
use crate::game::clock::FrameTick;
use crate::game::grid::{Cell, GridMap, cell_of};
use crate::game::pathfinding::PathFinder;
use crate::game::player::{CameraView, Player};
use crate::render::projector::{Projection, Projector, SpriteGeometry};
use crate::render::textures::TexId;
use log::debug;
use rand::{Rng, RngCore};
use raylib::prelude::Vector2;
use std::collections::HashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Soldier,
    CacoDemon,
    CyberDemon,
}

impl AgentKind {
    /// Order matches the spawn weight table.
    pub const ALL: [AgentKind; 3] = [AgentKind::Soldier, AgentKind::CacoDemon, AgentKind::CyberDemon];

    pub fn profile(self) -> AgentProfile {
        match self {
            AgentKind::Soldier => AgentProfile {
                folder: "soldier",
                scale: 0.5,
                height_shift: 0.38,
                animation_ms: 160,
                attack_dist: 4.0,
                speed: 2.1,
                radius: 0.2,
                health: 90,
                attack_damage: 8,
                accuracy: 0.12,
            },
            AgentKind::CacoDemon => AgentProfile {
                folder: "caco_demon",
                scale: 1.05,
                height_shift: 0.27,
                animation_ms: 200,
                attack_dist: 1.5,
                speed: 3.9,
                radius: 0.3,
                health: 120,
                attack_damage: 20,
                accuracy: 0.18,
            },
            AgentKind::CyberDemon => AgentProfile {
                folder: "cyber_demon",
                scale: 0.85,
                height_shift: 0.04,
                animation_ms: 210,
                attack_dist: 6.0,
                speed: 2.7,
                radius: 0.25,
                health: 250,
                attack_damage: 14,
                accuracy: 0.22,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentProfile {
    /// Sprite folder under `sprites/npc`.
    pub folder: &'static str,
    pub scale: f32,
    pub height_shift: f32,
    pub animation_ms: u64,
    pub attack_dist: f32,
    /// Cells per second.
    pub speed: f32,
    /// Footprint radius used for wall checks.
    pub radius: f32,
    pub health: i32,
    pub attack_damage: i32,
    pub accuracy: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Searching,
    Attacking,
    Pain,
    Dead,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anim {
    Idle = 0,
    Walk = 1,
    Attack = 2,
    Pain = 3,
    Death = 4,
}

/// Frame handles per animation plus the base image size (aspect ratio).
#[derive(Clone, Debug)]
pub struct AgentFrames {
    pub idle: Vec<TexId>,
    pub walk: Vec<TexId>,
    pub attack: Vec<TexId>,
    pub pain: Vec<TexId>,
    pub death: Vec<TexId>,
    pub image_size: (u32, u32),
}

/// Everything an agent may read or touch during its update.
pub struct AgentContext<'a> {
    pub grid: &'a GridMap,
    pub player: &'a mut Player,
    pub view: CameraView,
    /// Cells of live agents, snapshotted before any agent moves this tick.
    pub occupied: &'a HashSet<Cell>,
    pub projector: &'a Projector,
    pub pathfinder: &'a dyn PathFinder,
    pub audio: &'a dyn AudioSink,
    pub rng: &'a mut dyn RngCore,
    pub tick: FrameTick,
    pub weapon_damage: i32,
    pub max_depth: usize,
}

pub struct Agent {
    pub kind: AgentKind,
    pub pos: Vector2,
    pub health: i32,
    pub alive: bool,
    pub state: AgentState,
    /// Latched once the player is seen; never cleared while alive.
    pub search_triggered: bool,
    pub pain: bool,
    pub sees_player: bool,
    pub dist: f32,
    pub profile: AgentProfile,
    timer: AnimationTimer,
    cycles: [FrameCycle<TexId>; 5],
    current: Option<TexId>,
    image_size: (u32, u32),
    projection: Option<Projection>,
    corpse: bool,
}

impl Agent {
    pub fn new(kind: AgentKind, pos: Vector2, frames: &AgentFrames, now_ms: u64) -> Self {
        let profile = kind.profile();
        let cycles = [
            FrameCycle::new(frames.idle.clone()),
            FrameCycle::new(frames.walk.clone()),
            FrameCycle::new(frames.attack.clone()),
            FrameCycle::new(frames.pain.clone()),
            FrameCycle::new(frames.death.clone()),
        ];
        let current = cycles[Anim::Walk as usize].current();
        Self {
            kind,
            pos,
            health: profile.health,
            alive: true,
            state: AgentState::Idle,
            search_triggered: false,
            pain: false,
            sees_player: false,
            dist: f32::INFINITY,
            profile,
            timer: AnimationTimer::new(profile.animation_ms, now_ms),
            cycles,
            current,
            image_size: frames.image_size,
            projection: None,
            corpse: false,
        }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        cell_of(self.pos.x, self.pos.y)
    }

    pub fn current_frame(&self) -> Option<TexId> {
        self.current
    }

    /// Death animation finished; the agent no longer updates.
    pub fn is_corpse(&self) -> bool {
        self.corpse
    }

    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    pub fn geometry(&self) -> SpriteGeometry {
        SpriteGeometry {
            pos: self.pos,
            image_size: self.image_size,
            scale: self.profile.scale,
            height_shift: self.profile.height_shift,
        }
    }

    pub fn update(&mut self, ctx: &mut AgentContext<'_>) {
        // corpses stay on screen, so they still reproject
        self.projection = ctx.projector.project(&ctx.view, &self.geometry());
        self.dist = (self.pos.x - ctx.view.pos.x).hypot(self.pos.y - ctx.view.pos.y);
        if self.corpse {
            return;
        }
        let trigger = self.timer.check(ctx.tick.now_ms);

        if !self.alive {
            self.animate_death(ctx.tick.global_trigger);
            return;
        }

        self.sees_player = caster::line_of_sight(ctx.grid, ctx.view.pos, self.pos, ctx.max_depth).target_visible();
        self.check_hit(ctx);
        if !self.alive {
            return;
        }

        if self.pain {
            self.set_state(AgentState::Pain);
            self.animate(Anim::Pain, trigger);
            if trigger {
                self.pain = false;
            }
        } else if self.sees_player {
            self.search_triggered = true;
            if self.dist < self.profile.attack_dist {
                self.set_state(AgentState::Attacking);
                self.animate(Anim::Attack, trigger);
                self.attack(ctx, trigger);
            } else {
                self.set_state(AgentState::Searching);
                self.animate(Anim::Walk, trigger);
                self.movement(ctx);
            }
        } else if self.search_triggered {
            self.set_state(AgentState::Searching);
            self.animate(Anim::Walk, trigger);
            self.movement(ctx);
        } else {
            self.set_state(AgentState::Idle);
            self.animate(Anim::Idle, trigger);
        }
    }

    /// Reduces health; crossing below 1 kills the agent exactly once.
    pub fn take_damage(&mut self, amount: i32, audio: &dyn AudioSink) {
        if !self.alive {
            return;
        }
        self.health -= amount;
        if self.health < 1 {
            self.alive = false;
            self.pain = false;
            self.set_state(AgentState::Dead);
            self.cycles[Anim::Death as usize].reset();
            self.current = self.cycles[Anim::Death as usize].current();
            audio.play(SoundEvent::NpcDeath);
        }
    }

    fn check_hit(&mut self, ctx: &mut AgentContext<'_>) {
        if !(self.sees_player && ctx.player.shot) {
            return;
        }
        let Some(p) = self.projection else { return };
        if ctx.projector.covers_center(&p) {
            ctx.audio.play(SoundEvent::NpcPain);
            ctx.player.shot = false;
            self.pain = true;
            self.take_damage(ctx.weapon_damage, ctx.audio);
        }
    }

    fn attack(&mut self, ctx: &mut AgentContext<'_>, trigger: bool) {
        if !trigger {
            return;
        }
        ctx.audio.play(SoundEvent::NpcAttack);
        if ctx.rng.gen_range(0.0f32..1.0) < self.profile.accuracy {
            ctx.player.take_damage(self.profile.attack_damage, ctx.audio);
        }
    }

    fn movement(&mut self, ctx: &mut AgentContext<'_>) {
        let target = cell_of(ctx.view.pos.x, ctx.view.pos.y);
        let next = ctx.pathfinder.get_path(self.cell(), target);
        if ctx.occupied.contains(&next) {
            return;
        }
        let angle = (next.1 as f32 + 0.5 - self.pos.y).atan2(next.0 as f32 + 0.5 - self.pos.x);
        let step = self.profile.speed * ctx.tick.dt_secs();
        let (dx, dy) = (angle.cos() * step, angle.sin() * step);
        // the wall check runs even if the path-finder handed us a wall cell
        ctx.grid.slide_move(&mut self.pos.x, &mut self.pos.y, dx, dy, self.profile.radius);
    }

    fn animate(&mut self, anim: Anim, trigger: bool) {
        let cycle = &mut self.cycles[anim as usize];
        cycle.advance_on(trigger);
        if let Some(frame) = cycle.current() {
            self.current = Some(frame);
        }
    }

    fn animate_death(&mut self, global_trigger: bool) {
        let death = &mut self.cycles[Anim::Death as usize];
        if death.is_last() {
            self.corpse = true;
            return;
        }
        if global_trigger {
            death.advance();
            if let Some(frame) = death.current() {
                self.current = Some(frame);
            }
        }
    }

    fn set_state(&mut self, state: AgentState) {
        if self.state != state {
            debug!("{:?} at {:?}: {:?} -> {:?}", self.kind, self.cell(), self.state, state);
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_manager::testing::RecordingAudio;
    use crate::config::{EngineConfig, PlayerConfig};
    use crate::render::textures::{Pixmap, TextureManager};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use raylib::prelude::Color;

    /// Path-finder that always answers with the same cell.
    struct FixedPath(Cell);

    impl PathFinder for FixedPath {
        fn get_path(&self, _from: Cell, _to: Cell) -> Cell {
            self.0
        }
    }

    struct Harness {
        player: Player,
        projector: Projector,
        audio: RecordingAudio,
        rng: StdRng,
        frames: AgentFrames,
    }

    impl Harness {
        fn new(player_pos: (f32, f32)) -> Self {
            let mut tm = TextureManager::new();
            let mut ids = |n: usize| -> Vec<TexId> {
                (0..n).map(|_| tm.insert(Pixmap::solid(64, 64, Color::RED))).collect()
            };
            let frames = AgentFrames {
                idle: ids(1),
                walk: ids(4),
                attack: ids(2),
                pain: ids(1),
                death: ids(3),
                image_size: (64, 64),
            };
            let cfg = PlayerConfig { start: player_pos, ..PlayerConfig::default() };
            Self {
                player: Player::new(&cfg),
                projector: Projector::new(&EngineConfig::default()),
                audio: RecordingAudio::default(),
                rng: StdRng::seed_from_u64(1),
                frames,
            }
        }

        fn agent(&self, kind: AgentKind, x: f32, y: f32) -> Agent {
            Agent::new(kind, Vector2::new(x, y), &self.frames, 0)
        }

        fn step(&mut self, agent: &mut Agent, grid: &GridMap, pf: &dyn PathFinder, occupied: &HashSet<Cell>, now_ms: u64) {
            self.step_dt(agent, grid, pf, occupied, now_ms, 16);
        }

        fn step_dt(
            &mut self,
            agent: &mut Agent,
            grid: &GridMap,
            pf: &dyn PathFinder,
            occupied: &HashSet<Cell>,
            now_ms: u64,
            dt_ms: u64,
        ) {
            let view = self.player.view(0.0);
            let mut ctx = AgentContext {
                grid,
                player: &mut self.player,
                view,
                occupied,
                projector: &self.projector,
                pathfinder: pf,
                audio: &self.audio,
                rng: &mut self.rng,
                tick: FrameTick { now_ms, dt_ms, global_trigger: true },
                weapon_damage: 50,
                max_depth: 20,
            };
            agent.update(&mut ctx);
        }
    }

    fn occupied_by(agent: &Agent) -> HashSet<Cell> {
        [agent.cell()].into_iter().collect()
    }

    #[test]
    fn profiles_differ_only_in_data() {
        let s = AgentKind::Soldier.profile();
        let c = AgentKind::CyberDemon.profile();
        assert_eq!(s.folder, "soldier");
        assert!(c.health > s.health);
        assert!(AgentKind::ALL.iter().all(|k| (0.0..=1.0).contains(&k.profile().accuracy)));
    }

    #[test]
    fn idle_until_seen() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::with_walls(12, 12, &[(4, 5)]);
        let mut agent = h.agent(AgentKind::Soldier, 7.5, 5.5);
        let pf = FixedPath((6, 5));
        h.step(&mut agent, &grid, &pf, &HashSet::new(), 10);
        assert_eq!(agent.state, AgentState::Idle);
        assert!(!agent.search_triggered);
        assert_eq!((agent.pos.x, agent.pos.y), (7.5, 5.5));
    }

    #[test]
    fn searching_turns_into_attacking_once_visible() {
        let mut h = Harness::new((2.5, 5.5));
        let blocked = GridMap::with_walls(12, 12, &[(3, 5)]);
        let clear = GridMap::empty(12, 12);
        let mut agent = h.agent(AgentKind::Soldier, 4.5, 5.5);
        agent.profile.accuracy = 1.0;
        agent.profile.attack_damage = 10;
        agent.search_triggered = true;
        let pf = FixedPath((4, 5));
        let occupied = occupied_by(&agent);

        h.step(&mut agent, &blocked, &pf, &occupied, 10);
        assert!(!agent.sees_player);
        assert_eq!(agent.state, AgentState::Searching);

        h.step(&mut agent, &clear, &pf, &occupied, 20);
        assert!(agent.sees_player);
        assert!((agent.dist - 2.0).abs() < 1e-4);
        assert_eq!(agent.state, AgentState::Attacking);
        assert_eq!(h.player.health, 300, "no damage before the animation pulse");

        h.step(&mut agent, &clear, &pf, &occupied, 200);
        assert_eq!(h.player.health, 292, "10 * (1 - 0.2)");
        assert_eq!(h.audio.count(SoundEvent::NpcAttack), 1);
    }

    #[test]
    fn missed_rolls_do_no_damage() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::empty(12, 12);
        let mut agent = h.agent(AgentKind::Soldier, 4.5, 5.5);
        agent.profile.accuracy = 0.0;
        let occupied = occupied_by(&agent);
        for t in 1..20 {
            h.step(&mut agent, &grid, &FixedPath((4, 5)), &occupied, t * 200);
        }
        assert_eq!(h.player.health, 300);
        assert!(h.audio.count(SoundEvent::NpcAttack) > 0);
    }

    #[test]
    fn search_flag_is_sticky_through_occlusion() {
        let mut h = Harness::new((2.5, 5.5));
        let clear = GridMap::empty(12, 12);
        let blocked = GridMap::with_walls(12, 12, &[(3, 5)]);
        let mut agent = h.agent(AgentKind::Soldier, 9.5, 5.5);
        let pf = FixedPath((9, 5));
        let occupied = occupied_by(&agent);
        h.step(&mut agent, &clear, &pf, &occupied, 10);
        assert!(agent.search_triggered);
        for t in 2..10 {
            h.step(&mut agent, &blocked, &pf, &occupied, t * 10);
            assert!(agent.search_triggered);
            assert_eq!(agent.state, AgentState::Searching);
        }
    }

    #[test]
    fn shot_in_the_crosshair_causes_pain() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::empty(12, 12);
        let mut agent = h.agent(AgentKind::Soldier, 8.5, 5.5);
        let occupied = occupied_by(&agent);
        h.player.shot = true;
        h.step(&mut agent, &grid, &FixedPath((8, 5)), &occupied, 10);
        assert!(!h.player.shot, "shot consumed");
        assert_eq!(agent.health, 40);
        assert_eq!(agent.state, AgentState::Pain);
        assert_eq!(h.audio.count(SoundEvent::NpcPain), 1);

        // the pain flash ends on the next animation pulse
        h.step(&mut agent, &grid, &FixedPath((8, 5)), &occupied, 50);
        assert!(agent.pain);
        h.step(&mut agent, &grid, &FixedPath((8, 5)), &occupied, 200);
        assert!(!agent.pain);
        h.step(&mut agent, &grid, &FixedPath((8, 5)), &occupied, 210);
        assert_eq!(agent.state, AgentState::Searching);
    }

    #[test]
    fn shot_off_center_misses() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::empty(12, 12);
        let mut agent = h.agent(AgentKind::Soldier, 8.5, 8.5);
        h.player.shot = true;
        h.step(&mut agent, &grid, &FixedPath((8, 8)), &occupied_by(&agent), 10);
        assert!(h.player.shot);
        assert_eq!(agent.health, 90);
    }

    #[test]
    fn dies_exactly_once() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::empty(12, 12);
        let mut agent = h.agent(AgentKind::Soldier, 8.5, 5.5);
        agent.take_damage(100, &h.audio);
        agent.take_damage(100, &h.audio);
        assert!(!agent.alive);
        assert_eq!(agent.state, AgentState::Dead);
        assert_eq!(h.audio.count(SoundEvent::NpcDeath), 1);
        assert_eq!(agent.health, -10);

        for t in 1..10 {
            h.player.shot = true;
            h.step(&mut agent, &grid, &FixedPath((8, 5)), &HashSet::new(), t * 100);
            assert_eq!(agent.state, AgentState::Dead);
        }
        assert!(agent.is_corpse());
        assert_eq!(agent.current_frame(), h.frames.death.last().copied());
        assert_eq!(h.audio.count(SoundEvent::NpcDeath), 1);
    }

    #[test]
    fn wall_from_path_finder_is_never_entered() {
        let mut h = Harness::new((2.5, 9.5));
        // wall at (3,2); path-finder insists on walking into it
        let grid = GridMap::with_walls(12, 12, &[(3, 2), (2, 4), (3, 4), (4, 4)]);
        let mut agent = h.agent(AgentKind::Soldier, 2.5, 2.5);
        agent.search_triggered = true;
        let pf = FixedPath((3, 2));
        for t in 1..200 {
            h.step(&mut agent, &grid, &pf, &HashSet::new(), t * 16);
            assert_ne!(agent.cell(), (3, 2));
        }
        assert!(agent.pos.x + agent.profile.radius <= 3.0);
        assert!(agent.pos.x > 2.5, "partial move toward the wall");
    }

    #[test]
    fn long_frame_does_not_cross_a_wall_column() {
        let mut h = Harness::new((1.5, 9.5));
        let walls: Vec<Cell> = (0..12).map(|y| (3, y)).collect();
        let grid = GridMap::with_walls(12, 12, &walls);
        let mut agent = h.agent(AgentKind::Soldier, 2.5, 2.5);
        agent.search_triggered = true;
        h.step_dt(&mut agent, &grid, &FixedPath((4, 2)), &HashSet::new(), 10, 1000);
        assert_eq!(agent.state, AgentState::Searching);
        assert!(agent.pos.x < 3.0, "stayed west of the wall, got {}", agent.pos.x);
        assert_eq!(agent.cell(), (2, 2));
    }

    #[test]
    fn occupied_next_cell_blocks_the_step() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::with_walls(12, 12, &[(4, 5)]);
        let mut agent = h.agent(AgentKind::Soldier, 8.5, 5.5);
        agent.search_triggered = true;
        let occupied: HashSet<Cell> = [(8, 5), (7, 5)].into_iter().collect();
        h.step(&mut agent, &grid, &FixedPath((7, 5)), &occupied, 10);
        assert_eq!(agent.state, AgentState::Searching);
        assert_eq!((agent.pos.x, agent.pos.y), (8.5, 5.5));
    }

    #[test]
    fn searching_moves_toward_next_cell_center() {
        let mut h = Harness::new((2.5, 5.5));
        let grid = GridMap::with_walls(12, 12, &[(4, 5)]);
        let mut agent = h.agent(AgentKind::Soldier, 8.5, 5.5);
        agent.search_triggered = true;
        h.step(&mut agent, &grid, &FixedPath((7, 5)), &occupied_by(&agent), 10);
        let expected = 8.5 - agent.profile.speed * 0.016;
        assert!((agent.pos.x - expected).abs() < 1e-4);
        assert!((agent.pos.y - 5.5).abs() < 1e-4);
    }
}
