//! Map and world state owned by the engine between frames
//!
//! Player position, facing, camera, the current sub-map, scripted camera/player paths,
//! scripted texture animations and the queue of cells the renderer must redraw.
//! Persistent data (grids, event objects) stays in `SaveData`; methods that touch it
//! take the aggregate as a parameter.

use crate::records::{BaseInfo, EntryRule, Layer, LayerGrid};
use crate::savedata::SaveData;
use log::{debug, info};
use std::collections::VecDeque;

/// Width and height of the overworld grid
pub const OVERWORLD_SIZE: i16 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    North,
    East,
    West,
    #[default]
    South,
}

impl Direction {
    pub fn from_raw(raw: i16) -> Option<Direction> {
        match raw {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::West),
            3 => Some(Direction::South),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i16 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::West => 2,
            Direction::South => 3,
        }
    }

    pub fn offset(self) -> (i16, i16) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
        }
    }

    /// Direction of a single-cell move, None when the cells are not adjacent
    fn between(from: (i16, i16), to: (i16, i16)) -> Option<Direction> {
        match (to.0 as i32 - from.0 as i32, to.1 as i32 - from.1 as i32) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (0, 1) => Some(Direction::South),
            _ => None,
        }
    }
}

/// A grid cell the renderer must redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub submap: i16,
    pub x: i16,
    pub y: i16,
}

/// What a scripted animation track writes textures to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimTarget {
    Player,
    Event(i16),
}

impl AnimTarget {
    /// Scripts name the player with a negative event id
    pub fn from_raw(raw: i16) -> Self {
        if raw < 0 {
            AnimTarget::Player
        } else {
            AnimTarget::Event(raw)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AnimTrack {
    target: AnimTarget,
    tex: i16,
}

/// A scripted texture animation. All tracks advance together, one texture per tick,
/// for as many ticks as the first track needs to go from its first to its last texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationJob {
    submap: i16,
    tracks: Vec<AnimTrack>,
    step: i16,
    remaining: usize,
}

impl AnimationJob {
    pub fn new(submap: i16, target: AnimTarget, beg: i16, end: i16) -> Self {
        AnimationJob {
            submap,
            tracks: vec![AnimTrack { target, tex: beg }],
            step: if end >= beg { 1 } else { -1 },
            remaining: (end as i32 - beg as i32).unsigned_abs() as usize + 1,
        }
    }

    /// Add a track that starts at `beg` and moves in step with the first
    pub fn with_track(mut self, target: AnimTarget, beg: i16) -> Self {
        self.tracks.push(AnimTrack { target, tex: beg });
        self
    }

    pub fn submap(&self) -> i16 {
        self.submap
    }

    /// Ticks left before the job completes
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn drives(&self, event: i16) -> bool {
        self.tracks.iter().any(|t| t.target == AnimTarget::Event(event))
    }
}

#[derive(Debug, Clone, Default)]
pub struct World {
    submap: Option<i16>,
    /// Position inside the current sub-map
    position: (i16, i16),
    /// Position on the overworld, kept while inside a sub-map
    overworld: (i16, i16),
    facing: Direction,
    camera: (i16, i16),
    player_tex: i16,
    overworld_music: i16,
    path: VecDeque<(i16, i16)>,
    path_moves_player: bool,
    animation: Option<AnimationJob>,
    refresh: VecDeque<CellRef>,
    frame: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore position and sub-map from the base record
    pub fn from_base(base: &BaseInfo) -> Self {
        let submap = base.current_submap();
        let position = (base.sub_x, base.sub_y);
        let overworld = (base.main_x, base.main_y);
        World {
            submap,
            position,
            overworld,
            facing: Direction::from_raw(base.facing).unwrap_or_default(),
            camera: if submap.is_some() { position } else { overworld },
            ..Default::default()
        }
    }

    pub fn store_into(&self, base: &mut BaseInfo) {
        base.in_submap = self.submap.unwrap_or(-1);
        base.sub_x = self.position.0;
        base.sub_y = self.position.1;
        base.main_x = self.overworld.0;
        base.main_y = self.overworld.1;
        base.facing = self.facing.to_raw();
    }

    pub fn submap(&self) -> Option<i16> {
        self.submap
    }

    /// Current sub-map id, -1 on the overworld
    pub fn current_submap(&self) -> i16 {
        self.submap.unwrap_or(-1)
    }

    /// Player position on the active grid
    pub fn position(&self) -> (i16, i16) {
        match self.submap {
            Some(_) => self.position,
            None => self.overworld,
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    pub fn camera(&self) -> (i16, i16) {
        self.camera
    }

    pub fn player_tex(&self) -> i16 {
        self.player_tex
    }

    pub fn overworld_music(&self) -> i16 {
        self.overworld_music
    }

    pub fn set_overworld_music(&mut self, music: i16) {
        self.overworld_music = music;
    }

    /// Cell directly in front of the player
    pub fn front_cell(&self) -> (i16, i16) {
        let (x, y) = self.position();
        let (dx, dy) = self.facing.offset();
        (x.saturating_add(dx), y.saturating_add(dy))
    }

    fn in_bounds(&self, x: i16, y: i16) -> bool {
        match self.submap {
            Some(_) => LayerGrid::in_bounds(x, y),
            None => (0..OVERWORLD_SIZE).contains(&x) && (0..OVERWORLD_SIZE).contains(&y),
        }
    }

    /// Place the player on the active grid; out-of-range positions are ignored
    pub fn set_position(&mut self, x: i16, y: i16) -> bool {
        if !self.in_bounds(x, y) {
            debug!("set_position ({}, {}) out of bounds", x, y);
            return false;
        }
        match self.submap {
            Some(_) => self.position = (x, y),
            None => self.overworld = (x, y),
        }
        self.camera = (x, y);
        true
    }

    /// Whether the player may move onto a cell of the active grid
    pub fn is_passable(&self, save: &SaveData, x: i16, y: i16) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let submap = match self.submap {
            Some(s) => s,
            None => return true,
        };
        let grid = match save.layer(submap) {
            Some(g) => g,
            None => return false,
        };
        if grid.get(Layer::Building, x, y).unwrap_or(0) > 0 {
            return false;
        }
        match grid.event_at(x, y).and_then(|e| save.event(submap, e)) {
            Some(event) => !event.is_blocking(),
            None => true,
        }
    }

    /// Whether the team satisfies a sub-map's entry rule
    pub fn can_enter(save: &SaveData, submap: i16) -> bool {
        let info = match save.submaps.get(submap) {
            Some(info) => info,
            None => return false,
        };
        match info.entry_rule() {
            EntryRule::Open => true,
            EntryRule::Locked => false,
            EntryRule::NeedsSpeed(speed) => save
                .base
                .team_members()
                .filter_map(|r| save.roles.get(r))
                .any(|r| r.speed >= speed),
        }
    }

    /// Enter a sub-map at its entry cell. Returns false when the entry rule refuses.
    pub fn enter_submap(&mut self, save: &SaveData, submap: i16) -> bool {
        if !Self::can_enter(save, submap) {
            debug!("Entry to sub-map {} refused", submap);
            return false;
        }
        let entry = match save.submaps.get(submap) {
            Some(info) => (info.entry_x, info.entry_y),
            None => return false,
        };
        self.submap = Some(submap);
        self.position = entry;
        self.camera = entry;
        self.path.clear();
        self.animation = None;
        info!("Entered sub-map {} at {:?}", submap, entry);
        true
    }

    /// Return to the overworld at the sub-map's main entrance
    pub fn leave_submap(&mut self, save: &SaveData) {
        let Some(submap) = self.submap.take() else {
            return;
        };
        if let Some(info) = save.submaps.get(submap) {
            if info.main_entry_x1 > 0 || info.main_entry_y1 > 0 {
                self.overworld = (info.main_entry_x1, info.main_entry_y1);
            }
        }
        self.camera = self.overworld;
        self.path.clear();
        self.animation = None;
        info!("Left sub-map {} for overworld {:?}", submap, self.overworld);
    }

    /// Sub-map whose overworld entrance is at `(x, y)`
    pub fn entrance_at(save: &SaveData, x: i16, y: i16) -> Option<i16> {
        save.submaps
            .iter()
            .find(|s| {
                (s.main_entry_x1 == x && s.main_entry_y1 == y)
                    || (s.main_entry_x2 == x && s.main_entry_y2 == y)
            })
            .filter(|s| x > 0 || y > 0)
            .map(|s| s.id)
    }

    pub fn queue_refresh(&mut self, submap: i16, x: i16, y: i16) {
        let cell = CellRef { submap, x, y };
        if !self.refresh.contains(&cell) {
            self.refresh.push_back(cell);
        }
    }

    pub fn pending_refresh(&self) -> impl Iterator<Item = &CellRef> {
        self.refresh.iter()
    }

    /// Hand the queued cells to the renderer
    pub fn drain_refresh(&mut self) -> Vec<CellRef> {
        self.refresh.drain(..).collect()
    }

    /// Set one layer cell and queue its redraw
    pub fn set_cell(
        &mut self,
        save: &mut SaveData,
        submap: i16,
        layer: Layer,
        x: i16,
        y: i16,
        value: i16,
    ) -> bool {
        let changed = match save.layer_mut(submap) {
            Some(grid) => grid.set(layer, x, y, value),
            None => false,
        };
        if changed {
            self.queue_refresh(submap, x, y);
        }
        changed
    }

    /// Replace a texture over a whole layer, queueing every touched cell
    pub fn replace_layer_tex(
        &mut self,
        save: &mut SaveData,
        submap: i16,
        layer: Layer,
        old: i16,
        new: i16,
    ) -> usize {
        let touched = match save.layer_mut(submap) {
            Some(grid) => grid.replace_all(layer, old, new),
            None => return 0,
        };
        for &(x, y) in &touched {
            self.queue_refresh(submap, x, y);
        }
        touched.len()
    }

    /// Move an event object to a new cell, keeping the event layer in sync.
    /// Both the old and the new cell are queued for redraw.
    pub fn move_event(&mut self, save: &mut SaveData, submap: i16, event: i16, x: i16, y: i16) {
        let (old_x, old_y) = match save.event(submap, event) {
            Some(e) => (e.x, e.y),
            None => return,
        };
        if let Some(grid) = save.layer_mut(submap) {
            if grid.event_at(old_x, old_y) == Some(event) {
                grid.set(Layer::Event, old_x, old_y, -1);
            }
            grid.set(Layer::Event, x, y, event);
        }
        if let Some(e) = save.event_mut(submap, event) {
            e.x = x;
            e.y = y;
        }
        self.queue_refresh(submap, old_x, old_y);
        self.queue_refresh(submap, x, y);
    }

    /// Queue the cell an event object sits on
    pub fn refresh_event(&mut self, save: &SaveData, submap: i16, event: i16) {
        if let Some(e) = save.event(submap, event) {
            let (x, y) = (e.x, e.y);
            self.queue_refresh(submap, x, y);
        }
    }

    /// Start a scripted path from `from` to `to`. When `moves_player` is set the player
    /// walks it; otherwise only the camera pans. Returns the number of cells to travel.
    pub fn start_path(&mut self, from: (i16, i16), to: (i16, i16), moves_player: bool) -> usize {
        self.path = build_path(from, to);
        self.path_moves_player = moves_player;
        self.camera = from;
        if moves_player {
            self.set_position(from.0, from.1);
        }
        self.path.len()
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Advance one cell along the scripted path. Returns true once the path is exhausted.
    pub fn step_path(&mut self) -> bool {
        if let Some(next) = self.path.pop_front() {
            if self.path_moves_player {
                if let Some(dir) = Direction::between(self.position(), next) {
                    self.facing = dir;
                }
                self.set_position(next.0, next.1);
            }
            self.camera = next;
        }
        self.path.is_empty()
    }

    pub fn start_animation(&mut self, job: AnimationJob) {
        self.animation = Some(job);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Write the next texture of every track. Returns true once the job has finished.
    pub fn step_animation(&mut self, save: &mut SaveData) -> bool {
        let Some(mut job) = self.animation.take() else {
            return true;
        };
        for track in job.tracks.iter_mut() {
            match track.target {
                AnimTarget::Player => self.player_tex = track.tex,
                AnimTarget::Event(event) => {
                    if let Some(e) = save.event_mut(job.submap, event) {
                        e.curr_tex = track.tex;
                        let (x, y) = (e.x, e.y);
                        self.queue_refresh(job.submap, x, y);
                    }
                }
            }
            track.tex = track.tex.saturating_add(job.step);
        }
        job.remaining = job.remaining.saturating_sub(1);
        if job.remaining > 0 {
            self.animation = Some(job);
            false
        } else {
            true
        }
    }

    /// Advance idle texture loops of the current sub-map's event objects by one frame.
    /// Objects driven by a scripted animation are left alone.
    pub fn tick_ambient(&mut self, save: &mut SaveData) {
        self.frame += 1;
        let Some(submap) = self.submap else {
            return;
        };
        let frame = self.frame;
        let animation = self.animation.as_ref();
        let mut touched = Vec::new();
        if let Some(table) = save.event_table_mut(submap) {
            for (id, event) in table.iter_mut() {
                if !event.has_ambient_animation() {
                    continue;
                }
                if animation.is_some_and(|job| job.submap == submap && job.drives(id)) {
                    continue;
                }
                let delay = event.tex_delay.max(1) as u64;
                if frame % delay != 0 {
                    continue;
                }
                event.curr_tex = if event.curr_tex < event.beg_tex || event.curr_tex >= event.end_tex {
                    event.beg_tex
                } else {
                    event.curr_tex + 1
                };
                touched.push((event.x, event.y));
            }
        }
        for (x, y) in touched {
            self.queue_refresh(submap, x, y);
        }
    }
}

/// Cells from `from` to `to` moving along x first, then y. The start cell is excluded,
/// the end cell included.
pub fn build_path(from: (i16, i16), to: (i16, i16)) -> VecDeque<(i16, i16)> {
    let mut path = VecDeque::new();
    let (mut x, mut y) = from;
    while x != to.0 {
        x += (to.0 as i32 - x as i32).signum() as i16;
        path.push_back((x, y));
    }
    while y != to.1 {
        y += (to.1 as i32 - y as i32).signum() as i16;
        path.push_back((x, y));
    }
    path
}
