//! Per-frame driver around the interpreter
//!
//! Turns player input into movement and script triggers, and ticks frame-driven work.
//! Input is ignored while a script is active.

use crate::frontend::Frontend;
use crate::interpreter::{EngineContext, EventSource, Interpreter, ScriptState};
use crate::world::{Direction, World};
use log::{debug, info};

/// How a script was triggered; the value is the event object's script slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Talking to or examining the object in front of the player
    Interact,
    /// Using an item on the object in front of the player
    UseItem(i16),
    /// Stepping onto the object's cell
    Step,
}

impl Trigger {
    pub fn slot(self) -> usize {
        match self {
            Trigger::Interact => 0,
            Trigger::UseItem(_) => 1,
            Trigger::Step => 2,
        }
    }
}

/// Outcome of a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Blocked,
    /// A script is active; input ignored
    Busy,
    EnteredSubmap(i16),
    LeftSubmap,
}

pub struct MapDriver {
    pub interpreter: Interpreter,
}

impl MapDriver {
    pub fn new(ctx: EngineContext) -> Self {
        MapDriver {
            interpreter: Interpreter::new(ctx),
        }
    }

    pub fn state(&self) -> ScriptState {
        self.interpreter.state()
    }

    pub fn world(&self) -> &World {
        &self.interpreter.ctx.world
    }

    fn frontend(&mut self) -> &mut dyn Frontend {
        self.interpreter.ctx.frontend.as_mut()
    }

    /// Face `dir` and try to move one cell. Moving onto an event object runs its
    /// step script; moving onto an exit or entrance changes sub-map.
    pub fn step(&mut self, dir: Direction) -> Result<StepOutcome, String> {
        if !self.interpreter.is_idle() {
            return Ok(StepOutcome::Busy);
        }
        let ctx = &mut self.interpreter.ctx;
        ctx.world.set_facing(dir);
        let (x, y) = ctx.world.front_cell();
        if !ctx.world.is_passable(&ctx.save, x, y) {
            debug!("Move to ({}, {}) blocked", x, y);
            return Ok(StepOutcome::Blocked);
        }
        ctx.world.set_position(x, y);

        match ctx.world.submap() {
            None => {
                if let Some(submap) = World::entrance_at(&ctx.save, x, y) {
                    if self.enter_submap(submap)? {
                        return Ok(StepOutcome::EnteredSubmap(submap));
                    }
                }
                Ok(StepOutcome::Moved)
            }
            Some(submap) => {
                let is_exit = ctx
                    .save
                    .submaps
                    .get(submap)
                    .is_some_and(|info| info.is_exit(x, y));
                if is_exit {
                    self.leave_submap()?;
                    return Ok(StepOutcome::LeftSubmap);
                }
                self.trigger_at(x, y, Trigger::Step)?;
                Ok(StepOutcome::Moved)
            }
        }
    }

    /// Run the interact script of the object in front of the player
    pub fn interact(&mut self) -> Result<bool, String> {
        let (x, y) = self.interpreter.ctx.world.front_cell();
        self.trigger_at(x, y, Trigger::Interact)
    }

    /// Use an item on the object in front of the player
    pub fn use_item(&mut self, item: i16) -> Result<bool, String> {
        let (x, y) = self.interpreter.ctx.world.front_cell();
        self.trigger_at(x, y, Trigger::UseItem(item))
    }

    /// Run the script an event object at `(x, y)` links to the trigger. Returns whether
    /// a script was started.
    pub fn trigger_at(&mut self, x: i16, y: i16, trigger: Trigger) -> Result<bool, String> {
        if !self.interpreter.is_idle() {
            return Ok(false);
        }
        let ctx = &self.interpreter.ctx;
        let Some(submap) = ctx.world.submap() else {
            return Ok(false);
        };
        let Some(event) = ctx.save.layer(submap).and_then(|g| g.event_at(x, y)) else {
            return Ok(false);
        };
        let Some(script) = ctx
            .save
            .event(submap, event)
            .and_then(|e| e.script(trigger.slot()))
        else {
            return Ok(false);
        };
        let item = match trigger {
            Trigger::UseItem(item) => Some(item),
            _ => None,
        };
        debug!(
            "{:?} on event {} at ({}, {}) runs script {}",
            trigger, event, x, y, script
        );
        self.interpreter.run_event_from(
            script,
            EventSource {
                event: Some(event),
                item,
            },
        )?;
        Ok(true)
    }

    /// Enter a sub-map and start its music. Returns false when entry is refused.
    pub fn enter_submap(&mut self, submap: i16) -> Result<bool, String> {
        let ctx = &mut self.interpreter.ctx;
        if !ctx.world.enter_submap(&ctx.save, submap) {
            return Ok(false);
        }
        let music = ctx.save.submaps.get(submap).map(|s| s.entry_music);
        if let Some(music) = music.filter(|&m| m >= 0) {
            self.frontend().play_music(music)?;
        }
        Ok(true)
    }

    /// Return to the overworld and resume its music
    pub fn leave_submap(&mut self) -> Result<(), String> {
        let ctx = &mut self.interpreter.ctx;
        ctx.world.leave_submap(&ctx.save);
        let music = ctx.world.overworld_music();
        info!("Back on the overworld at {:?}", ctx.world.position());
        self.frontend().play_music(music)?;
        Ok(())
    }

    /// Resume a script waiting on the frontend
    pub fn answer(&mut self, result: bool) -> Result<(), String> {
        self.interpreter.continue_events(result)
    }

    /// One frame: scripted path and animation, then ambient texture loops
    pub fn tick(&mut self) -> Result<(), String> {
        self.interpreter.tick()?;
        let ctx = &mut self.interpreter.ctx;
        ctx.world.tick_ambient(&mut ctx.save);
        Ok(())
    }
}
