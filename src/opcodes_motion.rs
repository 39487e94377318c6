/// Camera, walking and animation operations
///
/// These start frame-driven work in the world and pause the script until `tick` has
/// played it out. Nothing here waits on the frontend.
use crate::interpreter::{Interpreter, OpResult, PauseReason, ScriptStep};
use crate::world::{AnimTarget, AnimationJob};
use log::warn;

/// Event id of the gate broken open by `break_gate`
pub const GATE_EVENT: i16 = 3;
/// Textures the gate runs through while breaking
pub const GATE_FRAMES: i16 = 8;

impl Interpreter {
    fn follow_path(&mut self, args: &[i16], moves_player: bool) -> OpResult {
        let cells = self
            .ctx
            .world
            .start_path((args[0], args[1]), (args[2], args[3]), moves_player);
        if cells == 0 {
            OpResult::Continue
        } else {
            OpResult::Pause(PauseReason::Path)
        }
    }

    /// Pan the camera from (x1, y1) to (x2, y2)
    pub(crate) fn op_pan_camera(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(self.follow_path(args, false))
    }

    /// Walk the player from (x1, y1) to (x2, y2) with the camera following
    pub(crate) fn op_walk(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(self.follow_path(args, true))
    }

    /// Whether an animation target exists in the current sub-map
    fn can_animate(&self, target: AnimTarget) -> bool {
        match target {
            AnimTarget::Player => true,
            AnimTarget::Event(event) => self
                .ctx
                .save
                .event(self.ctx.world.current_submap(), event)
                .is_some(),
        }
    }

    /// Play one object's textures from the first to the last given.
    /// A negative event id animates the player.
    pub(crate) fn op_animate(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let target = AnimTarget::from_raw(args[0]);
        if !self.can_animate(target) {
            warn!("animate: no event {} in the current sub-map", args[0]);
            return Ok(OpResult::Continue);
        }
        let submap = self.ctx.world.current_submap();
        self.ctx
            .world
            .start_animation(AnimationJob::new(submap, target, args[1], args[2]));
        Ok(OpResult::Pause(PauseReason::Animation))
    }

    /// Play three objects together. The first sets the length; the others start at
    /// their own first texture and advance in step.
    pub(crate) fn op_animate3(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let targets = [
            AnimTarget::from_raw(args[0]),
            AnimTarget::from_raw(args[3]),
            AnimTarget::from_raw(args[5]),
        ];
        if !targets.iter().all(|&t| self.can_animate(t)) {
            warn!("animate3: missing event among {:?}", targets);
            return Ok(OpResult::Continue);
        }
        let submap = self.ctx.world.current_submap();
        let job = AnimationJob::new(submap, targets[0], args[1], args[2])
            .with_track(targets[1], args[4])
            .with_track(targets[2], args[6]);
        self.ctx.world.start_animation(job);
        Ok(OpResult::Pause(PauseReason::Animation))
    }

    /// Animate the gate of the current sub-map breaking, then clear it from the path
    pub(crate) fn op_break_gate(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let submap = self.ctx.world.current_submap();
        let Some(gate) = self.ctx.save.event(submap, GATE_EVENT) else {
            warn!("break_gate: no gate in sub-map {}", submap);
            return Ok(OpResult::Continue);
        };
        let first = gate.curr_tex;
        self.queue_step(ScriptStep::Animate(AnimationJob::new(
            submap,
            AnimTarget::Event(GATE_EVENT),
            first,
            first.saturating_add(GATE_FRAMES),
        )));
        self.queue_step(ScriptStep::SetBlocked {
            submap,
            event: GATE_EVENT,
            blocked: 0,
        });
        Ok(OpResult::Continue)
    }
}
