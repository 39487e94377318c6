/// Script control flow operations
///
/// This module handles opcodes that end or steer a script without touching game data:
/// - Script termination (exit, break, game_over, ending)
/// - Popup housekeeping (redraw)
/// - The trigger check that inspects how the script was started (is_using_item)
use crate::interpreter::{Interpreter, OpResult};
use log::info;

impl Interpreter {
    pub(crate) fn op_exit(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.exit_script()?;
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_redraw(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ctx.frontend.close_popup()?;
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_nop(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_game_over(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        info!("Game over from script {}", self.script_id());
        self.ctx.frontend.game_over(false)?;
        self.exit_script()?;
        Ok(OpResult::Continue)
    }

    /// The six arguments select ending artwork, which the frontend does not take
    pub(crate) fn op_ending(&mut self, args: &[i16]) -> Result<OpResult, String> {
        info!("Ending reached from script {} ({:?})", self.script_id(), args);
        self.ctx.frontend.fade_out()?;
        self.ctx.frontend.game_over(true)?;
        self.exit_script()?;
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_is_using_item(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Branch(self.last_item() == Some(args[0])))
    }
}
