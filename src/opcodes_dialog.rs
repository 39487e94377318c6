/// Dialog operations: talk boxes, notices and yes/no prompts
///
/// Every opcode here hands something to the frontend and pauses. Prompts are condition
/// opcodes whose outcome arrives with `continue_events`.
use crate::interpreter::{Interpreter, OpResult};
use log::debug;

/// First talk entry of the tutorial tips
pub const TUTORIAL_TALK_FIRST: i16 = 2547;
/// Number of tutorial tips, talks 2547..=2564
pub const TUTORIAL_TALK_COUNT: i16 = 18;
/// Portrait shown with tutorial tips
pub const TUTORIAL_HEAD: i16 = 112;

impl Interpreter {
    pub(crate) fn op_talk(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.show_talk(args[0], args[1], args[2])
    }

    pub(crate) fn op_tutorial_talk(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let pick = self.ctx.rand.below(TUTORIAL_TALK_COUNT as i32) as i16;
        debug!("tutorial tip {}", pick);
        self.show_talk(TUTORIAL_TALK_FIRST + pick, TUTORIAL_HEAD, 0)
    }

    pub(crate) fn op_show_integrity(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        match self.ctx.save.roles.get(self.lead_role()) {
            Some(role) => {
                let line = format!("Integrity: {}", role.integrity);
                self.notice(vec![line])
            }
            None => Ok(OpResult::Continue),
        }
    }

    pub(crate) fn op_show_reputation(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        match self.ctx.save.roles.get(self.lead_role()) {
            Some(role) => {
                let line = format!("Reputation: {}", role.reputation);
                self.notice(vec![line])
            }
            None => Ok(OpResult::Continue),
        }
    }

    pub(crate) fn op_ask_battle(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ask("Do you want to fight?")
    }

    pub(crate) fn op_ask_join(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ask("Do you want them to join you?")
    }

    pub(crate) fn op_ask_rest(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ask("Do you want to rest?")
    }
}
