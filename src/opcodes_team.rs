/// Team roster operations
///
/// Joining, leaving and disbanding keep the roster compact: members fill slots from
/// the front and empty slots are -1. Slot 0 is the protagonist.
use crate::action;
use crate::interpreter::{Interpreter, OpResult, ScriptStep};
use crate::records::role::CARRY_SLOTS;
use crate::records::TEAM_SLOTS;
use log::{info, warn};

impl Interpreter {
    /// Add a role to the first empty slot. Items the role carries move to the bag, each
    /// with its own notice.
    pub(crate) fn op_join(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let role = args[0];
        if self.ctx.save.roles.get(role).is_none() {
            warn!("join: no role {}", role);
            return Ok(OpResult::Continue);
        }
        if self.ctx.save.team_slot(role).is_some() {
            return Ok(OpResult::Continue);
        }
        let team = &mut self.ctx.save.base.team;
        let Some(slot) = team.iter().position(|&r| r < 0) else {
            warn!("join: team full, role {} not added", role);
            return Ok(OpResult::Continue);
        };
        team[slot] = role;
        info!("Role {} joined the team in slot {}", role, slot);

        if let Some(r) = self.ctx.save.roles.get_mut(role) {
            let carried = r.carried();
            r.carry_items = [-1; CARRY_SLOTS];
            r.carry_counts = [0; CARRY_SLOTS];
            for (item, count) in carried {
                self.queue_step(ScriptStep::AddItem {
                    item,
                    count,
                    notify: true,
                });
            }
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_leave_team(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let role = args[0];
        let Some(slot) = self.ctx.save.team_slot(role) else {
            warn!("leave_team: role {} is not in the team", role);
            return Ok(OpResult::Continue);
        };
        let team = &mut self.ctx.save.base.team;
        team.copy_within(slot + 1.., slot);
        team[TEAM_SLOTS - 1] = -1;
        info!("Role {} left the team", role);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_disband(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let team = &mut self.ctx.save.base.team;
        for member in team.iter_mut().skip(1) {
            *member = -1;
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_in_team(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Branch(self.ctx.save.team_slot(args[0]).is_some()))
    }

    pub(crate) fn op_team_full(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Branch(
            self.ctx.save.base.team.iter().all(|&r| r >= 0),
        ))
    }

    pub(crate) fn op_female_in_team(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let save = &self.ctx.save;
        Ok(OpResult::Branch(
            save.base
                .team_members()
                .filter_map(|r| save.roles.get(r))
                .any(|r| r.is_female()),
        ))
    }

    pub(crate) fn op_rest(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let save = &mut self.ctx.save;
        let members: Vec<i16> = save.base.team_members().collect();
        for id in members {
            if let Some(role) = save.roles.get_mut(id) {
                action::rest(role);
            }
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_zero_team_mp(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let save = &mut self.ctx.save;
        let members: Vec<i16> = save.base.team_members().collect();
        for id in members {
            if let Some(role) = save.roles.get_mut(id) {
                role.mp = 0;
            }
        }
        Ok(OpResult::Continue)
    }
}
