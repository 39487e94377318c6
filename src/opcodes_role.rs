/// Character operations
///
/// Stat changes, skills, and the attribute checks scripts branch on. Role ids outside
/// the roster make plain opcodes do nothing and condition opcodes take the false branch.
use crate::action::{self, add_stat, Learned, Stat};
use crate::interpreter::{Interpreter, OpResult};
use log::{debug, warn};

impl Interpreter {
    /// Raise a stat and tell the player how much it actually changed
    fn raise_stat(&mut self, role: i16, stat: Stat, delta: i16) -> Result<OpResult, String> {
        let Some(r) = self.ctx.save.roles.get_mut(role) else {
            warn!("{:?} change skipped: no role {}", stat, role);
            return Ok(OpResult::Continue);
        };
        let applied = add_stat(r, stat, delta);
        let line = format!("{} {} +{}", r.name(), stat.label(), applied);
        self.notice(vec![line])
    }

    /// Change a stat of the protagonist without a notice
    fn adjust_lead_stat(&mut self, stat: Stat, delta: i16) -> Result<OpResult, String> {
        let lead = self.lead_role();
        match self.ctx.save.roles.get_mut(lead) {
            Some(r) => {
                let applied = add_stat(r, stat, delta);
                debug!("{:?} of role {} changed by {}", stat, lead, applied);
            }
            None => warn!("{:?} change skipped: empty team", stat),
        }
        Ok(OpResult::Continue)
    }

    fn role_check(&self, role: i16, check: impl Fn(&crate::records::Role) -> bool) -> OpResult {
        OpResult::Branch(self.ctx.save.roles.get(role).map(check).unwrap_or(false))
    }

    pub(crate) fn op_add_speed(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.raise_stat(args[0], Stat::Speed, args[1])
    }

    pub(crate) fn op_add_max_mp(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.raise_stat(args[0], Stat::MaxMp, args[1])
    }

    pub(crate) fn op_add_attack(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.raise_stat(args[0], Stat::Attack, args[1])
    }

    pub(crate) fn op_add_max_hp(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.raise_stat(args[0], Stat::MaxHp, args[1])
    }

    pub(crate) fn op_add_potential(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.raise_stat(args[0], Stat::Potential, args[1])
    }

    pub(crate) fn op_add_integrity(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.adjust_lead_stat(Stat::Integrity, args[0])
    }

    pub(crate) fn op_add_reputation(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.adjust_lead_stat(Stat::Reputation, args[0])
    }

    pub(crate) fn op_set_poison_skill(&mut self, args: &[i16]) -> Result<OpResult, String> {
        if let Some(r) = self.ctx.save.roles.get_mut(args[0]) {
            r.poison = args[1].max(0);
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_set_mp_type(&mut self, args: &[i16]) -> Result<OpResult, String> {
        if let Some(r) = self.ctx.save.roles.get_mut(args[0]) {
            r.mp_type = args[1];
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_set_sex(&mut self, args: &[i16]) -> Result<OpResult, String> {
        if let Some(r) = self.ctx.save.roles.get_mut(args[0]) {
            r.sex = args[1];
        }
        Ok(OpResult::Continue)
    }

    /// Teach a skill; the third argument suppresses the notice when non-zero
    pub(crate) fn op_learn_skill(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let (role, skill, silent) = (args[0], args[1], args[2] != 0);
        let skill_name = match self.ctx.save.skills.get(skill) {
            Some(s) if skill > 0 => s.name(),
            _ => {
                warn!("learn_skill: no skill {}", skill);
                return Ok(OpResult::Continue);
            }
        };
        let Some(r) = self.ctx.save.roles.get_mut(role) else {
            warn!("learn_skill: no role {}", role);
            return Ok(OpResult::Continue);
        };
        let line = match action::learn_skill(r, skill) {
            Learned::New(_) => format!("{} learned {}", r.name(), skill_name),
            Learned::Improved(_) => format!("{} improved {}", r.name(), skill_name),
            Learned::NoSlot => {
                warn!("learn_skill: role {} has no free skill slot", role);
                return Ok(OpResult::Continue);
            }
        };
        if silent {
            Ok(OpResult::Continue)
        } else {
            self.notice(vec![line])
        }
    }

    pub(crate) fn op_set_skill(&mut self, args: &[i16]) -> Result<OpResult, String> {
        if let Some(r) = self.ctx.save.roles.get_mut(args[0]) {
            if !action::set_skill(r, args[1], args[2], args[3]) {
                warn!("set_skill: slot {} out of range", args[1]);
            }
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_check_sex(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let sex = args[0];
        Ok(self.role_check(self.lead_role(), |r| r.sex == sex))
    }

    pub(crate) fn op_check_integrity(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let (lo, hi) = (args[1], args[2]);
        Ok(self.role_check(args[0], |r| (lo..=hi).contains(&r.integrity)))
    }

    /// The upper bound argument is ignored; only the minimum matters
    pub(crate) fn op_check_attack(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let lo = args[1];
        Ok(self.role_check(args[0], |r| r.attack >= lo))
    }
}
