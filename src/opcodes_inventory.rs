/// Inventory operations
///
/// Bag changes (with or without a notice), item and money checks, and the items a
/// character carries into the team.
use crate::interpreter::{Interpreter, OpResult};
use crate::records::role::CARRY_SLOTS;
use log::warn;

impl Interpreter {
    pub(crate) fn op_add_item(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let (item, count) = (args[0], args[1]);
        if self.ctx.save.items.get(item).is_none() {
            warn!("add_item: no item {}", item);
            return Ok(OpResult::Continue);
        }
        self.ctx.bag.add(item, count as i32);
        let name = self.ctx.item_name(item);
        let line = if count >= 0 {
            format!("Obtained {} x{}", name, count)
        } else {
            format!("Lost {} x{}", name, -count)
        };
        self.notice(vec![line])
    }

    pub(crate) fn op_add_item_silent(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.ctx.bag.add(args[0], args[1] as i32);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_has_item(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Branch(self.ctx.bag.contains(args[0])))
    }

    pub(crate) fn op_has_money(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let money = self.ctx.bag.count(self.ctx.config.money_item);
        Ok(OpResult::Branch(money >= args[0] as i32))
    }

    pub(crate) fn op_has_five_items(&mut self, args: &[i16]) -> Result<OpResult, String> {
        Ok(OpResult::Branch(
            args.iter().all(|&item| self.ctx.bag.contains(item)),
        ))
    }

    /// Give a character items to carry: an existing stack grows, otherwise the first
    /// free carry slot is used
    pub(crate) fn op_role_add_item(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let (role, item, count) = (args[0], args[1], args[2]);
        if self.ctx.save.items.get(item).is_none() {
            warn!("role_add_item: no item {}", item);
            return Ok(OpResult::Continue);
        }
        let Some(r) = self.ctx.save.roles.get_mut(role) else {
            warn!("role_add_item: no role {}", role);
            return Ok(OpResult::Continue);
        };
        let slot = (0..CARRY_SLOTS)
            .find(|&i| r.carry_items[i] == item)
            .or_else(|| (0..CARRY_SLOTS).find(|&i| r.carry_items[i] < 0 || r.carry_counts[i] <= 0));
        match slot {
            Some(i) => {
                let held = if r.carry_items[i] == item { r.carry_counts[i] } else { 0 };
                r.carry_items[i] = item;
                r.carry_counts[i] = held.saturating_add(count).max(0);
                if r.carry_counts[i] == 0 {
                    r.carry_items[i] = -1;
                }
            }
            None => warn!("role_add_item: role {} carries too much", role),
        }
        Ok(OpResult::Continue)
    }
}
