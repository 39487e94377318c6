/// Battles, shops, fades, music and the tournament
///
/// The battle opcode is a condition decided by the frontend: it always pauses and the
/// battle outcome picks the jump on resume.
use crate::interpreter::{Interpreter, OpResult, PauseReason, ScriptStep};
use log::{debug, info};

/// Challengers fought in one tournament
pub const TOURNAMENT_ROUNDS: i16 = 5;
/// Portraits a challenger may be drawn from
pub const TOURNAMENT_HEADS: [i16; 10] = [8, 21, 23, 31, 32, 43, 7, 11, 14, 20];
/// Event id that stands in for the current challenger
pub const TOURNAMENT_CHALLENGER_EVENT: i16 = 2;
/// Range of challenger pose textures
pub const TOURNAMENT_POSES: (i16, i16) = (2967, 2985);
pub const TOURNAMENT_TALK_FIRST: i16 = 2854;
pub const TOURNAMENT_BATTLE_FIRST: i16 = 102;
pub const TOURNAMENT_VICTORY_TALK: i16 = 2891;
pub const TOURNAMENT_HOST_HEAD: i16 = 70;

/// Shop sites as (sub-map, shopkeeper event); the index is the shop id
pub const SHOP_SITES: [(i16, i16); 5] = [(1, 16), (3, 14), (40, 20), (60, 16), (61, 9)];
/// Texture of a shopkeeper standing at his post
pub const SHOPKEEPER_TEX: i16 = 8256;

impl Interpreter {
    /// Arguments: battle id, win jump, loss jump, whether experience is granted on a loss
    pub(crate) fn op_battle(&mut self, args: &[i16]) -> Result<OpResult, String> {
        info!("Battle {} from script {}", args[0], self.script_id());
        self.ctx.frontend.enter_battle(args[0], args[3] != 0)?;
        Ok(OpResult::Deferred)
    }

    pub(crate) fn op_fade_in(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ctx.frontend.fade_in()?;
        Ok(OpResult::Pause(PauseReason::Frontend))
    }

    pub(crate) fn op_fade_out(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        self.ctx.frontend.fade_out()?;
        Ok(OpResult::Pause(PauseReason::Frontend))
    }

    pub(crate) fn op_overworld_music(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.ctx.world.set_overworld_music(args[0]);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_play_music(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.ctx.frontend.play_music(args[0])?;
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_play_sound(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.ctx.frontend.play_sound(args[0])?;
        Ok(OpResult::Continue)
    }

    /// Queue the whole tournament: each round a random challenger appears, speaks and
    /// fights. Losing any round ends the script.
    pub(crate) fn op_tournament(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let submap = self.ctx.world.current_submap();
        let mut heads = TOURNAMENT_HEADS.to_vec();
        for round in 0..TOURNAMENT_ROUNDS {
            let pick = self.ctx.rand.below(heads.len() as i32) as usize;
            let head = heads.swap_remove(pick);
            let pose = self
                .ctx
                .rand
                .between(TOURNAMENT_POSES.0 as i32, TOURNAMENT_POSES.1 as i32) as i16;
            debug!("tournament round {}: head {} pose {}", round, head, pose);
            self.queue_step(ScriptStep::SetEventTex {
                submap,
                event: TOURNAMENT_CHALLENGER_EVENT,
                tex: pose,
            });
            self.queue_step(ScriptStep::Talk {
                talk_id: TOURNAMENT_TALK_FIRST + round,
                head_id: head,
                style: 0,
            });
            self.queue_step(ScriptStep::Battle {
                battle_id: TOURNAMENT_BATTLE_FIRST + round,
                grants_exp: false,
                abort_on_loss: true,
            });
            self.queue_step(ScriptStep::SetEventTex {
                submap,
                event: TOURNAMENT_CHALLENGER_EVENT,
                tex: 0,
            });
        }
        self.queue_step(ScriptStep::Talk {
            talk_id: TOURNAMENT_VICTORY_TALK,
            head_id: TOURNAMENT_HOST_HEAD,
            style: 0,
        });
        Ok(OpResult::Continue)
    }

    /// Open the shop of the current sub-map; sub-maps without a shop do nothing
    pub(crate) fn op_shop(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let submap = self.ctx.world.current_submap();
        match SHOP_SITES.iter().position(|&(s, _)| s == submap) {
            Some(shop) => {
                self.ctx.frontend.open_shop(shop as i16)?;
                Ok(OpResult::Pause(PauseReason::Frontend))
            }
            None => {
                debug!("shop: sub-map {} has no shop", submap);
                Ok(OpResult::Continue)
            }
        }
    }

    /// Move the shopkeeper to a random site: the chosen site's keeper stands at his post
    /// and blocks it, every other site is left empty
    pub(crate) fn op_reroll_shop(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let chosen = self.ctx.rand.below(SHOP_SITES.len() as i32) as usize;
        info!("Shopkeeper moves to site {}", chosen);
        let ctx = &mut self.ctx;
        for (i, &(submap, event)) in SHOP_SITES.iter().enumerate() {
            if let Some(e) = ctx.save.event_mut(submap, event) {
                let here = i == chosen;
                e.blocked = here as i16;
                e.curr_tex = if here { SHOPKEEPER_TEX } else { 0 };
                ctx.world.refresh_event(&ctx.save, submap, event);
            }
        }
        Ok(OpResult::Continue)
    }
}
