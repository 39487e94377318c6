/// Sub-map and event-object operations
///
/// Sub-map and event arguments of -1 mean the current sub-map and the event object
/// that triggered the script. Every visible change queues the touched cells for redraw.
use crate::interpreter::{Interpreter, OpResult};
use crate::records::Layer;
use crate::sentinel::{Patch, Target};
use crate::world::Direction;
use log::{debug, warn};

/// Event id of the first of the book stands
pub const BOOK_STAND_FIRST: i16 = 11;
/// Number of book stands
pub const BOOK_STANDS: i16 = 14;
/// Texture a stand shows once its book is placed
pub const BOOK_PLACED_TEX: i16 = 4664;

impl Interpreter {
    /// Patch an event object. Arguments: sub-map, event, blocked, index, three script ids,
    /// current/end/begin texture, texture delay, x, y. -2 leaves a field unchanged.
    pub(crate) fn op_modify_event(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.resolve_submap(args[0]);
        let event = self.resolve_event(args[1]);
        let ctx = &mut self.ctx;
        let Some(obj) = ctx.save.event_mut(submap, event) else {
            warn!("modify_event: no event {} in sub-map {}", event, submap);
            return Ok(OpResult::Continue);
        };

        Patch::from_raw(args[2]).apply(&mut obj.blocked);
        Patch::from_raw(args[3]).apply(&mut obj.index);
        for (script, &raw) in obj.scripts.iter_mut().zip(&args[4..7]) {
            Patch::from_raw(raw).apply(script);
        }
        Patch::from_raw(args[7]).apply(&mut obj.curr_tex);
        Patch::from_raw(args[8]).apply(&mut obj.end_tex);
        Patch::from_raw(args[9]).apply(&mut obj.beg_tex);
        Patch::from_raw(args[10]).apply(&mut obj.tex_delay);

        // Any negative coordinate keeps the current one
        let (old_x, old_y) = (obj.x, obj.y);
        let x = Target::from_raw(args[11]).resolve(old_x);
        let y = Target::from_raw(args[12]).resolve(old_y);

        if (x, y) != (old_x, old_y) {
            ctx.world.move_event(&mut ctx.save, submap, event, x, y);
        } else {
            ctx.world.queue_refresh(submap, x, y);
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_set_layer_cell(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.resolve_submap(args[0]);
        let Some(layer) = Layer::from_index(args[1]) else {
            warn!("set_layer_cell: no layer {}", args[1]);
            return Ok(OpResult::Continue);
        };
        let ctx = &mut self.ctx;
        ctx.world
            .set_cell(&mut ctx.save, submap, layer, args[2], args[3], args[4]);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_replace_layer_tex(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.resolve_submap(args[0]);
        let Some(layer) = Layer::from_index(args[1]) else {
            warn!("replace_layer_tex: no layer {}", args[1]);
            return Ok(OpResult::Continue);
        };
        let ctx = &mut self.ctx;
        let replaced = ctx
            .world
            .replace_layer_tex(&mut ctx.save, submap, layer, args[2], args[3]);
        debug!("replace_layer_tex: {} cells", replaced);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_set_position(&mut self, args: &[i16]) -> Result<OpResult, String> {
        self.ctx.world.set_position(args[0], args[1]);
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_set_facing(&mut self, args: &[i16]) -> Result<OpResult, String> {
        match Direction::from_raw(args[0]) {
            Some(dir) => self.ctx.world.set_facing(dir),
            None => warn!("set_facing: no direction {}", args[0]),
        }
        Ok(OpResult::Continue)
    }

    /// Add to the three script ids of an event object
    pub(crate) fn op_add_event_scripts(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.resolve_submap(args[0]);
        let event = self.resolve_event(args[1]);
        match self.ctx.save.event_mut(submap, event) {
            Some(obj) => {
                for (script, &delta) in obj.scripts.iter_mut().zip(&args[2..5]) {
                    *script = script.wrapping_add(delta);
                }
            }
            None => warn!("add_event_scripts: no event {} in sub-map {}", event, submap),
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_open_submap(&mut self, args: &[i16]) -> Result<OpResult, String> {
        match self.ctx.save.submaps.get_mut(args[0]) {
            Some(info) => info.enter_condition = 0,
            None => warn!("open_submap: no sub-map {}", args[0]),
        }
        Ok(OpResult::Continue)
    }

    pub(crate) fn op_open_all_submaps(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        for info in self.ctx.save.submaps.iter_mut() {
            info.enter_condition = 0;
        }
        Ok(OpResult::Continue)
    }

    /// Compare the interact script of an event object in the current sub-map
    pub(crate) fn op_check_event_flag(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.ctx.world.current_submap();
        let event = self.resolve_event(args[0]);
        Ok(OpResult::Branch(
            self.ctx
                .save
                .event(submap, event)
                .is_some_and(|e| e.scripts[0] == args[1]),
        ))
    }

    pub(crate) fn op_check_event_tex(&mut self, args: &[i16]) -> Result<OpResult, String> {
        let submap = self.resolve_submap(args[0]);
        let event = self.resolve_event(args[1]);
        Ok(OpResult::Branch(
            self.ctx
                .save
                .event(submap, event)
                .is_some_and(|e| e.curr_tex == args[2]),
        ))
    }

    /// True when every book stand in the current sub-map shows a placed book
    pub(crate) fn op_books_placed(&mut self, _args: &[i16]) -> Result<OpResult, String> {
        let submap = self.ctx.world.current_submap();
        let save = &self.ctx.save;
        Ok(OpResult::Branch(
            (BOOK_STAND_FIRST..BOOK_STAND_FIRST + BOOK_STANDS).all(|event| {
                save.event(submap, event)
                    .is_some_and(|e| e.curr_tex == BOOK_PLACED_TEX)
            }),
        ))
    }
}
