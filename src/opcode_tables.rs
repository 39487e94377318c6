//! Opcode table: number, name, argument count, shape and handler for every event opcode
//!
//! A plain opcode is followed by exactly `arity` arguments. A condition opcode is
//! followed by `arity` arguments and then two jump distances (taken when the condition
//! is true / false), measured from the word after the instruction. The battle opcode
//! keeps its jump pair between the battle id and the experience flag.

use crate::interpreter::{Interpreter, OpResult};
use std::collections::HashMap;

/// Result shape of an opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Plain,
    Condition,
    /// `[id, jump_true, jump_false, flag]`: the jump pair sits inside the arguments
    Battle,
}

pub type Handler = fn(&mut Interpreter, &[i16]) -> Result<OpResult, String>;

/// Everything the dispatcher needs to know about one opcode
#[derive(Clone, Copy)]
pub struct OpcodeSpec {
    pub code: i16,
    pub name: &'static str,
    pub arity: usize,
    pub shape: Shape,
    pub handler: Handler,
}

impl std::fmt::Debug for OpcodeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpcodeSpec")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("arity", &self.arity)
            .field("shape", &self.shape)
            .finish()
    }
}

impl OpcodeSpec {
    /// Words occupied by the whole instruction, opcode included
    pub fn size(&self) -> usize {
        1 + self.arity
            + match self.shape {
                Shape::Plain | Shape::Battle => 0,
                Shape::Condition => 2,
            }
    }
}

macro_rules! op {
    ($code:expr, $name:expr, $arity:expr, $shape:ident, $handler:path) => {
        OpcodeSpec {
            code: $code,
            name: $name,
            arity: $arity,
            shape: Shape::$shape,
            handler: $handler,
        }
    };
}

/// The full opcode set
pub static OPCODES: &[OpcodeSpec] = &[
    op!(-1, "exit", 0, Plain, Interpreter::op_exit),
    op!(0, "redraw", 0, Plain, Interpreter::op_redraw),
    op!(1, "talk", 3, Plain, Interpreter::op_talk),
    op!(2, "add_item", 2, Plain, Interpreter::op_add_item),
    op!(3, "modify_event", 13, Plain, Interpreter::op_modify_event),
    op!(4, "is_using_item", 1, Condition, Interpreter::op_is_using_item),
    op!(5, "ask_battle", 0, Condition, Interpreter::op_ask_battle),
    op!(6, "battle", 4, Battle, Interpreter::op_battle),
    op!(7, "break", 0, Plain, Interpreter::op_exit),
    op!(8, "overworld_music", 1, Plain, Interpreter::op_overworld_music),
    op!(9, "ask_join", 0, Condition, Interpreter::op_ask_join),
    op!(10, "join", 1, Plain, Interpreter::op_join),
    op!(11, "ask_rest", 0, Condition, Interpreter::op_ask_rest),
    op!(12, "rest", 0, Plain, Interpreter::op_rest),
    op!(13, "fade_in", 0, Plain, Interpreter::op_fade_in),
    op!(14, "fade_out", 0, Plain, Interpreter::op_fade_out),
    op!(15, "game_over", 0, Plain, Interpreter::op_game_over),
    op!(16, "in_team", 1, Condition, Interpreter::op_in_team),
    op!(17, "set_layer_cell", 5, Plain, Interpreter::op_set_layer_cell),
    op!(18, "has_item", 1, Condition, Interpreter::op_has_item),
    op!(19, "set_position", 2, Plain, Interpreter::op_set_position),
    op!(20, "team_full", 0, Condition, Interpreter::op_team_full),
    op!(21, "leave_team", 1, Plain, Interpreter::op_leave_team),
    op!(22, "zero_team_mp", 0, Plain, Interpreter::op_zero_team_mp),
    op!(23, "set_poison_skill", 2, Plain, Interpreter::op_set_poison_skill),
    op!(24, "nop", 0, Plain, Interpreter::op_nop),
    op!(25, "pan_camera", 4, Plain, Interpreter::op_pan_camera),
    op!(26, "add_event_scripts", 5, Plain, Interpreter::op_add_event_scripts),
    op!(27, "animate", 3, Plain, Interpreter::op_animate),
    op!(28, "check_integrity", 3, Condition, Interpreter::op_check_integrity),
    op!(29, "check_attack", 3, Condition, Interpreter::op_check_attack),
    op!(30, "walk", 4, Plain, Interpreter::op_walk),
    op!(31, "has_money", 1, Condition, Interpreter::op_has_money),
    op!(32, "add_item_silent", 2, Plain, Interpreter::op_add_item_silent),
    op!(33, "learn_skill", 3, Plain, Interpreter::op_learn_skill),
    op!(34, "add_potential", 2, Plain, Interpreter::op_add_potential),
    op!(35, "set_skill", 4, Plain, Interpreter::op_set_skill),
    op!(36, "check_sex", 1, Condition, Interpreter::op_check_sex),
    op!(37, "add_integrity", 1, Plain, Interpreter::op_add_integrity),
    op!(38, "replace_layer_tex", 4, Plain, Interpreter::op_replace_layer_tex),
    op!(39, "open_submap", 1, Plain, Interpreter::op_open_submap),
    op!(40, "set_facing", 1, Plain, Interpreter::op_set_facing),
    op!(41, "role_add_item", 3, Plain, Interpreter::op_role_add_item),
    op!(42, "female_in_team", 0, Condition, Interpreter::op_female_in_team),
    op!(43, "has_item_alt", 1, Condition, Interpreter::op_has_item),
    op!(44, "animate3", 7, Plain, Interpreter::op_animate3),
    op!(45, "add_speed", 2, Plain, Interpreter::op_add_speed),
    op!(46, "add_max_mp", 2, Plain, Interpreter::op_add_max_mp),
    op!(47, "add_attack", 2, Plain, Interpreter::op_add_attack),
    op!(48, "add_max_hp", 2, Plain, Interpreter::op_add_max_hp),
    op!(49, "set_mp_type", 2, Plain, Interpreter::op_set_mp_type),
    op!(50, "has_five_items", 5, Condition, Interpreter::op_has_five_items),
    op!(51, "tutorial_talk", 0, Plain, Interpreter::op_tutorial_talk),
    op!(52, "show_integrity", 0, Plain, Interpreter::op_show_integrity),
    op!(53, "show_reputation", 0, Plain, Interpreter::op_show_reputation),
    op!(54, "open_all_submaps", 0, Plain, Interpreter::op_open_all_submaps),
    op!(55, "check_event_flag", 2, Condition, Interpreter::op_check_event_flag),
    op!(56, "add_reputation", 1, Plain, Interpreter::op_add_reputation),
    op!(57, "break_gate", 0, Plain, Interpreter::op_break_gate),
    op!(58, "tournament", 0, Plain, Interpreter::op_tournament),
    op!(59, "disband", 0, Plain, Interpreter::op_disband),
    op!(60, "check_event_tex", 3, Condition, Interpreter::op_check_event_tex),
    op!(61, "books_placed", 0, Condition, Interpreter::op_books_placed),
    op!(62, "ending", 6, Plain, Interpreter::op_ending),
    op!(63, "set_sex", 2, Plain, Interpreter::op_set_sex),
    op!(64, "shop", 0, Plain, Interpreter::op_shop),
    op!(65, "reroll_shop", 0, Plain, Interpreter::op_reroll_shop),
    op!(66, "play_music", 1, Plain, Interpreter::op_play_music),
    op!(67, "play_sound", 1, Plain, Interpreter::op_play_sound),
];

lazy_static! {
    static ref BY_CODE: HashMap<i16, &'static OpcodeSpec> =
        OPCODES.iter().map(|spec| (spec.code, spec)).collect();
}

/// Look up an opcode number, None for numbers no opcode uses
pub fn lookup(code: i16) -> Option<&'static OpcodeSpec> {
    BY_CODE.get(&code).copied()
}

/// Name of an opcode number for logs and listings
pub fn get_opcode_name(code: i16) -> &'static str {
    lookup(code).map(|s| s.name).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_contiguous() {
        assert_eq!(OPCODES.len(), 69);
        for (i, spec) in OPCODES.iter().enumerate() {
            assert_eq!(spec.code, i as i16 - 1, "{} out of order", spec.name);
        }
        assert_eq!(BY_CODE.len(), OPCODES.len());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(lookup(1).unwrap().size(), 4);
        assert_eq!(lookup(3).unwrap().size(), 14);
        assert_eq!(lookup(6).unwrap().size(), 5);
        assert_eq!(lookup(50).unwrap().size(), 8);
        assert_eq!(lookup(-1).unwrap().size(), 1);
    }

    #[test]
    fn test_unknown_codes() {
        assert!(lookup(68).is_none());
        assert!(lookup(-7).is_none());
        assert_eq!(get_opcode_name(200), "unknown");
        assert_eq!(get_opcode_name(44), "animate3");
    }
}
