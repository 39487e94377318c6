#![crate_name = "wulin"]

#[macro_use]
extern crate lazy_static;

pub mod action;
pub mod archive;
pub mod bag;
pub mod config;
pub mod frontend;
pub mod frontend_headless;
pub mod instruction;
pub mod interpreter;
pub mod map_driver;
pub mod opcode_tables;
pub mod opcodes_dialog;
pub mod opcodes_flow;
pub mod opcodes_inventory;
pub mod opcodes_motion;
pub mod opcodes_role;
pub mod opcodes_scene;
pub mod opcodes_team;
pub mod opcodes_world;
pub mod random;
pub mod records;
pub mod savedata;
pub mod script_library;
pub mod sentinel;
pub mod world;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod interpreter_tests;


#[cfg(test)]
mod map_driver_tests;
