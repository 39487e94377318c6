// Test utilities for building an interpreter over a small blank game
use crate::config::EngineConfig;
use crate::frontend_headless::{FrontendRequest, HeadlessFrontend, RequestLog};
use crate::interpreter::{EngineContext, Interpreter};
use crate::records::{name_to_bytes, Layer};
use crate::savedata::SaveData;
use crate::script_library::{ScriptLibrary, TalkTable};

/// Sub-map the test engine starts in
pub const TEST_SUBMAP: i16 = 1;
/// Item ids of the test catalog run from 0 to ITEM_COUNT - 1
pub const ITEM_COUNT: usize = 200;

pub struct TestEngine {
    pub interp: Interpreter,
    pub log: RequestLog,
}

impl TestEngine {
    /// Ten roles (role 0 leads the team), 200 items, 20 skills, three sub-maps and five
    /// shops, standing in sub-map 1
    pub fn new() -> Self {
        let mut save = SaveData::blank(10, ITEM_COUNT, 20, 3, 5);
        save.base.team[0] = 0;
        for (i, role) in save.roles.iter_mut().enumerate() {
            role.name = name_to_bytes(&format!("Hero{}", i));
            role.max_hp = 100;
            role.hp = 50;
        }
        for (i, item) in save.items.iter_mut().enumerate() {
            item.name = name_to_bytes(&format!("Item{}", i));
        }
        for (i, skill) in save.skills.iter_mut().enumerate() {
            skill.name = name_to_bytes(&format!("Skill{}", i));
        }

        let mut talks = TalkTable::default();
        talks.push("Welcome.");
        talks.push("Line one*Line two");

        let config = EngineConfig {
            seed: Some(7),
            ..Default::default()
        };
        let frontend = HeadlessFrontend::new();
        let log = frontend.log();
        let mut ctx = EngineContext::new(
            config,
            save,
            ScriptLibrary::default(),
            talks,
            Box::new(frontend),
        );
        assert!(ctx.world.enter_submap(&ctx.save, TEST_SUBMAP));
        TestEngine {
            interp: Interpreter::new(ctx),
            log,
        }
    }

    pub fn with_script(mut self, id: usize, words: Vec<i16>) -> Self {
        self.interp.ctx.scripts.insert(id, words);
        self
    }

    /// Put an event object on a cell of the test sub-map
    pub fn place_event(&mut self, event: i16, x: i16, y: i16) {
        let save = &mut self.interp.ctx.save;
        save.layers[TEST_SUBMAP as usize].set(Layer::Event, x, y, event);
        let obj = save.event_mut(TEST_SUBMAP, event).unwrap();
        obj.x = x;
        obj.y = y;
    }

    pub fn requests(&self) -> Vec<FrontendRequest> {
        self.log.borrow().clone()
    }
}
