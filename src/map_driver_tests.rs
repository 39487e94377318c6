#[cfg(test)]
mod tests {
    use crate::frontend_headless::{FrontendRequest, RequestLog};
    use crate::interpreter::{PauseReason, ScriptState};
    use crate::map_driver::{MapDriver, StepOutcome};
    use crate::records::Layer;
    use crate::test_utils::{TestEngine, TEST_SUBMAP};
    use crate::world::Direction;
    use test_log::test;

    /// Driver standing at (0, 0) of the test sub-map, facing south
    fn driver(engine: TestEngine) -> (MapDriver, RequestLog) {
        let TestEngine { interp, log } = engine;
        (
            MapDriver {
                interpreter: interp,
            },
            log,
        )
    }

    fn set_scripts(engine: &mut TestEngine, event: i16, scripts: [i16; 3]) {
        engine
            .interp
            .ctx
            .save
            .event_mut(TEST_SUBMAP, event)
            .unwrap()
            .scripts = scripts;
    }

    #[test]
    fn test_interact_runs_first_script() {
        let mut engine = TestEngine::new().with_script(1, vec![1, 0, 10, 0]);
        engine.place_event(8, 0, 1);
        set_scripts(&mut engine, 8, [1, 0, 0]);
        let (mut driver, log) = driver(engine);

        assert!(driver.interact().unwrap());
        assert_eq!(driver.state(), ScriptState::Paused(PauseReason::Frontend));
        assert_eq!(driver.interpreter.source().event, Some(8));
        assert!(matches!(
            log.borrow().as_slice(),
            [FrontendRequest::Talk { head_id: 10, .. }]
        ));

        assert_eq!(driver.step(Direction::East).unwrap(), StepOutcome::Busy);
        assert!(!driver.interact().unwrap());
        assert_eq!(driver.world().position(), (0, 0));

        driver.answer(true).unwrap();
        assert_eq!(driver.state(), ScriptState::Idle);
    }

    #[test]
    fn test_interact_with_empty_cell() {
        let (mut driver, log) = driver(TestEngine::new());
        assert!(!driver.interact().unwrap());
        assert!(driver.interpreter.is_idle());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_use_item_passes_item_to_script() {
        let script = vec![4, 33, 0, 4, 1, 0, 10, 0, 1, 1, 20, 0];
        let mut engine = TestEngine::new().with_script(2, script);
        engine.place_event(8, 0, 1);
        set_scripts(&mut engine, 8, [0, 2, 0]);
        let (mut driver, log) = driver(engine);

        assert!(!driver.interact().unwrap());
        assert!(driver.use_item(33).unwrap());
        assert_eq!(driver.interpreter.source().item, Some(33));
        assert!(matches!(
            log.borrow().as_slice(),
            [FrontendRequest::Talk { head_id: 10, .. }]
        ));
    }

    #[test]
    fn test_step_onto_event_runs_step_script() {
        let mut engine = TestEngine::new().with_script(3, vec![2, 5, 1]);
        engine.place_event(9, 0, 1);
        set_scripts(&mut engine, 9, [0, 0, 3]);
        let (mut driver, log) = driver(engine);

        assert_eq!(driver.step(Direction::South).unwrap(), StepOutcome::Moved);
        assert_eq!(driver.world().position(), (0, 1));
        assert_eq!(
            log.borrow().as_slice(),
            [FrontendRequest::Notice(vec!["Obtained Item5 x1".to_string()])]
        );
        assert_eq!(driver.interpreter.ctx.bag.count(5), 1);
    }

    #[test]
    fn test_blocked_moves() {
        let mut engine = TestEngine::new();
        engine.place_event(9, 0, 1);
        engine
            .interp
            .ctx
            .save
            .event_mut(TEST_SUBMAP, 9)
            .unwrap()
            .blocked = 1;
        engine
            .interp
            .ctx
            .save
            .layer_mut(TEST_SUBMAP)
            .unwrap()
            .set(Layer::Building, 1, 0, 300);
        let (mut driver, _log) = driver(engine);

        assert_eq!(driver.step(Direction::South).unwrap(), StepOutcome::Blocked);
        assert_eq!(driver.step(Direction::East).unwrap(), StepOutcome::Blocked);
        assert_eq!(driver.step(Direction::North).unwrap(), StepOutcome::Blocked);
        assert_eq!(driver.step(Direction::West).unwrap(), StepOutcome::Blocked);
        assert_eq!(driver.world().position(), (0, 0));
        assert_eq!(driver.world().facing(), Direction::West);
    }

    #[test]
    fn test_exit_cell_returns_to_overworld() {
        let mut engine = TestEngine::new();
        {
            let info = engine.interp.ctx.save.submaps.get_mut(TEST_SUBMAP).unwrap();
            info.exit_x[0] = 5;
            info.exit_y[0] = 5;
            info.main_entry_x1 = 100;
            info.main_entry_y1 = 120;
        }
        engine.interp.ctx.world.set_position(5, 4);
        engine.interp.ctx.world.set_overworld_music(16);
        let (mut driver, log) = driver(engine);

        assert_eq!(
            driver.step(Direction::South).unwrap(),
            StepOutcome::LeftSubmap
        );
        assert_eq!(driver.world().submap(), None);
        assert_eq!(driver.world().position(), (100, 120));
        assert_eq!(log.borrow().last(), Some(&FrontendRequest::Music(16)));
    }

    #[test]
    fn test_entrance_enters_submap() {
        let mut engine = TestEngine::new();
        {
            let info = engine.interp.ctx.save.submaps.get_mut(2).unwrap();
            info.main_entry_x1 = 10;
            info.main_entry_y1 = 10;
            info.entry_x = 3;
            info.entry_y = 4;
            info.entry_music = 7;
        }
        let (mut driver, log) = driver(engine);
        driver.leave_submap().unwrap();
        driver.interpreter.ctx.world.set_position(10, 9);

        assert_eq!(
            driver.step(Direction::South).unwrap(),
            StepOutcome::EnteredSubmap(2)
        );
        assert_eq!(driver.world().submap(), Some(2));
        assert_eq!(driver.world().position(), (3, 4));
        assert_eq!(log.borrow().last(), Some(&FrontendRequest::Music(7)));
    }

    #[test]
    fn test_locked_entrance_is_walked_over() {
        let mut engine = TestEngine::new();
        {
            let info = engine.interp.ctx.save.submaps.get_mut(2).unwrap();
            info.main_entry_x1 = 10;
            info.main_entry_y1 = 10;
            info.enter_condition = 1;
        }
        let (mut driver, _log) = driver(engine);
        driver.leave_submap().unwrap();
        driver.interpreter.ctx.world.set_position(10, 9);

        assert_eq!(driver.step(Direction::South).unwrap(), StepOutcome::Moved);
        assert_eq!(driver.world().submap(), None);
        assert_eq!(driver.world().position(), (10, 10));
    }

    #[test]
    fn test_tick_loops_ambient_textures() {
        let mut engine = TestEngine::new();
        engine.place_event(4, 2, 2);
        {
            let event = engine.interp.ctx.save.event_mut(TEST_SUBMAP, 4).unwrap();
            event.beg_tex = 10;
            event.end_tex = 12;
            event.tex_delay = 1;
        }
        let (mut driver, _log) = driver(engine);

        let mut seen = Vec::new();
        for _ in 0..4 {
            driver.tick().unwrap();
            seen.push(
                driver
                    .interpreter
                    .ctx
                    .save
                    .event(TEST_SUBMAP, 4)
                    .unwrap()
                    .curr_tex,
            );
        }
        assert_eq!(seen, vec![10, 11, 12, 10]);
        assert!(!driver.interpreter.ctx.world.drain_refresh().is_empty());
    }

    #[test]
    fn test_tick_leaves_scripted_animation_alone() {
        let mut engine = TestEngine::new().with_script(1, vec![27, 4, 50, 52]);
        engine.place_event(4, 2, 2);
        {
            let event = engine.interp.ctx.save.event_mut(TEST_SUBMAP, 4).unwrap();
            event.beg_tex = 10;
            event.end_tex = 12;
        }
        let (mut driver, _log) = driver(engine);
        driver.interpreter.run_event(1).unwrap();

        let mut seen = Vec::new();
        while !driver.interpreter.is_idle() {
            driver.tick().unwrap();
            seen.push(
                driver
                    .interpreter
                    .ctx
                    .save
                    .event(TEST_SUBMAP, 4)
                    .unwrap()
                    .curr_tex,
            );
            assert!(seen.len() < 10);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[..2], [50, 51]);
    }
}
