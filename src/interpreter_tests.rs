#[cfg(test)]
mod tests {
    use crate::frontend::TalkPosition;
    use crate::frontend_headless::{FrontendRequest, HeadlessFrontend};
    use crate::interpreter::{EventSource, PauseReason, ScriptState};
    use crate::opcodes_scene::{TOURNAMENT_BATTLE_FIRST, TOURNAMENT_ROUNDS};
    use crate::test_utils::{TestEngine, TEST_SUBMAP};
    use test_log::test;

    fn talk_heads(requests: &[FrontendRequest]) -> Vec<i16> {
        requests
            .iter()
            .filter_map(|r| match r {
                FrontendRequest::Talk { head_id, .. } => Some(*head_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_talk_pauses_then_exit_finishes() {
        let mut engine = TestEngine::new().with_script(5, vec![1, 1001, 5, 0, -1, 6, 3]);
        engine.interp.run_event(5).unwrap();

        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Frontend)
        );
        assert_eq!(engine.interp.ip(), 4);
        assert_eq!(
            engine.requests(),
            vec![FrontendRequest::Talk {
                lines: vec!["<talk 1001>".to_string()],
                head_id: 5,
                position: TalkPosition::Top,
            }]
        );

        engine.interp.continue_events(true).unwrap();
        assert_eq!(engine.interp.state(), ScriptState::Idle);
        assert_eq!(engine.interp.ip(), 7);
        assert_eq!(engine.requests().last(), Some(&FrontendRequest::ClosePopup));
    }

    #[test]
    fn test_continue_while_idle_is_noop() {
        let mut engine = TestEngine::new();
        engine.interp.continue_events(true).unwrap();
        engine.interp.continue_events(false).unwrap();
        assert_eq!(engine.interp.state(), ScriptState::Idle);
        assert!(engine.requests().is_empty());
    }

    #[test]
    fn test_run_event_rejected_while_paused() {
        let mut engine = TestEngine::new()
            .with_script(1, vec![1, 0, 10, 0])
            .with_script(2, vec![1, 1, 20, 0]);
        engine.interp.run_event(1).unwrap();
        let ip = engine.interp.ip();

        assert!(engine.interp.run_event(2).is_err());
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Frontend)
        );
        assert_eq!(engine.interp.ip(), ip);
        assert_eq!(engine.interp.script_id(), 1);
        assert_eq!(engine.requests().len(), 1);
    }

    #[test]
    fn test_missing_script_stays_idle() {
        let mut engine = TestEngine::new();
        engine.interp.run_event(99).unwrap();
        assert!(engine.interp.is_idle());
    }

    #[test]
    fn test_condition_takes_false_jump() {
        let script = vec![18, 12, 0, 5, 1, 0, 10, 0, -1, 1, 1, 20, 0];
        let mut engine = TestEngine::new().with_script(1, script);
        engine.interp.run_event(1).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![20]);
        assert_eq!(engine.interp.ip(), 13);
    }

    #[test]
    fn test_condition_takes_true_jump() {
        let script = vec![18, 12, 0, 5, 1, 0, 10, 0, -1, 1, 1, 20, 0];
        let mut engine = TestEngine::new().with_script(1, script);
        engine.interp.ctx.bag.add(12, 1);
        engine.interp.run_event(1).unwrap();
        assert_eq!(
            engine.requests(),
            vec![FrontendRequest::Talk {
                lines: vec!["Welcome.".to_string()],
                head_id: 10,
                position: TalkPosition::Top,
            }]
        );
        engine.interp.continue_events(true).unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
    }

    #[test]
    fn test_deferred_prompt_advances_by_answer() {
        let script = vec![5, 0, 4, 1, 0, 10, 0, 1, 1, 20, 0];

        let mut engine = TestEngine::new().with_script(1, script.clone());
        engine.interp.run_event(1).unwrap();
        assert!(matches!(
            engine.requests().as_slice(),
            [FrontendRequest::Ask(_)]
        ));
        assert_eq!(engine.interp.ip(), 3);
        engine.interp.continue_events(false).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![20]);
        assert_eq!(engine.interp.ip(), 11);

        let mut engine = TestEngine::new().with_script(1, script);
        engine.interp.run_event(1).unwrap();
        engine.interp.continue_events(true).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
        assert_eq!(engine.interp.ip(), 7);
    }

    #[test]
    fn test_battle_is_always_deferred() {
        // battle 50, won: +0, lost: +5, experience on loss
        let script = vec![6, 50, 0, 5, 1, 1, 0, 10, 0, -1, 1, 1, 20, 0];
        let mut engine = TestEngine::new().with_script(1, script.clone());
        engine.interp.run_event(1).unwrap();
        assert_eq!(
            engine.requests(),
            vec![FrontendRequest::Battle {
                battle_id: 50,
                grants_exp_on_loss: true
            }]
        );
        assert_eq!(engine.interp.ip(), 5);
        engine.interp.continue_events(false).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![20]);

        let mut engine = TestEngine::new().with_script(1, script);
        engine.interp.run_event(1).unwrap();
        engine.interp.continue_events(true).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
        engine.interp.continue_events(true).unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
    }

    #[test]
    fn test_unknown_opcode_skips_one_word() {
        let mut engine = TestEngine::new().with_script(1, vec![300, 1, 0, 10, 0]);
        engine.interp.run_event(1).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
        assert_eq!(engine.interp.ip(), 5);
    }

    #[test]
    fn test_truncated_instruction_ends_script() {
        let mut engine = TestEngine::new().with_script(1, vec![1, 0]);
        engine.interp.run_event(1).unwrap();
        assert!(engine.interp.is_idle());
        assert!(engine.requests().is_empty());
    }

    #[test]
    fn test_runaway_loop_is_stopped() {
        let mut engine = TestEngine::new().with_script(1, vec![16, 0, -4, -4]);
        assert!(engine.interp.run_event(1).is_err());
        assert!(engine.interp.is_idle());
    }

    #[test]
    fn test_frontend_failure_ends_script() {
        let mut engine = TestEngine::new().with_script(1, vec![1, 0, 10, 0]);
        engine.interp.ctx.frontend = Box::new(HeadlessFrontend::failing());
        assert!(engine.interp.run_event(1).is_err());
        assert!(engine.interp.is_idle());
        engine.interp.ctx.frontend = Box::new(HeadlessFrontend::new());
        engine.interp.run_event(1).unwrap();
    }

    #[test]
    fn test_deferred_steps_run_before_next_opcode() {
        let mut engine = TestEngine::new().with_script(1, vec![10, 3, 1, 0, 10, 0]);
        {
            let role = engine.interp.ctx.save.roles.get_mut(3).unwrap();
            role.carry_items[0] = 5;
            role.carry_counts[0] = 2;
        }
        engine.interp.run_event(1).unwrap();

        assert_eq!(
            engine.requests(),
            vec![FrontendRequest::Notice(vec!["Obtained Item5 x2".to_string()])]
        );
        assert_eq!(engine.interp.ip(), 2);
        assert_eq!(engine.interp.pending_steps(), 0);
        assert_eq!(engine.interp.ctx.bag.count(5), 2);
        assert_eq!(engine.interp.ctx.save.base.team[1], 3);
        assert_eq!(engine.interp.ctx.save.roles.get(3).unwrap().carry_items[0], -1);

        engine.interp.continue_events(true).unwrap();
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
    }

    #[test]
    fn test_animation_resumes_on_tick() {
        let mut engine = TestEngine::new().with_script(1, vec![27, 4, 10, 12]);
        engine.place_event(4, 6, 6);
        engine.interp.run_event(1).unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Animation)
        );

        engine.interp.tick().unwrap();
        engine.interp.tick().unwrap();
        assert!(!engine.interp.is_idle());
        engine.interp.tick().unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(
            engine.interp.ctx.save.event(TEST_SUBMAP, 4).unwrap().curr_tex,
            12
        );
    }

    #[test]
    fn test_two_frame_animation() {
        let mut engine = TestEngine::new().with_script(1, vec![27, 4, 10, 11]);
        engine.place_event(4, 6, 6);
        engine.interp.run_event(1).unwrap();
        engine.interp.tick().unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Animation)
        );
        engine.interp.tick().unwrap();
        assert!(engine.interp.is_idle());
    }

    #[test]
    fn test_walk_resumes_when_path_exhausted() {
        let mut engine = TestEngine::new().with_script(1, vec![30, 2, 2, 2, 4]);
        engine.interp.run_event(1).unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Path)
        );
        engine.interp.tick().unwrap();
        assert_eq!(engine.interp.ctx.world.position(), (2, 3));
        engine.interp.tick().unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(engine.interp.ctx.world.position(), (2, 4));
    }

    #[test]
    fn test_continue_does_not_cut_short_a_walk() {
        let mut engine = TestEngine::new().with_script(1, vec![30, 1, 1, 1, 6, 1, 0, 10, 0]);
        engine.interp.run_event(1).unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Path)
        );
        let remaining = engine.interp.ctx.world.path_len();
        assert!(remaining > 0);

        engine.interp.continue_events(true).unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Path)
        );
        assert_eq!(engine.interp.ctx.world.path_len(), remaining);
        assert!(engine.requests().is_empty());

        for _ in 0..remaining {
            engine.interp.tick().unwrap();
        }
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Frontend)
        );
        assert_eq!(talk_heads(&engine.requests()), vec![10]);
    }

    #[test]
    fn test_extreme_motion_arguments_run_to_completion() {
        let mut engine = TestEngine::new().with_script(1, vec![27, -1, 32767, 32767]);
        engine.interp.run_event(1).unwrap();
        engine.interp.tick().unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(engine.interp.ctx.world.player_tex(), i16::MAX);

        let mut engine = TestEngine::new().with_script(1, vec![25, -32768, 0, -32766, 0]);
        engine.interp.run_event(1).unwrap();
        assert_eq!(engine.interp.ctx.world.path_len(), 2);
        engine.interp.tick().unwrap();
        engine.interp.tick().unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(engine.interp.ctx.world.camera(), (-32766, 0));
    }

    #[test]
    fn test_continue_does_not_cut_short_an_animation() {
        let mut engine = TestEngine::new().with_script(1, vec![27, 4, 10, 12]);
        engine.place_event(4, 6, 6);
        engine.interp.run_event(1).unwrap();
        engine.interp.continue_events(true).unwrap();
        assert_eq!(
            engine.interp.state(),
            ScriptState::Paused(PauseReason::Animation)
        );
        assert!(engine.interp.ctx.world.is_animating());
    }

    #[test]
    fn test_zero_length_pan_does_not_pause() {
        let mut engine = TestEngine::new().with_script(1, vec![25, 3, 3, 3, 3]);
        engine.interp.run_event(1).unwrap();
        assert!(engine.interp.is_idle());
    }

    #[test]
    fn test_tournament_loss_aborts_script() {
        let mut engine = TestEngine::new().with_script(1, vec![58, 1, 0, 10, 0]);
        engine.interp.run_event(1).unwrap();
        assert_eq!(engine.requests().len(), 1);
        engine.interp.continue_events(true).unwrap();
        assert_eq!(
            engine.requests().last(),
            Some(&FrontendRequest::Battle {
                battle_id: TOURNAMENT_BATTLE_FIRST,
                grants_exp_on_loss: false
            })
        );

        engine.interp.continue_events(false).unwrap();
        assert!(engine.interp.is_idle());
        assert_eq!(engine.interp.pending_steps(), 0);
        assert_eq!(talk_heads(&engine.requests()).len(), 1);
    }

    #[test]
    fn test_tournament_win_runs_every_round() {
        let mut engine = TestEngine::new().with_script(1, vec![58, 1, 0, 10, 0]);
        engine.interp.run_event(1).unwrap();
        for _ in 0..100 {
            if engine.interp.is_idle() {
                break;
            }
            engine.interp.continue_events(true).unwrap();
        }
        assert!(engine.interp.is_idle());

        let requests = engine.requests();
        let battles = requests
            .iter()
            .filter(|r| matches!(r, FrontendRequest::Battle { .. }))
            .count();
        assert_eq!(battles, TOURNAMENT_ROUNDS as usize);
        let heads = talk_heads(&requests);
        assert_eq!(heads.len(), TOURNAMENT_ROUNDS as usize + 2);
        assert_eq!(heads.last(), Some(&10));

        let mut challengers = heads[..TOURNAMENT_ROUNDS as usize].to_vec();
        challengers.sort();
        challengers.dedup();
        assert_eq!(challengers.len(), TOURNAMENT_ROUNDS as usize);
    }

    #[test]
    fn test_resumes_reach_stream_end() {
        let script = vec![1, 0, 1, 0, 2, 4, 1, 5, 0, 1, 1, 2, 0, 11, 0, 0];
        let mut engine = TestEngine::new().with_script(1, script);
        engine
            .interp
            .run_event_from(1, EventSource::default())
            .unwrap();
        let mut resumes = 0;
        while !engine.interp.is_idle() {
            engine.interp.continue_events(resumes % 2 == 0).unwrap();
            resumes += 1;
            assert!(resumes < 10);
        }
        assert_eq!(engine.interp.ip(), 16);
    }
}
