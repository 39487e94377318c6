//! Headless frontend for tests and the command-line runner
//!
//! Records every request instead of presenting it. The log is shared so a caller can
//! keep reading it after handing the frontend to the interpreter.

use crate::frontend::{Frontend, FrontendError, TalkPosition};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendRequest {
    Talk {
        lines: Vec<String>,
        head_id: i16,
        position: TalkPosition,
    },
    Notice(Vec<String>),
    Ask(Vec<String>),
    Battle {
        battle_id: i16,
        grants_exp_on_loss: bool,
    },
    FadeIn,
    FadeOut,
    Shop(i16),
    ClosePopup,
    Music(i16),
    Sound(i16),
    GameOver {
        won: bool,
    },
}

impl FrontendRequest {
    /// Whether the engine waits for a `continue_events` after this request
    pub fn awaits_reply(&self) -> bool {
        !matches!(
            self,
            FrontendRequest::ClosePopup
                | FrontendRequest::Music(_)
                | FrontendRequest::Sound(_)
                | FrontendRequest::GameOver { .. }
        )
    }
}

pub type RequestLog = Rc<RefCell<Vec<FrontendRequest>>>;

#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    log: RequestLog,
    /// Fail every call, for exercising error paths
    failing: bool,
}

impl HeadlessFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        HeadlessFrontend {
            failing: true,
            ..Default::default()
        }
    }

    /// Handle to the shared request log
    pub fn log(&self) -> RequestLog {
        Rc::clone(&self.log)
    }

    fn record(&mut self, request: FrontendRequest) -> Result<(), FrontendError> {
        if self.failing {
            return Err(FrontendError::new(format!("refused {:?}", request)));
        }
        debug!("Headless: {:?}", request);
        self.log.borrow_mut().push(request);
        Ok(())
    }
}

impl Frontend for HeadlessFrontend {
    fn show_talk(
        &mut self,
        lines: &[String],
        head_id: i16,
        position: TalkPosition,
    ) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Talk {
            lines: lines.to_vec(),
            head_id,
            position,
        })
    }

    fn show_notice(&mut self, lines: &[String]) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Notice(lines.to_vec()))
    }

    fn ask(&mut self, lines: &[String]) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Ask(lines.to_vec()))
    }

    fn enter_battle(
        &mut self,
        battle_id: i16,
        grants_exp_on_loss: bool,
    ) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Battle {
            battle_id,
            grants_exp_on_loss,
        })
    }

    fn fade_in(&mut self) -> Result<(), FrontendError> {
        self.record(FrontendRequest::FadeIn)
    }

    fn fade_out(&mut self) -> Result<(), FrontendError> {
        self.record(FrontendRequest::FadeOut)
    }

    fn open_shop(&mut self, shop_id: i16) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Shop(shop_id))
    }

    fn close_popup(&mut self) -> Result<(), FrontendError> {
        self.record(FrontendRequest::ClosePopup)
    }

    fn play_music(&mut self, music_id: i16) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Music(music_id))
    }

    fn play_sound(&mut self, sound_id: i16) -> Result<(), FrontendError> {
        self.record(FrontendRequest::Sound(sound_id))
    }

    fn game_over(&mut self, won: bool) -> Result<(), FrontendError> {
        self.record(FrontendRequest::GameOver { won })
    }
}
