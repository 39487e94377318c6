//! Collaborator boundary for everything the interpreter cannot do itself
//!
//! Dialogs, prompts, battles, fades, shops and audio are owned by the presentation
//! layer. Each call here only *starts* the action; the engine is told that the action
//! finished through `Interpreter::continue_events`, which the caller invokes with the
//! outcome (dismissed, yes/no answer, battle won/lost).

use std::fmt;

/// Where a talk box sits and whether the portrait is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalkPosition {
    Top,
    Bottom,
    TopNoHead,
    BottomNoHead,
    TopRight,
    BottomRight,
}

impl TalkPosition {
    pub fn from_raw(raw: i16) -> Self {
        match raw {
            1 => TalkPosition::Bottom,
            2 => TalkPosition::TopNoHead,
            3 => TalkPosition::BottomNoHead,
            4 => TalkPosition::TopRight,
            5 => TalkPosition::BottomRight,
            _ => TalkPosition::Top,
        }
    }
}

/// Presentation services used by scripts
pub trait Frontend {
    /// Show a line of dialogue with a portrait; resumed when dismissed
    fn show_talk(
        &mut self,
        lines: &[String],
        head_id: i16,
        position: TalkPosition,
    ) -> Result<(), FrontendError>;

    /// Show a short message box; resumed when dismissed
    fn show_notice(&mut self, lines: &[String]) -> Result<(), FrontendError>;

    /// Ask a yes/no question; resumed with the answer
    fn ask(&mut self, lines: &[String]) -> Result<(), FrontendError>;

    /// Start a battle; resumed with whether it was won
    fn enter_battle(&mut self, battle_id: i16, grants_exp_on_loss: bool)
        -> Result<(), FrontendError>;

    fn fade_in(&mut self) -> Result<(), FrontendError>;

    fn fade_out(&mut self) -> Result<(), FrontendError>;

    /// Open the shop UI; resumed when closed
    fn open_shop(&mut self, shop_id: i16) -> Result<(), FrontendError>;

    /// Close whatever popup is open. Never pauses.
    fn close_popup(&mut self) -> Result<(), FrontendError>;

    fn play_music(&mut self, music_id: i16) -> Result<(), FrontendError>;

    fn play_sound(&mut self, sound_id: i16) -> Result<(), FrontendError>;

    /// The game has ended, either by death or by reaching the ending
    fn game_over(&mut self, won: bool) -> Result<(), FrontendError>;
}

/// Frontend error type
#[derive(Debug, Clone)]
pub struct FrontendError {
    pub message: String,
}

impl FrontendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frontend error: {}", self.message)
    }
}

impl std::error::Error for FrontendError {}

impl From<std::io::Error> for FrontendError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}

impl From<FrontendError> for String {
    fn from(error: FrontendError) -> String {
        error.message
    }
}
