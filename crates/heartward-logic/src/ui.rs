//! What the vignette's single UI container shows.
//!
//! The scene decides *what* is on screen; the client decides how it looks.

use crate::constants::{
    EXIT_PROMPT_TEXT, KEYBOARD_HINT_TEXT, SURGERY_COMPLETE_TEXT, SURGERY_HINT_TEXT,
    TOUCH_HINT_TEXT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    Touch,
    Keyboard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Hidden,
    SurgeryHint { done: usize, total: usize },
    SurgeryComplete,
    RoamingHint(InputModality),
    /// Two choices: keep exploring or leave.
    ExitPrompt,
    Farewell(&'static str),
}

impl Panel {
    pub fn text(&self) -> String {
        match self {
            Panel::Hidden => String::new(),
            Panel::SurgeryHint { done, total } => {
                format!("{SURGERY_HINT_TEXT}\nSpots: {done} / {total}")
            }
            Panel::SurgeryComplete => SURGERY_COMPLETE_TEXT.to_string(),
            Panel::RoamingHint(InputModality::Keyboard) => KEYBOARD_HINT_TEXT.to_string(),
            Panel::RoamingHint(InputModality::Touch) => TOUCH_HINT_TEXT.to_string(),
            Panel::ExitPrompt => EXIT_PROMPT_TEXT.to_string(),
            Panel::Farewell(text) => (*text).to_string(),
        }
    }

    pub fn shows_joystick(&self) -> bool {
        matches!(self, Panel::RoamingHint(InputModality::Touch))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: &'static str,
    pub expires_at: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub panel: Panel,
    pub message: Option<Message>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            panel: Panel::Hidden,
            message: None,
        }
    }
}

impl UiState {
    /// Show a transient message, replacing any current one.
    pub fn show_message(&mut self, text: &'static str, now: f32, lifetime: f32) {
        self.message = Some(Message {
            text,
            expires_at: now + lifetime,
        });
    }

    pub fn expire(&mut self, now: f32) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| now >= m.expires_at)
        {
            self.message = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
