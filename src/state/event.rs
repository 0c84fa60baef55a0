use super::model::{ThemeMode, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    ToggleTheme,
    SetTheme(ThemeMode),
    Scrolled { offset: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: UiState,
    pub event: UiEvent,
    pub to: UiState,
}

impl StateTransition {
    pub const fn new(from: UiState, event: UiEvent, to: UiState) -> Self {
        Self { from, event, to }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}
