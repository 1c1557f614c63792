//! One-level menu navigation.

use bot_core::MenuMarkup;

/// Current and previous menu frames for one session.
///
/// Offers exactly one level of undo: `previous` only gates whether a
/// back button is shown. The `is_back` flag suppresses the push that
/// would otherwise happen on the render immediately following a back
/// action, so going back does not re-stack the screen being left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuStack {
    current: Option<MenuMarkup>,
    previous: Option<MenuMarkup>,
    is_back: bool,
}

impl MenuStack {
    /// Start an empty stack; the first render installs `current`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The screen currently shown, if any has been rendered yet.
    pub fn current(&self) -> Option<&MenuMarkup> {
        self.current.as_ref()
    }

    /// Whether a "back" action can be offered.
    pub fn can_show_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Called before rendering a new current screen.
    ///
    /// Moves the outgoing screen into `previous`, unless this render
    /// directly follows a back action, in which case the flag is
    /// cleared and history is left as the back handler set it.
    pub fn push_if_not_back(&mut self) {
        if self.is_back {
            self.is_back = false;
        } else if let Some(current) = self.current.clone() {
            self.previous = Some(current);
        }
    }

    /// Install the screen that was just rendered.
    pub fn set_current(&mut self, markup: MenuMarkup) {
        self.current = Some(markup);
    }

    /// Leave the current screen: drop history and flag the next render
    /// so it does not re-push the screen being left.
    pub fn go_back(&mut self) {
        self.previous = None;
        self.is_back = true;
    }
}
