//! Transport-agnostic menu rendering.
//!
//! A [`MenuMarkup`] is an opaque snapshot of the actions available on the
//! present screen. The session engine stores and swaps these frames; only
//! the gateway edge knows how to turn one into an inline keyboard.

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// One pressable button: a human-readable label plus a command payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub command: String,
}

impl MenuButton {
    /// Create a button bound to a command from the fixed table.
    pub fn new(label: impl Into<String>, command: Command) -> Self {
        Self {
            label: label.into(),
            command: command.as_str().to_string(),
        }
    }
}

/// Rows of buttons making up one menu screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuMarkup {
    pub rows: Vec<Vec<MenuButton>>,
}

impl MenuMarkup {
    /// Create an empty markup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons.
    pub fn row(mut self, buttons: Vec<MenuButton>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Whether the markup contains a button bound to the given command.
    pub fn contains(&self, command: Command) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|button| button.command == command.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let markup = MenuMarkup::new()
            .row(vec![MenuButton::new("О программе", Command::About)])
            .row(vec![MenuButton::new("Назад", Command::Back)]);

        assert!(markup.contains(Command::About));
        assert!(markup.contains(Command::Back));
        assert!(!markup.contains(Command::Exit));
    }
}
