//! Workflow modes: how the next free-text message is interpreted.

use bot_core::Gender;
use database::NewUser;

/// A user profile under construction during the registration wizard.
///
/// Fields fill in step by step; the final weight answer turns the draft
/// into a [`NewUser`] ready for persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub gender: Gender,
    pub age: i64,
    pub height: f64,
}

impl Draft {
    /// Complete the draft with the final field.
    pub fn into_new_user(self, chat_id: i64, weight: f64) -> NewUser {
        NewUser {
            chat_id,
            name: self.name,
            gender: self.gender,
            age: self.age,
            height: self.height,
            weight,
            is_admin: false,
        }
    }
}

/// Current step of the input-collection state machine.
///
/// Registration modes carry the in-progress [`Draft`]; vitals modes
/// carry nothing. Every new session starts at `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    /// Not collecting anything; free text is ignored.
    #[default]
    None,
    /// Waiting for the display name.
    CollectingName(Draft),
    /// Waiting for the gender answer.
    CollectingGender(Draft),
    /// Waiting for the age.
    CollectingAge(Draft),
    /// Waiting for the height.
    CollectingHeight(Draft),
    /// Waiting for the weight; completion persists the profile.
    CollectingWeight(Draft),
    /// Waiting for a body temperature reading.
    CollectingTemperature,
    /// Waiting for a blood pressure reading.
    CollectingPressure,
}

impl Mode {
    /// Whether the session is mid-collection.
    pub fn is_collecting(&self) -> bool {
        !matches!(self, Mode::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_completion() {
        let draft = Draft {
            name: "Ann".to_string(),
            gender: Gender::Female,
            age: 30,
            height: 170.0,
        };

        let user = draft.into_new_user(42, 60.0);
        assert_eq!(user.chat_id, 42);
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.weight, 60.0);
        assert!(!user.is_admin);
    }

    #[test]
    fn test_is_collecting() {
        assert!(!Mode::None.is_collecting());
        assert!(Mode::CollectingName(Draft::default()).is_collecting());
        assert!(Mode::CollectingTemperature.is_collecting());
    }
}
