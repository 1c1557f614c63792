//! Pure input-collection logic: wizard steps and vitals parsing.
//!
//! Validation policy is deliberately split: the registration wizard
//! stalls on bad input (the user resends, the step does not advance),
//! while the one-shot temperature entry discards bad input and resets,
//! and pressure entry only stalls on too many fields.

use bot_core::Gender;
use database::NewUser;
use session_registry::Mode;
use tracing::warn;

/// Outcome of feeding one free-text answer to the registration wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    /// Advance to the next mode and ask the next question.
    Prompt { next: Mode, prompt: &'static str },
    /// Input rejected; mode unchanged, the user must resend.
    Stall,
    /// All fields collected; persist this profile.
    Complete { user: NewUser },
}

/// Apply one wizard answer to the current registration mode.
///
/// Must only be called with one of the five registration modes.
pub fn advance_wizard(chat_id: i64, mode: Mode, text: &str) -> WizardStep {
    match mode {
        Mode::CollectingName(mut draft) => {
            draft.name = text.to_string();
            WizardStep::Prompt {
                next: Mode::CollectingGender(draft),
                prompt: "Выберите Ваш пол (напишите 'м'|'ж')",
            }
        }
        Mode::CollectingGender(mut draft) => {
            draft.gender = Gender::from_answer(text);
            if draft.gender == Gender::Unknown {
                warn!(chat_id, text, "unrecognized gender answer");
            }
            WizardStep::Prompt {
                next: Mode::CollectingAge(draft),
                prompt: "Сколько Вам полных лет",
            }
        }
        Mode::CollectingAge(mut draft) => match text.trim().parse::<i64>() {
            Ok(age) => {
                draft.age = age;
                WizardStep::Prompt {
                    next: Mode::CollectingHeight(draft),
                    prompt: "Введите ваш рост",
                }
            }
            Err(_) => {
                warn!(chat_id, text, "unreadable age");
                WizardStep::Stall
            }
        },
        Mode::CollectingHeight(mut draft) => match text.trim().parse::<f64>() {
            Ok(height) => {
                draft.height = height;
                WizardStep::Prompt {
                    next: Mode::CollectingWeight(draft),
                    prompt: "Введите ваш вес",
                }
            }
            Err(_) => {
                warn!(chat_id, text, "unreadable height");
                WizardStep::Stall
            }
        },
        Mode::CollectingWeight(draft) => match text.trim().parse::<f64>() {
            Ok(weight) => WizardStep::Complete {
                user: draft.into_new_user(chat_id, weight),
            },
            Err(_) => {
                warn!(chat_id, text, "unreadable weight");
                WizardStep::Stall
            }
        },
        other => {
            warn!(chat_id, ?other, "wizard step called outside registration");
            WizardStep::Stall
        }
    }
}

/// Parse a temperature answer. Accepts comma or dot as the decimal
/// separator; only values strictly between 20 and 50 count as a
/// plausible body temperature.
pub fn parse_temperature(text: &str) -> Option<f64> {
    let value: f64 = text.trim().replace(',', ".").parse().ok()?;
    if value > 20.0 && value < 50.0 {
        Some(value)
    } else {
        None
    }
}

/// Parse a pressure answer into its labeled indicator lines.
///
/// Up to three comma-separated integers (systolic, diastolic, pulse);
/// missing or unreadable fields stay at zero. More than three fields
/// is rejected with `None`.
pub fn parse_pressure(text: &str) -> Option<String> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut values = [0i64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        if let Ok(value) = part.trim().parse::<i64>() {
            *slot = value;
        }
    }

    Some(format!(
        "Верхнее - {}\nНижнее - {}\nПульс - {}",
        values[0], values[1], values[2]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_registry::Draft;

    #[test]
    fn test_wizard_happy_path() {
        let mut mode = Mode::CollectingName(Draft::default());

        for (answer, expected_prompt) in [
            ("Ann", "Выберите Ваш пол (напишите 'м'|'ж')"),
            ("ж", "Сколько Вам полных лет"),
            ("30", "Введите ваш рост"),
            ("170", "Введите ваш вес"),
        ] {
            match advance_wizard(42, mode.clone(), answer) {
                WizardStep::Prompt { next, prompt } => {
                    assert_eq!(prompt, expected_prompt);
                    mode = next;
                }
                other => panic!("expected prompt, got {other:?}"),
            }
        }

        match advance_wizard(42, mode, "60") {
            WizardStep::Complete { user } => {
                assert_eq!(user.chat_id, 42);
                assert_eq!(user.name, "Ann");
                assert_eq!(user.gender, Gender::Female);
                assert_eq!(user.age, 30);
                assert_eq!(user.height, 170.0);
                assert_eq!(user.weight, 60.0);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_wizard_stalls_on_bad_numbers() {
        let draft = Draft {
            name: "Ann".to_string(),
            ..Draft::default()
        };

        assert_eq!(
            advance_wizard(42, Mode::CollectingAge(draft.clone()), "тридцать"),
            WizardStep::Stall
        );
        assert_eq!(
            advance_wizard(42, Mode::CollectingHeight(draft.clone()), "x"),
            WizardStep::Stall
        );
        assert_eq!(
            advance_wizard(42, Mode::CollectingWeight(draft), ""),
            WizardStep::Stall
        );
    }

    #[test]
    fn test_wizard_unknown_gender_still_advances() {
        let step = advance_wizard(42, Mode::CollectingGender(Draft::default()), "yes");
        match step {
            WizardStep::Prompt { next, .. } => match next {
                Mode::CollectingAge(draft) => assert_eq!(draft.gender, Gender::Unknown),
                other => panic!("expected age mode, got {other:?}"),
            },
            other => panic!("expected prompt, got {other:?}"),
        }
    }

    #[test]
    fn test_temperature_separators() {
        assert_eq!(parse_temperature("36,6"), Some(36.6));
        assert_eq!(parse_temperature("36.6"), Some(36.6));
        assert_eq!(parse_temperature(" 38 "), Some(38.0));
    }

    #[test]
    fn test_temperature_range() {
        assert_eq!(parse_temperature("99"), None);
        assert_eq!(parse_temperature("20"), None);
        assert_eq!(parse_temperature("50"), None);
        assert_eq!(parse_temperature("abc"), None);
        assert_eq!(parse_temperature(""), None);
    }

    #[test]
    fn test_pressure_full() {
        assert_eq!(
            parse_pressure("120,80,70").as_deref(),
            Some("Верхнее - 120\nНижнее - 80\nПульс - 70")
        );
    }

    #[test]
    fn test_pressure_partial_defaults_to_zero() {
        assert_eq!(
            parse_pressure("120,80").as_deref(),
            Some("Верхнее - 120\nНижнее - 80\nПульс - 0")
        );
        assert_eq!(
            parse_pressure("мусор").as_deref(),
            Some("Верхнее - 0\nНижнее - 0\nПульс - 0")
        );
    }

    #[test]
    fn test_pressure_too_many_fields() {
        assert_eq!(parse_pressure("1,2,3,4"), None);
    }
}
