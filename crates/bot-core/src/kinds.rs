//! Profile and record classification.

use serde::{Deserialize, Serialize};

/// User gender collected during registration.
///
/// Free text that matches neither recognized token resolves to `Unknown`;
/// the wizard logs a warning but still advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Parse a single-token answer, case-insensitively.
    pub fn from_answer(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "м" => Self::Male,
            "ж" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Stable identifier used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the persisted identifier back. Anything else is `Unknown`.
    pub fn from_str(value: &str) -> Self {
        match value {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description shown to users.
    pub fn description(self) -> &'static str {
        match self {
            Self::Male => "Мужской",
            Self::Female => "Женский",
            Self::Unknown => "Не задан",
        }
    }
}

/// Kind of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Free-form decoded report produced by the AI document flow.
    Report,
    /// Manually entered body temperature.
    Temperature,
    /// Manually entered blood pressure.
    Pressure,
}

impl RecordKind {
    /// Stable identifier used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
        }
    }

    /// Human-readable description shown to users.
    pub fn description(self) -> &'static str {
        match self {
            Self::Report => "Анализ",
            Self::Temperature => "Температура тела",
            Self::Pressure => "Артериальное давление",
        }
    }
}
