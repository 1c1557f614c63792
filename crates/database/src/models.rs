//! Database models.

use std::fmt;

use bot_core::Gender;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Conversation identifier the profile belongs to.
    pub chat_id: i64,
    /// Display name, stored verbatim as entered.
    pub name: String,
    /// Gender identifier (see [`Gender::as_str`]).
    pub gender: String,
    /// Full years.
    pub age: i64,
    /// Height in centimeters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    /// Administrator flag.
    pub is_admin: bool,
}

impl User {
    /// Typed gender accessor.
    pub fn gender(&self) -> Gender {
        Gender::from_str(&self.gender)
    }

    /// Profile summary prepended to AI document prompts.
    pub fn describe(&self) -> String {
        format!(
            "Информация о пользователе '{}'. Пол '{}'. Вес '{}'. Рост '{}'. Возраст '{}'.",
            self.name,
            self.gender().description(),
            self.weight,
            self.height,
            self.age,
        )
    }
}

/// A user profile ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub chat_id: i64,
    pub name: String,
    pub gender: Gender,
    pub age: i64,
    pub height: f64,
    pub weight: f64,
    pub is_admin: bool,
}

/// A persisted measurement or decoded report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Record {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Record kind identifier (see [`bot_core::RecordKind::as_str`]).
    pub kind: String,
    /// Recommendations section; empty for manual vitals entries.
    pub recommendations: String,
    /// Indicators section.
    pub indicators: String,
    /// Info section.
    pub info: String,
    /// Creation timestamp, set by SQLite.
    pub created_at: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.info)?;
        writeln!(f, "{}", self.indicators)?;
        write!(f, "{}", self.recommendations)
    }
}

/// A record ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub user_id: i64,
    pub kind: bot_core::RecordKind,
    pub recommendations: String,
    pub indicators: String,
    pub info: String,
}
