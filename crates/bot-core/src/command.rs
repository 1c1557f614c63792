//! The fixed command table matched against callback payloads.

/// Text command that opens the start menu.
pub const START_COMMAND: &str = "/start";

/// Commands a menu button can carry in its callback payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the analyses menu.
    Analysis,
    /// Begin the registration wizard.
    SignUp,
    /// Show administrator contact info.
    Contacts,
    /// Go one menu level back.
    Back,
    /// Show the "about" text.
    About,
    /// Toggle the AI client on or off (administrator menu).
    OnOff,
    /// Start collecting a body temperature reading.
    Temperature,
    /// Start collecting a blood pressure reading.
    Pressure,
    /// Show usage statistics (administrator menu).
    Statistics,
    /// Open the record history menu.
    History,
    /// Prompt for a PDF upload.
    Pdf,
    /// Open the manual vitals entry menu.
    Manual,
    /// Show the last decoded reports.
    AnalysisHistory,
    /// Show the last temperature readings.
    TemperatureHistory,
    /// Show the last pressure readings.
    PressureHistory,
    /// Ask for account deletion confirmation.
    Exit,
    /// Confirm account deletion.
    Ok,
    /// Cancel and return to the start menu.
    Cancel,
    /// Per-field signup prompts. Inert: the wizard advances on free text.
    Name,
    Gender,
    Age,
    Height,
    Weight,
}

impl Command {
    /// The payload string carried in callbacks.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::SignUp => "signUp",
            Self::Contacts => "contacts",
            Self::Back => "back",
            Self::About => "about",
            Self::OnOff => "onOff",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Statistics => "statistics",
            Self::History => "history",
            Self::Pdf => "pdf",
            Self::Manual => "manual",
            Self::AnalysisHistory => "analysisHistory",
            Self::TemperatureHistory => "temperatureHistory",
            Self::PressureHistory => "pressureHistory",
            Self::Exit => "exit",
            Self::Ok => "ok",
            Self::Cancel => "cancel",
            Self::Name => "name",
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Height => "height",
            Self::Weight => "weight",
        }
    }

    /// Parse a callback payload. `None` for unrecognized payloads, which the
    /// dispatcher answers with its default branch.
    pub fn parse(payload: &str) -> Option<Self> {
        let command = match payload {
            "analysis" => Self::Analysis,
            "signUp" => Self::SignUp,
            "contacts" => Self::Contacts,
            "back" => Self::Back,
            "about" => Self::About,
            "onOff" => Self::OnOff,
            "temperature" => Self::Temperature,
            "pressure" => Self::Pressure,
            "statistics" => Self::Statistics,
            "history" => Self::History,
            "pdf" => Self::Pdf,
            "manual" => Self::Manual,
            "analysisHistory" => Self::AnalysisHistory,
            "temperatureHistory" => Self::TemperatureHistory,
            "pressureHistory" => Self::PressureHistory,
            "exit" => Self::Exit,
            "ok" => Self::Ok,
            "cancel" => Self::Cancel,
            "name" => Self::Name,
            "gender" => Self::Gender,
            "age" => Self::Age,
            "height" => Self::Height,
            "weight" => Self::Weight,
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for command in [
            Command::Analysis,
            Command::SignUp,
            Command::Back,
            Command::OnOff,
            Command::TemperatureHistory,
            Command::Ok,
            Command::Weight,
        ] {
            assert_eq!(Command::parse(command.as_str()), Some(command));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("definitely-not-a-command"), None);
        assert_eq!(Command::parse(""), None);
    }
}
