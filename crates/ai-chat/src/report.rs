//! Parsing of tagged AI responses into medical reports.

use thiserror::Error;

/// Literal answer the model gives for documents it refuses to decode.
pub const REJECTION_PHRASE: &str = "Файл отклонён.";

/// Instruction prepended to every document request. It pins the tagged
/// answer format that [`parse_report`] expects.
pub const DOCUMENT_INSTRUCTION: &str = "Расшифруй приложенные результаты медицинских анализов. \
Ответ верни строго в формате: <Info>название и краткое описание анализа</Info>\
<Indicators>показатели и их значения</Indicators>\
<Recommendations>рекомендации</Recommendations>. \
Если документ не является медицинским анализом, ответь ровно одной фразой: Файл отклонён.";

const RECOMMENDATIONS_START: &str = "<Recommendations>";
const RECOMMENDATIONS_END: &str = "</Recommendations>";
const INDICATORS_START: &str = "<Indicators>";
const INDICATORS_END: &str = "</Indicators>";
const INFO_START: &str = "<Info>";
const INFO_END: &str = "</Info>";

/// A decoded report, split into its three tagged sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalReport {
    pub recommendations: String,
    pub indicators: String,
    pub info: String,
}

/// Why a response could not be turned into a [`MedicalReport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The model refused the document outright.
    #[error("{REJECTION_PHRASE}")]
    Rejected,

    /// A section marker was missing or malformed.
    #[error("missing section: {0}")]
    MissingSection(&'static str),
}

/// Extract the text between a start and end marker.
fn section(text: &str, start: &str, end: &str, name: &'static str) -> Result<String, ReportError> {
    let from = text
        .find(start)
        .ok_or(ReportError::MissingSection(name))?
        + start.len();
    let to = text.find(end).ok_or(ReportError::MissingSection(name))?;
    if to < from {
        return Err(ReportError::MissingSection(name));
    }
    Ok(text[from..to].to_string())
}

/// Assemble the full prompt for a document request: the user's profile
/// summary, the format instruction, then the extracted document text.
pub fn build_document_prompt(profile: &str, document_text: &str) -> String {
    format!("{profile}\n{DOCUMENT_INSTRUCTION}\n{document_text}")
}

/// Parse a model response into a report.
///
/// A response that equals [`REJECTION_PHRASE`] is surfaced as
/// [`ReportError::Rejected`] so callers can show it to the user without
/// creating a record.
pub fn parse_report(content: &str) -> Result<MedicalReport, ReportError> {
    if content == REJECTION_PHRASE {
        return Err(ReportError::Rejected);
    }

    Ok(MedicalReport {
        recommendations: section(
            content,
            RECOMMENDATIONS_START,
            RECOMMENDATIONS_END,
            "Recommendations",
        )?,
        indicators: section(content, INDICATORS_START, INDICATORS_END, "Indicators")?,
        info: section(content, INFO_START, INFO_END, "Info")?,
    })
}
