use super::EmotionAnalysis;
use jiff::civil::Date;
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "emotion::export";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to write result: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("result date is not `year/month/day hh:mm:ss`: {0:?}")]
    InvalidDate(String),
}

/// Display form of the record timestamp, without zero-padded month and day.
const DATE_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

/// Saved form of one analysis result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub date: String,
    pub emotion_analysis: EmotionAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl ResultRecord {
    pub fn new(emotion_analysis: EmotionAnalysis, transcript: Option<String>) -> Self {
        Self::at(&Zoned::now(), emotion_analysis, transcript)
    }

    pub fn at(when: &Zoned, emotion_analysis: EmotionAnalysis, transcript: Option<String>) -> Self {
        Self {
            date: when.strftime(DATE_FORMAT).to_string(),
            emotion_analysis,
            transcript: transcript.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Calendar day of `date`.
    pub fn day(&self) -> Result<Date, ExportError> {
        let invalid = || ExportError::InvalidDate(self.date.clone());
        let calendar = self.date.split_whitespace().next().ok_or_else(invalid)?;
        let mut parts = calendar.split('/');
        let mut next = || parts.next().map(str::trim);

        let year: i16 = next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let month: i8 = next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let day: i8 = next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if next().is_some() {
            return Err(invalid());
        }
        Date::new(year, month, day).map_err(|_| invalid())
    }

    pub fn file_name(&self) -> Result<String, ExportError> {
        Ok(export_file_name(self.day()?))
    }
}

pub fn export_file_name(day: Date) -> String {
    format!("emotion-analysis_{}.json", day.strftime("%Y-%m-%d"))
}

/// Writes `record` as pretty JSON into `dir`, creating it if needed.
pub fn export_result(dir: &Path, record: &ResultRecord) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(record.file_name()?);
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, json)?;

    tracing::info!(target: LOG_TARGET, path = %path.display(), "result exported");
    Ok(path)
}
