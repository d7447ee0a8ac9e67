mod export;

use serde::{Deserialize, Serialize};

pub use export::{export_file_name, export_result, ExportError, ResultRecord};

/// Analysis shown on the result screen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub main_emotion: String,
    pub related_keywords: Vec<String>,
    pub advice: String,
}

impl EmotionAnalysis {
    /// Fixed sample output. No inference is performed on the recording.
    pub fn sample() -> Self {
        Self {
            main_emotion: "a little unsettled".to_owned(),
            related_keywords: vec![
                "boss".to_owned(),
                "work".to_owned(),
                "being asked for favours".to_owned(),
            ],
            advice: "You sound a bit worn out. At times like this, get some sleep, eat \
                     something good, or go and see someone you miss.\n\nToday is said to be \
                     email day. Why not get in touch with someone you haven't talked to in a while?"
                .to_owned(),
        }
    }
}
