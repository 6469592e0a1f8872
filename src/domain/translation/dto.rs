use serde::{Deserialize, Serialize};

/// Text to translate into one or more target languages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// `None` lets the service detect the source language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub target: String,
    pub text: String,
}

/// One translation per requested target, in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_source: Option<String>,
    pub translations: Vec<Translation>,
}

impl TranslationResponse {
    pub fn text_for(&self, target: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.target.eq_ignore_ascii_case(target))
            .map(|t| t.text.as_str())
    }
}
