//! Wire types for the Gemini `generateContent` call.
//!
//! The completion envelope and the advice payload inside it are decoded
//! leniently: the advisor is an untrusted collaborator, so absent fields
//! become defaults here and anything structurally broken becomes a decode
//! error in the adapter.

use serde::Deserialize;

use crate::domain::catalog::ServiceId;
use crate::domain::ports::Advice;

/// Reasoning used when the advisor answers without any.
pub(super) const DEFAULT_REASONING: &str =
    "Based on your search, we recommend checking our service catalog.";

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateDto {
    #[serde(default)]
    content: Option<ContentDto>,
}

#[derive(Debug, Deserialize)]
struct ContentDto {
    #[serde(default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
struct PartDto {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponseDto {
    /// Concatenated text of the first candidate, if any was produced.
    pub(super) fn completion_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// The JSON schema the prompt instructs the model to answer with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AdviceDto {
    #[serde(default)]
    recommended_category: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    suggested_service_ids: Vec<String>,
}

impl From<AdviceDto> for Advice {
    fn from(dto: AdviceDto) -> Self {
        Self {
            recommended_category: dto
                .recommended_category
                .filter(|name| !name.trim().is_empty()),
            reasoning: dto
                .reasoning
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASONING.to_owned()),
            suggested_service_ids: dto
                .suggested_service_ids
                .into_iter()
                .map(ServiceId::new)
                .collect(),
        }
    }
}
