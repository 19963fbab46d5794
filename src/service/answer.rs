//! Answer extraction from generation responses.

use super::ServiceError;
use crate::generation::{Candidate, GenerateContentResponse};

const NORMAL_FINISH: &str = "STOP";

/// Locate the answer text in a generation response and return it trimmed.
///
/// Lookup order: top-level `text`, then the first candidate's `content.parts` (concatenated),
/// `content.text`, the serialized content, `candidate.text` and finally the serialized
/// candidate. Serialized fallbacks are skipped when the candidate reports a finish reason
/// other than `STOP`.
pub fn extract_answer(response: &GenerateContentResponse) -> Result<String, ServiceError> {
    let mut abnormal_finish = None;

    let answer = if let Some(text) = response.text.as_deref().filter(|text| !text.is_empty()) {
        tracing::debug!("Extracted answer from response text");
        Some(text.to_string())
    } else if let Some(candidate) = response.candidates.first() {
        if let Some(reason) = candidate.finish_reason.as_deref()
            && reason != NORMAL_FINISH
        {
            tracing::warn!(finish_reason = reason, "Candidate did not finish normally");
            abnormal_finish = Some(reason.to_string());
        }
        candidate_text(candidate, abnormal_finish.is_none())
    } else {
        None
    };

    let Some(answer) = answer.filter(|answer| !answer.is_empty()) else {
        if let Some(feedback) = &response.prompt_feedback {
            tracing::warn!(?feedback, "Prompt feedback received");
            if let Some(reason) = feedback.block_reason.as_deref() {
                return Err(ServiceError::Blocked(reason.to_string()));
            }
        }
        tracing::error!(
            candidates = response.candidates.len(),
            response = %serde_json::to_string(response).unwrap_or_default(),
            "Could not extract answer from response"
        );
        return Err(ServiceError::MissingAnswer {
            finish_reason: abnormal_finish,
        });
    };

    let trimmed = answer.trim();
    if trimmed.is_empty() {
        tracing::error!("Generated answer is empty after extraction");
        return Err(ServiceError::EmptyAnswer);
    }
    Ok(trimmed.to_string())
}

fn candidate_text(candidate: &Candidate, allow_serialized: bool) -> Option<String> {
    let Some(content) = &candidate.content else {
        if candidate.text.is_some() {
            return candidate.text.clone();
        }
        return allow_serialized
            .then(|| serde_json::to_string(candidate).ok())
            .flatten();
    };

    if let Some(parts) = &content.parts {
        let joined: String = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        tracing::debug!(parts = parts.len(), "Extracted answer from content parts");
        return Some(joined);
    }
    if content.text.is_some() {
        return content.text.clone();
    }
    allow_serialized
        .then(|| serde_json::to_string(content).ok())
        .flatten()
}
