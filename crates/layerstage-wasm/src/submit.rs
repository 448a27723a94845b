//! Completion POST.

use gloo::net::http::Request;
use layerstage_core::session::{CompletionPayload, SubmissionError};
use tracing::debug;

/// Post a completion payload as JSON.
///
/// Any response outside 2xx is a [`SubmissionError::Status`].
pub async fn post_completion(
    endpoint: &str,
    payload: &CompletionPayload,
) -> Result<(), SubmissionError> {
    let body =
        serde_json::to_string(payload).map_err(|e| SubmissionError::Transport(e.to_string()))?;

    debug!(endpoint, confirmed = payload.confirmed, bytes = body.len(), "posting completion");

    let response = Request::post(endpoint)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(|e| SubmissionError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| SubmissionError::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(SubmissionError::Status(response.status()));
    }
    Ok(())
}
