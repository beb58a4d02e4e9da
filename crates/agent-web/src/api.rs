//! API Client

use serde::{Deserialize, Serialize};

/// Gateway reply to `POST /ask`
#[derive(Clone, Debug, Deserialize)]
pub struct AskReply {
    pub response: String,
    pub tool_called: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

/// Send one message to the gateway
///
/// Transport failures and non-2xx statuses come back as `Err` so the page
/// can show them instead of appending a turn.
pub async fn send_ask(message: &str) -> Result<AskReply, String> {
    let client = reqwest::Client::new();

    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:8000".into());

    let response = client
        .post(format!("{origin}/ask"))
        .json(&AskRequest { message })
        .send()
        .await
        .map_err(|e| format!("Could not reach the server: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Server returned {status}"));
    }

    response
        .json::<AskReply>()
        .await
        .map_err(|e| format!("Unexpected reply: {e}"))
}
