//! Twilio Voice Dialer
//!
//! Places the emergency call through Twilio's Calls API with an inline TwiML
//! message read to the emergency contact.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::{CallReceipt, EmergencyDialer};
use crate::error::{DialerError, Result};

/// Twilio credentials and numbers
#[derive(Clone, Debug)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Twilio number the call comes from
    pub from_number: String,
    /// Number that receives the emergency call
    pub emergency_contact: String,
    /// API base URL, without trailing slash
    pub base_url: String,
}

impl TwilioConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twilio.com";
    
    /// Read the Twilio settings from the environment
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` naming every missing variable.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        
        let account_sid = read("TWILIO_ACCOUNT_SID");
        let auth_token = read("TWILIO_AUTH_TOKEN");
        let from_number = read("TWILIO_FROM_NUMBER");
        let emergency_contact = read("EMERGENCY_CONTACT");
        
        match (account_sid, auth_token, from_number, emergency_contact) {
            (
                Some(account_sid),
                Some(auth_token),
                Some(from_number),
                Some(emergency_contact),
            ) => Ok(Self {
                account_sid,
                auth_token,
                from_number,
                emergency_contact,
                base_url: read("TWILIO_BASE_URL")
                    .map_or_else(
                        || Self::DEFAULT_BASE_URL.into(),
                        |u| u.trim_end_matches('/').to_string(),
                    ),
            }),
            (sid, token, from, contact) => {
                let missing: Vec<&str> = [
                    ("TWILIO_ACCOUNT_SID", sid.is_none()),
                    ("TWILIO_AUTH_TOKEN", token.is_none()),
                    ("TWILIO_FROM_NUMBER", from.is_none()),
                    ("EMERGENCY_CONTACT", contact.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(DialerError::NotConfigured(missing.join(", ")))
            }
        }
    }
}

#[derive(Deserialize)]
struct CallResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct TwilioErrorBody {
    message: String,
}

/// Places calls through Twilio
pub struct TwilioDialer {
    client: Client,
    config: TwilioConfig,
}

impl TwilioDialer {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }
    
    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.config.base_url, self.config.account_sid
        )
    }
}

/// Spoken message for the emergency contact
fn twiml(reason: &str) -> String {
    format!(
        "<Response><Say>This is an automated alert from SafeSpace. \
         A user may be at risk of self-harm. Reason: {}. \
         Please check on them immediately.</Say></Response>",
        xml_escape(reason)
    )
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[async_trait]
impl EmergencyDialer for TwilioDialer {
    async fn place_call(&self, reason: &str) -> Result<CallReceipt> {
        let twiml = twiml(reason);
        let form = [
            ("To", self.config.emergency_contact.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Twiml", twiml.as_str()),
        ];
        
        let response = self.client
            .post(self.calls_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;
        
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(DialerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        
        let body = response.text().await?;
        let call: CallResource = serde_json::from_str(&body)
            .map_err(|e| DialerError::InvalidReceipt(e.to_string()))?;
        Ok(CallReceipt {
            sid: call.sid,
            status: call.status.unwrap_or_else(|| "unknown".into()),
            placed_at: Utc::now(),
        })
    }
    
    fn name(&self) -> &'static str {
        "Twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+15550001111".into(),
            emergency_contact: "+15559998888".into(),
            base_url,
        }
    }

    #[test]
    fn test_twiml_escapes_reason() {
        let xml = twiml("self-harm <intent> & \"plan\"");
        assert!(xml.contains("self-harm &lt;intent&gt; &amp; &quot;plan&quot;"));
        assert!(xml.starts_with("<Response><Say>"));
    }

    #[tokio::test]
    async fn test_place_call() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Calls.json"))
            .and(basic_auth("AC123", "secret"))
            .and(body_string_contains("To=%2B15559998888"))
            .and(body_string_contains("From=%2B15550001111"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": "CA42",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;
        
        let dialer = TwilioDialer::new(config(server.uri())).unwrap();
        let receipt = dialer.place_call("User expressing self-harm intent").await.unwrap();
        
        assert_eq!(receipt.sid, "CA42");
        assert_eq!(receipt.status, "queued");
    }

    #[tokio::test]
    async fn test_rejected_call() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number.",
                "status": 400
            })))
            .mount(&server)
            .await;
        
        let dialer = TwilioDialer::new(config(server.uri())).unwrap();
        let err = dialer.place_call("risk").await.unwrap_err();
        
        match err {
            DialerError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("not a valid phone number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_receipt() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;
        
        let dialer = TwilioDialer::new(config(server.uri())).unwrap();
        let err = dialer.place_call("risk").await.unwrap_err();
        
        assert!(matches!(err, DialerError::InvalidReceipt(_)));
    }
}
