use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{mask_phone_number, normalize_phone_number, SmsError, SmsSender};
use crate::config::SmsSettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status codes the gateway uses for an accepted message ("Processed", "Sent").
const ACCEPTED_STATUS_CODES: [i64; 2] = [101, 102];

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(rename = "SMSMessageData")]
    data: MessageData,
}

#[derive(Debug, Deserialize)]
struct MessageData {
    #[serde(rename = "Recipients", default)]
    recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
struct Recipient {
    #[serde(rename = "statusCode")]
    status_code: i64,
    #[serde(default)]
    status: String,
}

/// Africa's Talking messaging API client.
pub struct AfricasTalkingSms {
    http: reqwest::Client,
    settings: SmsSettings,
}

impl AfricasTalkingSms {
    pub fn new(settings: SmsSettings) -> Result<Self, SmsError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SmsError::Request(e.to_string()))?;

        tracing::info!(
            "✅ Africa's Talking SMS client initialized for user {}",
            settings.username
        );

        Ok(Self { http, settings })
    }
}

/// Reads the first recipient's status out of a gateway response body.
fn check_response(body: &[u8]) -> Result<(), SmsError> {
    // The parser's message quotes the body, which carries the recipient's number.
    let response: GatewayResponse = sonic_rs::from_slice(body).map_err(|e| {
        SmsError::Decode(format!("{:?} at line {} column {}", e.classify(), e.line(), e.column()))
    })?;

    let recipient = response
        .data
        .recipients
        .first()
        .ok_or(SmsError::NoRecipients)?;

    if ACCEPTED_STATUS_CODES.contains(&recipient.status_code) {
        Ok(())
    } else {
        Err(SmsError::Rejected {
            status: recipient.status.clone(),
            code: recipient.status_code,
        })
    }
}

#[async_trait]
impl SmsSender for AfricasTalkingSms {
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        let to = normalize_phone_number(to);

        let mut form = vec![
            ("username", self.settings.username.as_str()),
            ("to", to.as_str()),
            ("message", message),
        ];
        if let Some(sender_id) = self.settings.sender_id.as_deref() {
            form.push(("from", sender_id));
        }

        let response = self
            .http
            .post(&self.settings.base_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("apikey", self.settings.api_key.as_str())
            .form(&form)
            .send()
            .await
            .map_err(|e| SmsError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SmsError::Request(e.to_string()))?;
        tracing::debug!(
            "SMS gateway answered {} for {} ({} bytes)",
            status,
            mask_phone_number(&to),
            body.len()
        );

        check_response(&body)
    }

    fn provider_name(&self) -> &str {
        "africastalking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Router};
    use std::sync::{Arc, Mutex};
    use zeroize::Zeroizing;

    #[test]
    fn test_accepted_status_codes() {
        let ok = br#"{"SMSMessageData":{"Message":"Sent to 1/1","Recipients":[{"statusCode":101,"number":"+254700000000","status":"Success","cost":"KES 0.8","messageId":"x"}]}}"#;
        assert!(check_response(ok).is_ok());

        let queued = br#"{"SMSMessageData":{"Recipients":[{"statusCode":102,"status":"Queued"}]}}"#;
        assert!(check_response(queued).is_ok());
    }

    #[test]
    fn test_rejected_and_empty_responses() {
        let rejected = br#"{"SMSMessageData":{"Recipients":[{"statusCode":403,"status":"InvalidPhoneNumber"}]}}"#;
        match check_response(rejected) {
            Err(SmsError::Rejected { status, code }) => {
                assert_eq!(status, "InvalidPhoneNumber");
                assert_eq!(code, 403);
            }
            other => panic!("unexpected: {:?}", other),
        }

        let empty = br#"{"SMSMessageData":{"Message":"InvalidSenderId","Recipients":[]}}"#;
        assert!(matches!(check_response(empty), Err(SmsError::NoRecipients)));

        assert!(matches!(check_response(b"Unauthorized"), Err(SmsError::Decode(_))));

        let odd = br#"{"SMSMessageData":{"Recipients":[{"statusCode":"+254700000123","status":"x"}]}}"#;
        match check_response(odd) {
            Err(SmsError::Decode(message)) => assert!(!message.contains("700000123")),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_posts_form_with_api_key() {
        let seen: Arc<Mutex<Option<(String, String)>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();

        let app = Router::new().route(
            "/messaging",
            post(move |headers: HeaderMap, body: String| {
                let captured = captured.clone();
                async move {
                    let key = headers
                        .get("apikey")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((key, body));
                    r#"{"SMSMessageData":{"Recipients":[{"statusCode":101,"status":"Success"}]}}"#
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/messaging", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let sms = AfricasTalkingSms::new(SmsSettings {
            username: "sandbox".to_string(),
            api_key: Zeroizing::new("at-key".to_string()),
            sender_id: Some("SHOP".to_string()),
            base_url: base,
        })
        .unwrap();

        sms.send("0700 000 000", "hello there").await.unwrap();

        let (key, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(key, "at-key");
        assert!(body.contains("username=sandbox"));
        assert!(body.contains("to=%2B254700000000"));
        assert!(body.contains("message=hello+there"));
        assert!(body.contains("from=SHOP"));
    }
}
