//! Outbound SMS.
//!
//! `SmsSender` is the seam the order notifier talks to. `AfricasTalkingSms`
//! is the real gateway; `LogSms` stands in when no credentials are set.

use async_trait::async_trait;
use thiserror::Error;

pub mod africastalking;
pub mod log_sms;

pub use africastalking::AfricasTalkingSms;
pub use log_sms::LogSms;

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("failed to reach SMS gateway: {0}")]
    Request(String),

    #[error("failed to decode gateway response: {0}")]
    Decode(String),

    #[error("no recipients in gateway response")]
    NoRecipients,

    #[error("SMS rejected: {status} (code: {code})")]
    Rejected { status: String, code: i64 },
}

/// Sends a single text message.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Sends `message` to `to`. The number is normalized by the implementation.
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError>;

    /// The gateway name, for logs.
    fn provider_name(&self) -> &str;
}

/// Masks all but the last four characters of a phone number for logging.
///
/// # Example
///
/// ```ignore
/// assert_eq!(mask_phone_number("+254700000000"), "+********0000");
/// ```
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let masked_count = chars.len() - 4;
    let last_digits: String = chars[masked_count..].iter().collect();

    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(masked_count - 1), last_digits)
    } else {
        format!("{}{}", "*".repeat(masked_count), last_digits)
    }
}

/// Normalizes a phone number to `+<country><number>`, assuming Kenya (+254).
///
/// Spaces, dashes and parentheses are dropped. A leading `0` is replaced by
/// `+254`; any other number without a `+` gets `+254` prepended.
pub fn normalize_phone_number(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if let Some(rest) = digits.strip_prefix('0') {
        format!("+254{}", rest)
    } else if digits.starts_with('+') {
        digits
    } else {
        format!("+254{}", digits)
    }
}
