use async_trait::async_trait;

use super::{mask_phone_number, normalize_phone_number, SmsError, SmsSender};

/// Writes messages to the log instead of sending them.
///
/// Used when no gateway credentials are configured.
#[derive(Debug, Clone, Default)]
pub struct LogSms;

#[async_trait]
impl SmsSender for LogSms {
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        let to = normalize_phone_number(to);
        tracing::info!(
            "📱 [log-only SMS] to {}: {}",
            mask_phone_number(&to),
            message
        );
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
