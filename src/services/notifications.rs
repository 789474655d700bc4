use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::notification::Notification;
use crate::sms::{mask_phone_number, SmsSender};

/// Sends order notifications without holding up the request that caused them.
#[derive(Clone)]
pub struct OrderNotifier {
    sms: Arc<dyn SmsSender>,
}

impl OrderNotifier {
    pub fn new(sms: Arc<dyn SmsSender>) -> Self {
        Self { sms }
    }

    /// Sends `notification` on a detached task.
    ///
    /// The outcome is only logged. There is no retry. The handle is returned
    /// so callers that care can wait on it; request handlers drop it.
    pub fn dispatch(&self, notification: Notification) -> JoinHandle<()> {
        let sms = self.sms.clone();

        tokio::spawn(async move {
            let masked = mask_phone_number(&notification.to);
            match sms.send(&notification.to, &notification.text).await {
                Ok(()) => {
                    tracing::info!("📨 SMS sent to {} via {}", masked, sms.provider_name());
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Failed to send SMS to {} via {}: {}",
                        masked,
                        sms.provider_name(),
                        e
                    );
                }
            }
        })
    }
}
