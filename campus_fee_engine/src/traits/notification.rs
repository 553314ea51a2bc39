use log::info;
use thiserror::Error;

/// An out-of-band message sink (SMS, e-mail, ...). Delivery mechanics live outside this engine; subscribers
/// attach a sink to the payment-completed hook. A failing sink is logged and swallowed — it must never roll
/// back a completed payment.
#[allow(async_fn_in_trait)]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, student_id: &str, message: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, Error)]
#[error("Could not dispatch notification: {0}")]
pub struct NotificationError(pub String);

/// Default sink: writes the message to the log. Useful for development and as a stand-in when no SMS provider
/// is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    async fn notify(&self, student_id: &str, message: &str) -> Result<(), NotificationError> {
        info!("📨️ Notification for {student_id}: {message}");
        Ok(())
    }
}
