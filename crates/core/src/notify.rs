use async_trait::async_trait;
use tracing::info;

use crate::errors::CoreError;

/// Seconds between handing a notification to the delivery subsystem and
/// it being shown. Alerts are effectively immediate.
pub const DELIVERY_DELAY_SECS: u64 = 1;

/// Authorization state of the local notification subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Alert + sound granted by the user
    Granted,
    /// Explicitly refused
    Denied,
    /// Never asked
    NotDetermined,
}

/// A fully rendered one-shot local notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNotification {
    pub title: String,
    pub body: String,
    pub sound: bool,
    pub delay_secs: u64,
}

impl AlertNotification {
    /// Render a price-alert notification. Percent is shown with one
    /// decimal and an explicit sign, prices with two decimals.
    #[must_use]
    pub fn price_alert(
        symbol: &str,
        change_percent: f64,
        current_price: f64,
        reference_price: f64,
    ) -> Self {
        Self {
            title: format!("Price Alert: {symbol}"),
            body: format!(
                "{symbol} price changed by {change_percent:+.1}% to ${current_price:.2} \
                 (Alert set at ${reference_price:.2})."
            ),
            sound: true,
            delay_secs: DELIVERY_DELAY_SECS,
        }
    }
}

/// Seam to the platform's local notification subsystem.
///
/// GUI embedders bridge this to their notification center; headless
/// embedders and tests supply their own. Delivery is "enqueue" in the
/// platform sense — a returned `Ok` means the subsystem accepted the
/// request, which is what permits deleting a triggered alert rule.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NotificationSink: Send + Sync {
    /// Current authorization state.
    async fn permission_status(&self) -> PermissionStatus;

    /// Ask the user for alert + sound permission. Returns the resulting
    /// state; platforms may show UI here.
    async fn request_permission(&self) -> Result<PermissionStatus, CoreError>;

    /// Hand a one-shot notification to the delivery subsystem.
    async fn deliver(&self, notification: &AlertNotification) -> Result<(), CoreError>;
}

/// Headless sink: always authorized, writes deliveries to the log.
/// The default when no platform notifier is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NotificationSink for LogNotifier {
    async fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> Result<PermissionStatus, CoreError> {
        Ok(PermissionStatus::Granted)
    }

    async fn deliver(&self, notification: &AlertNotification) -> Result<(), CoreError> {
        info!(title = %notification.title, body = %notification.body, "notification");
        Ok(())
    }
}
