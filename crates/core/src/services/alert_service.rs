use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::portfolio::Portfolio;
use crate::notify::{AlertNotification, NotificationSink, PermissionStatus};

/// Evaluates one-shot alert rules against a price snapshot and delivers
/// notifications for the ones that trip.
///
/// Per rule the state machine is {Active, Triggered, Deleted}; only
/// Active→Triggered is automatic, and Triggered implies deletion, so a
/// rule notifies at most once. The delivery sink is injected.
pub struct AlertService {
    notifier: Box<dyn NotificationSink>,
}

impl AlertService {
    pub fn new(notifier: Box<dyn NotificationSink>) -> Self {
        Self { notifier }
    }

    /// Ask the platform for notification permission, logging instead of
    /// failing — used opportunistically at startup.
    pub async fn request_permission(&self) {
        match self.notifier.request_permission().await {
            Ok(status) => debug!(?status, "notification permission requested"),
            Err(e) => warn!("notification permission request failed: {e}"),
        }
    }

    /// Run one evaluation cycle. Returns the ids of rules that triggered
    /// (and were therefore deleted from the portfolio).
    ///
    /// - Without granted permission nothing is evaluated: a re-request
    ///   is fired and the cycle ends. No partial evaluation.
    /// - Rules are scanned newest-created-first; that order is part of
    ///   the contract (it fixes the sequence of deliveries and logs).
    /// - A rule whose coin id is absent from the snapshot is skipped
    ///   unchanged — a missing price is not evidence of anything.
    /// - A rule is deleted only after the sink accepts its notification;
    ///   if delivery fails the rule stays Active for the next cycle.
    pub async fn evaluate(
        &self,
        portfolio: &mut Portfolio,
        prices: &HashMap<String, f64>,
    ) -> Vec<Uuid> {
        if self.notifier.permission_status().await != PermissionStatus::Granted {
            warn!("notifications not authorized, requesting permission again");
            self.request_permission().await;
            return Vec::new();
        }

        let mut rules = portfolio.alerts.clone();
        rules.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut triggered: Vec<Uuid> = Vec::new();

        for rule in &rules {
            let Some(&current_price) = prices.get(&rule.coin_id) else {
                debug!(coin_id = %rule.coin_id, "no price for alert, skipping");
                continue;
            };

            let change_percent =
                (current_price - rule.reference_price) / rule.reference_price * 100.0;
            let threshold = rule.signed_percentage;
            let should_trigger = (threshold > 0.0 && change_percent >= threshold)
                || (threshold < 0.0 && change_percent <= threshold);
            if !should_trigger {
                continue;
            }

            let notification = AlertNotification::price_alert(
                &rule.symbol,
                change_percent,
                current_price,
                rule.reference_price,
            );
            match self.notifier.deliver(&notification).await {
                Ok(()) => {
                    debug!(
                        symbol = %rule.symbol,
                        change_percent,
                        "alert triggered, rule deleted"
                    );
                    triggered.push(rule.id);
                }
                Err(e) => {
                    // Rule stays Active; it will be re-evaluated next cycle.
                    warn!(symbol = %rule.symbol, "alert notification failed: {e}");
                }
            }
        }

        if !triggered.is_empty() {
            portfolio.alerts.retain(|a| !triggered.contains(&a.id));
        }
        triggered
    }
}
