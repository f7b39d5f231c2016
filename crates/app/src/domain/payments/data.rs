//! Payments Data

use serde::Deserialize;

use crate::{domain::bookings::records::BookingRecord, gateway::TransactionStatus};

/// Provider event sent when a charge settles.
pub const CHARGE_SUCCESS_EVENT: &str = "charge.success";

/// Result of reconciling a payment against a booking.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// The booking moved from pending to confirmed.
    Confirmed(BookingRecord),

    /// The booking had already been confirmed; nothing changed.
    AlreadyConfirmed(BookingRecord),

    /// The provider has not settled the payment. The booking stays pending.
    NotPaid {
        booking: BookingRecord,
        status: TransactionStatus,
    },
}

impl PaymentOutcome {
    #[must_use]
    pub fn booking(&self) -> &BookingRecord {
        match self {
            Self::Confirmed(booking)
            | Self::AlreadyConfirmed(booking)
            | Self::NotPaid { booking, .. } => booking,
        }
    }

    /// Whether the booking is confirmed after reconciliation.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::AlreadyConfirmed(_))
    }
}

/// What a webhook delivery led to.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// Missing or invalid signature; the payload was not read.
    Rejected,

    /// Authentic, but not an event that confirms a booking.
    Ignored,

    /// The payment was reconciled against a booking.
    Processed(PaymentOutcome),
}

/// The parts of a provider webhook delivery the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEventData {
    pub reference: String,
}

impl WebhookEvent {
    #[must_use]
    pub fn is_charge_success(&self) -> bool {
        self.event == CHARGE_SUCCESS_EVENT
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn webhook_event_ignores_extra_fields() -> TestResult {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "charge.success",
                "data": {
                    "id": 302961,
                    "status": "success",
                    "reference": "hb_0192f0c1",
                    "amount": 18562500,
                    "customer": { "email": "ada@example.com" }
                }
            }"#,
        )?;

        assert!(event.is_charge_success());
        assert_eq!(event.data.reference, "hb_0192f0c1");

        Ok(())
    }

    #[test]
    fn other_events_are_not_charge_success() -> TestResult {
        let event: WebhookEvent = serde_json::from_str(
            r#"{ "event": "transfer.success", "data": { "reference": "tr_1" } }"#,
        )?;

        assert!(!event.is_charge_success());

        Ok(())
    }
}
