//! Activity feed
//!
//! Booking lifecycle notifications for the admin activity feed. Publishing is
//! fire-and-forget: a feed with no listeners, or one that lags, never fails the
//! operation that produced the event.

use hearth::bookings::PaymentMethod;
use mockall::automock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Default number of events buffered per subscriber.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    BookingCreated {
        booking_uuid: Uuid,
        apartment_uuid: Uuid,
        total_amount: u64,
    },
    CheckoutStarted {
        booking_uuid: Uuid,
        payment_method: PaymentMethod,
        reference: String,
    },
    BookingConfirmed {
        booking_uuid: Uuid,
    },
    BookingCancelled {
        booking_uuid: Uuid,
    },
    CouponRedeemed {
        coupon_uuid: Uuid,
        booking_uuid: Uuid,
    },
}

impl ActivityEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::CheckoutStarted { .. } => "checkout_started",
            Self::BookingConfirmed { .. } => "booking_confirmed",
            Self::BookingCancelled { .. } => "booking_cancelled",
            Self::CouponRedeemed { .. } => "coupon_redeemed",
        }
    }
}

#[automock]
pub trait ActivityPublisher: Send + Sync {
    /// Publish an event to any current listeners.
    fn publish(&self, event: ActivityEvent);
}

/// In-process activity feed backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastActivityFeed {
    sender: broadcast::Sender<ActivityEvent>,
}

impl BroadcastActivityFeed {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastActivityFeed {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityPublisher for BroadcastActivityFeed {
    fn publish(&self, event: ActivityEvent) {
        let kind = event.kind();

        match self.sender.send(event) {
            Ok(receivers) => debug!(event = kind, receivers, "published activity"),
            Err(_unheard) => debug!(event = kind, "activity published with no listeners"),
        }
    }
}
