//! Activity feed logging

use tokio::{
    sync::broadcast::{Receiver, error::RecvError},
    task::JoinHandle,
};
use tracing::{info, warn};

use hearth_app::activity::{ActivityEvent, BroadcastActivityFeed};

use crate::observability::observe_activity;

/// Log every event published to the feed until it closes.
pub(crate) fn spawn_logger(feed: &BroadcastActivityFeed) -> JoinHandle<u64> {
    tokio::spawn(log_events(feed.subscribe()))
}

/// Drain `receiver`, returning how many events were logged.
async fn log_events(mut receiver: Receiver<ActivityEvent>) -> u64 {
    let mut logged = 0;

    loop {
        match receiver.recv().await {
            Ok(event) => {
                let payload = serde_json::to_string(&event).unwrap_or_default();

                info!(target: "hearth::activity", event = event.kind(), %payload, "activity");

                observe_activity(event.kind());

                logged += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(target: "hearth::activity", skipped, "activity logger fell behind");
            }
            Err(RecvError::Closed) => return logged,
        }
    }
}

#[cfg(test)]
mod tests {
    use hearth_app::activity::ActivityPublisher;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn logger_drains_feed_until_closed() -> TestResult {
        let feed = BroadcastActivityFeed::new(8);
        let handle = spawn_logger(&feed);
        let booking_uuid = Uuid::now_v7();

        feed.publish(ActivityEvent::BookingConfirmed { booking_uuid });
        feed.publish(ActivityEvent::BookingCancelled { booking_uuid });

        drop(feed);

        assert_eq!(handle.await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn lagged_events_are_skipped_not_fatal() -> TestResult {
        let feed = BroadcastActivityFeed::new(1);
        let receiver = feed.subscribe();

        for _ in 0..3 {
            feed.publish(ActivityEvent::BookingCancelled {
                booking_uuid: Uuid::now_v7(),
            });
        }

        drop(feed);

        assert_eq!(log_events(receiver).await, 1);

        Ok(())
    }
}
