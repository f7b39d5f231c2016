//! Service test harness.

mod db;
pub(crate) mod helpers;

pub(crate) use context::{TEST_WEBHOOK_SECRET, TestContext};
