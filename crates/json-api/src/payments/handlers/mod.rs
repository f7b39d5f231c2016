//! Payment Handlers

pub(crate) mod webhook;
