//! Shared application domain and persistence modules.

pub mod activity;
pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;
pub mod money;
pub mod uuids;

#[cfg(test)]
mod test;
