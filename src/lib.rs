//! Polls the Practicum homework API and forwards review status changes to Telegram.

pub mod config;
pub mod model;
pub mod notifier;
pub mod poller;
pub mod practicum;
pub mod response;
pub mod status;
