//! order-confirm - automated supplier-portal submission
//!
//! Library crate behind the `order-confirm` binary. One run performs a
//! fixed sequence of portal calls (authenticate, upload, process) and
//! reports the terminal outcome to Telegram.

pub mod config;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod portal;
pub mod types;
