//! Form submission relay: turns an inbound form POST into one outbound email.

pub mod handlers;
pub mod position;
pub mod template;
