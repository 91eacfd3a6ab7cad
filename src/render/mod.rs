//! Notification rendering.

mod message;

pub use message::{MessagePayload, render};
