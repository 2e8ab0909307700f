//! Notification channels.
//!
//! Each channel (Discord, Slack) is a [`ChannelSchema`]: a small table of
//! payload field names, brand color and the status code its webhook answers
//! with on success. Rendering and dispatch are shared; only the table differs.

pub mod dispatch;
pub mod notify;
pub mod render;
pub mod schema;

pub use {
    dispatch::{DispatchOutcome, WebhookDispatcher},
    notify::{ChannelTarget, NotifyReport, notify_all},
    render::{NotificationRenderer, headline},
    schema::{ChannelKind, ChannelSchema, DISCORD, SLACK},
};
