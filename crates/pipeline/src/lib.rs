//! One watcher invocation, start to finish.
//!
//! Lifecycle:
//! 1. Collect plugin versions from the marketplace (or build the synthetic
//!    test record when the trigger asks for a test notification)
//! 2. Keep the ones updated inside the lookback window
//! 3. Render and post to every configured channel
//! 4. Fold the outcome into an [`InvocationResponse`] envelope
//!
//! Nothing here escapes as an error: failures become a `500` envelope.

pub mod event;
pub mod handler;
pub mod response;

pub use {
    event::TriggerEvent,
    handler::{Pipeline, handle},
    response::{InvocationResponse, ResponseBody, SuccessBody},
};
