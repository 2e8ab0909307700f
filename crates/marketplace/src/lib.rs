//! Marketplace side of the watcher: fetch plugin metadata, normalize it into
//! [`PluginVersionInfo`] records and pick out the recently updated ones.
//!
//! Flow per invocation:
//! 1. [`collector::collect_all`] fetches each identifier in order through a
//!    [`PluginSource`], dropping the ones that fail.
//! 2. [`extract::extract`] maps `data.plugin` onto a record with sentinel
//!    fallbacks.
//! 3. [`recency::filter_recent`] keeps the records updated inside the window.

pub mod client;
pub mod collector;
pub mod error;
pub mod extract;
pub mod recency;
pub mod summary;
pub mod timestamp;

pub use {
    client::{MarketplaceClient, PluginSource, plugin_path},
    collector::collect_all,
    error::{FetchError, TimestampError},
    extract::{PluginVersionInfo, UNKNOWN, extract},
    recency::{filter_recent, partition_recent},
};
