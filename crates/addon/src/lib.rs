//! Identifier resolution and stream assembly.
//!
//! An addon request names content by an external id (`tt0903747`,
//! `tmdb:1396:1:1`, `native:<id>`). [`resolve::Resolver`] maps it onto the
//! Jellyfin item graph and turns the playable item into stream descriptors:
//!
//! 1. [`ids`] splits a trailing `:season:episode` off series ids.
//! 2. [`matcher`] classifies the id and finds verified catalog candidates.
//! 3. [`episodes`] picks the episode out of a series.
//! 4. [`streams`] builds one descriptor per media source.
#![allow(clippy::collapsible_if)]
pub mod episodes;
pub mod ids;
pub mod matcher;
pub mod meta;
pub mod resolve;
pub mod streams;

#[cfg(test)]
pub(crate) mod fixtures;
