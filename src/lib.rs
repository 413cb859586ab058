#![warn(missing_docs)]
//! Occupiable crafting stations performing timed fiber transformations.
//!
//! The workspace splits along load-time vs run-time lines:
//! [`fibercraft_core`] holds item identity and craft parameters,
//! [`fibercraft_assets`] loads content and runs the config override pass,
//! [`fibercraft_world`] drives the placed stations. This crate ties them
//! together: [`SessionAssets`] performs the ordered load and is the only
//! way to construct stations, so a station can never observe a
//! half-initialized parameter table.

mod system;

pub use system::{SessionAssets, SessionPaths};
