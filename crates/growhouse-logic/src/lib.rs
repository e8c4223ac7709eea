//! Pure simulation logic for Growhouse.
//!
//! This crate contains the growth/stress engine for plants and the
//! equipment effect, aggregation, and power-cost model. Nothing here owns
//! a clock, a save file, or a UI: functions take plain data and return
//! results, so the controller that schedules ticks (see `growhouse-core`)
//! can be swapped out or driven directly from tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Farm configuration, defaults, and validation |
//! | [`effects`] | Effect keys, tagged effect values, distance-weighted aggregation |
//! | [`environment`] | Environment readings, factor preferences, per-factor stress |
//! | [`equipment`] | Device catalog, effect scaling, wear and maintenance |
//! | [`error`] | Action failure reasons returned by every fallible operation |
//! | [`grid`] | Value-typed farm coordinates |
//! | [`plant`] | Per-plant growth, stress, health, and valuation state machine |
//! | [`power`] | Progressive-tier electricity pricing |
//! | [`registry`] | Position-keyed device registry and daily accounting |
//! | [`variety`] | Seed varieties, yield ranges, and seed costs |

pub mod config;
pub mod effects;
pub mod environment;
pub mod equipment;
pub mod error;
pub mod grid;
pub mod plant;
pub mod power;
pub mod registry;
pub mod variety;
