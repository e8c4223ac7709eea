//! Growhouse Core - Grow-Room Farm Engine
//!
//! Owns the mutable state of one farm: the plant grid, installed
//! equipment, cash, and the spending ledger. All growth and device rules
//! live in `growhouse-logic`; this crate sequences them per tick and
//! moves money when they succeed.
//!
//! # Example
//!
//! ```rust
//! use growhouse_core::prelude::*;
//!
//! let mut farm = Farm::new(FarmConfig {
//!     seed: Some(7),
//!     ..FarmConfig::default()
//! });
//! farm.plant_seed(GridPos::new(0, 0), "basic").unwrap();
//! farm.install_device(DeviceKind::LedLight, GridPos::new(1, 0)).unwrap();
//!
//! for _ in 0..5 {
//!     farm.water(GridPos::new(0, 0)).unwrap();
//!     farm.feed(GridPos::new(0, 0)).unwrap();
//!     farm.tick();
//! }
//! assert_eq!(farm.summary().plants, 1);
//! ```

pub mod engine;
pub mod ledger;
pub mod persistence;
pub mod photosynthesis;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{Farm, FarmSummary};
    pub use crate::ledger::Ledger;
    pub use crate::photosynthesis::PhotosynthesisSummary;
    pub use growhouse_logic::config::FarmConfig;
    pub use growhouse_logic::equipment::DeviceKind;
    pub use growhouse_logic::error::ActionError;
    pub use growhouse_logic::grid::GridPos;
}
