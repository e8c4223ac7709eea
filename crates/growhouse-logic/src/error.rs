//! Failure reasons for player and controller actions.
//!
//! Every fallible operation in this crate returns `Result<_, ActionError>`.
//! A returned error always means the operation was a no-op: callers debit
//! cash or remove entities only on `Ok`.

use crate::grid::GridPos;

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// A device (or plant) already occupies the slot.
    SlotOccupied(GridPos),
    /// The device kind requires a higher player level.
    NotUnlocked { required: u32, current: u32 },
    /// No device is installed at the slot.
    NoDeviceAt(GridPos),
    /// No plant grows at the slot.
    NoPlantAt(GridPos),
    /// The device is already at level 5.
    MaxLevel,
    /// The plant is dead; nothing can be done for it.
    PlantDead,
    /// The plant has not reached the Ready stage.
    NotHarvestable,
    /// The plant was already harvested.
    AlreadyHarvested,
    /// The slot lies outside the farm.
    OutOfBounds(GridPos),
    /// The caller cannot pay for the action.
    InsufficientFunds { needed: f64, available: f64 },
    /// The seed variety has not been unlocked.
    VarietyLocked(String),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::SlotOccupied(pos) => write!(f, "Slot {} already occupied", pos),
            ActionError::NotUnlocked { required, current } => write!(
                f,
                "Equipment not yet unlocked (requires level {}, player is level {})",
                required, current
            ),
            ActionError::NoDeviceAt(pos) => write!(f, "No equipment at {}", pos),
            ActionError::NoPlantAt(pos) => write!(f, "No plant at {}", pos),
            ActionError::MaxLevel => write!(f, "Equipment already at maximum level"),
            ActionError::PlantDead => write!(f, "Plant is dead"),
            ActionError::NotHarvestable => write!(f, "Plant not ready for harvest"),
            ActionError::AlreadyHarvested => write!(f, "Plant already harvested"),
            ActionError::OutOfBounds(pos) => write!(f, "Slot {} is outside the farm", pos),
            ActionError::InsufficientFunds { needed, available } => write!(
                f,
                "Not enough cash: need {:.2}, have {:.2}",
                needed, available
            ),
            ActionError::VarietyLocked(v) => write!(f, "Plant variety '{}' not yet unlocked", v),
        }
    }
}

impl std::error::Error for ActionError {}
