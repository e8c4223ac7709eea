//! Save/Load functionality for persisting farm state
//!
//! Uses bincode for compact binary serialization of the whole farm.
//! Plants and devices are stored as plain data; device catalog entries are
//! looked up again from each device's kind on load.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use growhouse_logic::config::FarmConfig;
use growhouse_logic::plant::Plant;
use growhouse_logic::registry::DeviceRegistry;

use crate::engine::Farm;
use crate::ledger::Ledger;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a farm
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: FarmConfig,
    pub cash: f64,
    pub player_level: u32,
    pub unlocked_varieties: Vec<String>,
    /// Ticks elapsed since the farm opened
    pub ticks: u64,
    pub plants: Vec<Plant>,
    pub devices: DeviceRegistry,
    pub ledger: Ledger,
}

/// Save the complete farm to a writer
pub fn save_farm<W: Write>(writer: W, farm: &Farm) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        config: farm.config.clone(),
        cash: farm.cash,
        player_level: farm.player_level,
        unlocked_varieties: farm.unlocked_varieties.clone(),
        ticks: farm.ticks,
        plants: farm.plants.values().cloned().collect(),
        devices: farm.devices.clone(),
        ledger: farm.ledger.clone(),
    };

    bincode::serialize_into(writer, &save_data)?;
    log::info!(
        "saved farm on day {} ({} plants, {} devices)",
        farm.current_day(),
        save_data.plants.len(),
        save_data.devices.len()
    );
    Ok(())
}

/// Load a farm from a reader
pub fn load_farm<R: Read>(reader: R) -> Result<Farm, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let farm = Farm::from_save(save_data);
    log::info!(
        "loaded farm on day {} ({} plants, {} devices)",
        farm.current_day(),
        farm.plants.len(),
        farm.devices.len()
    );
    Ok(farm)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use growhouse_logic::equipment::DeviceKind;
    use growhouse_logic::grid::GridPos;

    fn populated() -> Farm {
        let mut farm = Farm::new(FarmConfig {
            seed: Some(11),
            ..FarmConfig::default()
        });
        farm.plant_seed(GridPos::new(0, 0), "basic").unwrap();
        farm.plant_seed(GridPos::new(3, 2), "basic").unwrap();
        farm.install_device(DeviceKind::LedLight, GridPos::new(1, 0))
            .unwrap();
        for _ in 0..5 {
            farm.water(GridPos::new(0, 0)).unwrap();
            farm.tick();
        }
        farm
    }

    #[test]
    fn test_save_load_roundtrip() {
        let farm = populated();

        let mut save_buffer = Vec::new();
        farm.save(&mut save_buffer).expect("Save failed");

        let loaded = Farm::load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.ticks, farm.ticks);
        assert_eq!(loaded.cash, farm.cash);
        assert_eq!(loaded.plants, farm.plants);
        assert_eq!(loaded.devices, farm.devices);
        assert_eq!(loaded.ledger, farm.ledger);
        assert_eq!(loaded.config, farm.config);
    }

    #[test]
    fn test_random_draws_survive_reload() {
        let farm = populated();
        let mut buf = Vec::new();
        save_farm(&mut buf, &farm).unwrap();
        let loaded = load_farm(&buf[..]).unwrap();

        for (pos, plant) in &farm.plants {
            let restored = &loaded.plants[pos];
            assert_eq!(restored.base_yield, plant.base_yield);
            assert_eq!(restored.disease_resistance, plant.disease_resistance);
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let farm = populated();
        let mut buf = Vec::new();
        save_farm(&mut buf, &farm).unwrap();
        // Version is the leading little-endian u32
        buf[..4].copy_from_slice(&99u32.to_le_bytes());

        match load_farm(&buf[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 99);
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("load should fail"),
        }
    }

    #[test]
    fn test_truncated_save_is_codec_error() {
        let farm = populated();
        let mut buf = Vec::new();
        save_farm(&mut buf, &farm).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(load_farm(&buf[..]), Err(SaveError::Bincode(_))));
    }
}
