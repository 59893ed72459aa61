use std::{
    collections::HashMap,
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::PathBuf,
};

use home::home_dir;
use serde::{Deserialize, Serialize};

use crate::ChordSyncError;

/// Named loop region saved for a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopPreset {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

/// Loop presets keyed by song identity, persisted as JSON.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct PresetStore {
    presets: HashMap<String, Vec<LoopPreset>>,
}

impl PresetStore {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".chordsync";

    pub fn presets_for(&self, song_id: &str) -> &[LoopPreset] {
        self.presets.get(song_id).map_or(&[], Vec::as_slice)
    }

    /// Adds or replaces the preset with the same name, then persists.
    pub fn save_preset(&mut self, song_id: &str, preset: LoopPreset) -> Result<(), ChordSyncError> {
        let entry = self.presets.entry(song_id.to_string()).or_default();
        match entry.iter_mut().find(|existing| existing.name == preset.name) {
            Some(existing) => *existing = preset,
            None => entry.push(preset),
        }
        self.save_store()
    }

    pub fn remove_preset(&mut self, song_id: &str, name: &str) -> Result<(), ChordSyncError> {
        if let Some(entry) = self.presets.get_mut(song_id) {
            entry.retain(|preset| preset.name != name);
            if entry.is_empty() {
                self.presets.remove(song_id);
            }
            return self.save_store();
        }
        Ok(())
    }

    fn get_base_path() -> Result<PathBuf, ChordSyncError> {
        let home = home_dir().ok_or_else(|| {
            ChordSyncError::ConfigError("Could not find home directory".to_string())
        })?;
        let path = home.join(Self::FOLDER);
        Ok(path)
    }

    fn get_path() -> Result<PathBuf, ChordSyncError> {
        let base = Self::get_base_path()?;
        Ok(base.join("presets.json"))
    }

    /// Creates an empty store on disk if none exists
    pub fn read_store() -> Result<Self, ChordSyncError> {
        let base_path = Self::get_base_path()?;
        if !base_path.exists() {
            create_dir_all(base_path)?;
        }
        let store_path = Self::get_path()?;
        if !store_path.exists() {
            PresetStore::default().save_store()?;
        }
        let file = File::open(store_path)?;
        let reader = BufReader::new(file);
        let store: PresetStore = serde_json::from_reader(reader).map_err(|err| {
            ChordSyncError::ConfigError(format!("Could not read preset store {err:}"))
        })?;
        Ok(store)
    }

    /// Assumes the store folder exists
    pub fn save_store(&self) -> Result<(), ChordSyncError> {
        let store_path = Self::get_path()?;
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            ChordSyncError::ConfigError(format!("Could not save preset store {err:}"))
        })?;
        let mut file = File::create(store_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
