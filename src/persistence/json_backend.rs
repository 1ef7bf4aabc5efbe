use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::PreferenceBackend;
use crate::constants::storage::{PLAYER_FILE_EXTENSION, TEMP_FILE_SUFFIX};
use crate::player::PlayerId;

/// One `<player id>.json` file per player in a directory
///
/// The directory is created on first write. Writes go to a scratch file that
/// is renamed over the record, so a crash never leaves a half-written record.
#[derive(Debug, Clone)]
pub struct JsonDirectoryBackend {
    directory: PathBuf,
}

impl JsonDirectoryBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the player's record file
    pub fn path_for(&self, player: &PlayerId) -> PathBuf {
        self.directory.join(format!("{}.{}", player, PLAYER_FILE_EXTENSION))
    }

    fn scratch_path_for(&self, player: &PlayerId) -> PathBuf {
        self.directory.join(format!(
            "{}.{}.{}",
            player, PLAYER_FILE_EXTENSION, TEMP_FILE_SUFFIX
        ))
    }
}

impl PreferenceBackend for JsonDirectoryBackend {
    fn read(&self, player: &PlayerId) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(player)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, player: &PlayerId, contents: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;

        let scratch = self.scratch_path_for(player);
        {
            let mut file = File::create(&scratch)?;
            file.write_all(contents)?;
            file.sync_all()?;
        }
        fs::rename(&scratch, self.path_for(player))
    }
}
