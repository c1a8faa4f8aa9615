//! Removable-media presence and per-device file paths.
//!
//! The operating system auto-mounts inserted media under a fixed root
//! (`/media/pi` on the deployed image); each volume becomes one directory
//! under that root.  Presence is therefore "the root has at least one
//! entry".  The reconfiguration controller polls this once per loop
//! iteration — there is no asynchronous notification.

use std::path::{Path, PathBuf};

/// External media signal consumed by the reconfiguration controller.
pub trait MediaWatch {
    /// Whether media is currently present.
    fn is_present(&mut self) -> bool;

    /// True exactly once per absent→present transition.
    ///
    /// The watch starts in the "absent" state, so media already present at
    /// process start yields one insertion event — initial load and reload
    /// go through the same path.
    fn was_reinserted(&mut self) -> bool;

    /// Path of this device's schedule file on the current volume.
    fn schedule_path(&mut self, id: u32) -> Option<PathBuf>;

    /// Path of this device's timing configuration file on the current volume.
    fn config_path(&mut self, id: u32) -> Option<PathBuf>;
}

/// [`MediaWatch`] over a mount-root directory.
pub struct MountWatch {
    root:    PathBuf,
    present: bool,
}

impl MountWatch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), present: false }
    }

    /// The first (sorted) volume directory under the root, if any.
    ///
    /// Field procedure is one stick at a time; if several are mounted the
    /// first is used and the rest are ignored with a warning.
    fn volume(&self) -> Option<PathBuf> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "mount root unreadable");
                return None;
            }
        };
        let mut volumes: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        volumes.sort();
        if volumes.len() > 1 {
            tracing::warn!(count = volumes.len(), "multiple volumes mounted, using the first");
        }
        volumes.into_iter().next()
    }

    fn file_path(&mut self, name: String) -> Option<PathBuf> {
        let path = self.volume()?.join(name);
        path.is_file().then_some(path)
    }
}

impl MediaWatch for MountWatch {
    fn is_present(&mut self) -> bool {
        self.present = self.volume().is_some();
        self.present
    }

    fn was_reinserted(&mut self) -> bool {
        let before = self.present;
        let now = self.is_present();
        if !before && now {
            tracing::info!(root = %self.root.display(), "media inserted");
            true
        } else {
            false
        }
    }

    fn schedule_path(&mut self, id: u32) -> Option<PathBuf> {
        self.file_path(format!("{id}_schedule.txt"))
    }

    fn config_path(&mut self, id: u32) -> Option<PathBuf> {
        self.file_path(format!("{id}_config.txt"))
    }
}

/// Default mount root on the deployed image.
pub fn default_mount_root() -> &'static Path {
    Path::new("/media/pi")
}
