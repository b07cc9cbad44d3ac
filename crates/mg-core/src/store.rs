//! On-disk migration store.
//!
//! [`MigrationStore`] owns nothing but a root path. Every call re-reads the
//! directory tree, so the store never holds a stale view of the filesystem.

use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationName, MigrationUnit, DOWN_SUFFIX, UP_SUFFIX};
use crate::prefix::{format_dir_name, parse_prefix, MAX_INDEX};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `chrono` format for the timestamp shared by an up/down file pair.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A directory rename performed while renumbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    /// Directory name before the rename
    pub from: String,
    /// Directory name after the rename
    pub to: String,
}

/// Reads, creates, and renumbers `NNN_name` migration directories under a
/// single root.
#[derive(Debug, Clone)]
pub struct MigrationStore {
    root: PathBuf,
}

impl MigrationStore {
    /// Create a store rooted at `root`. The directory does not need to exist
    /// yet; it is created on the first scaffold.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The migrations root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover every migration unit under the root.
    ///
    /// Only immediate subdirectories named `NNN_...` are considered; other
    /// entries are ignored. Units are ordered by index, then by ledger key,
    /// so the result never depends on directory listing order.
    pub fn discover(&self) -> CoreResult<Vec<MigrationUnit>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::MigrationsDirNotFound {
                    path: self.root.display().to_string(),
                })
            }
            Err(e) => return Err(CoreError::io(&self.root, e)),
        };

        let mut units = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(directory) = file_name.to_str() else {
                log::debug!("Skipping non UTF-8 directory {}", path.display());
                continue;
            };
            let Some(prefix) = parse_prefix(directory) else {
                continue;
            };

            let scripts = scan_scripts(&path)?;
            units.push(MigrationUnit {
                index: prefix.index,
                directory: directory.to_string(),
                path,
                up_file: scripts.up,
                down_file: scripts.down,
            });
        }

        units.sort_by(|a, b| {
            a.index
                .cmp(&b.index)
                .then_with(|| a.sort_key().cmp(&b.sort_key()))
        });
        Ok(units)
    }

    /// Look up a single migration directory by name.
    ///
    /// Returns `Ok(None)` when the directory does not exist. The directory
    /// name does not need to carry a valid prefix; ledger entries written by
    /// hand are still resolvable.
    pub fn find(&self, directory: &str) -> CoreResult<Option<MigrationUnit>> {
        let path = self.root.join(directory);
        if !path.is_dir() {
            return Ok(None);
        }

        let scripts = scan_scripts(&path)?;
        Ok(Some(MigrationUnit {
            index: parse_prefix(directory).map(|p| p.index).unwrap_or(0),
            directory: directory.to_string(),
            path,
            up_file: scripts.up,
            down_file: scripts.down,
        }))
    }

    /// The index a newly created migration should take: one past the
    /// highest existing prefix, or 1 for an empty or missing root.
    pub fn next_index(&self) -> CoreResult<u32> {
        let units = match self.discover() {
            Ok(units) => units,
            Err(CoreError::MigrationsDirNotFound { .. }) => return Ok(1),
            Err(e) => return Err(e),
        };
        Ok(units.iter().map(|u| u.index).max().map_or(1, |max| max + 1))
    }

    /// Read a migration script and trim surrounding whitespace.
    pub fn read_sql(&self, path: &Path) -> CoreResult<String> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Ok(content.trim().to_string())
    }

    /// Create `{index:03}_{name}` with an empty up/down pair stamped with the
    /// current local time.
    pub fn create_unit(&self, name: &MigrationName, index: u32) -> CoreResult<MigrationUnit> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.create_unit_at(name, index, &timestamp)
    }

    /// Create `{index:03}_{name}` with an empty up/down pair stamped with
    /// `timestamp`.
    ///
    /// Fails if the directory exists or another unit already uses `index`.
    /// Files are created exclusively and never overwrite existing ones.
    pub fn create_unit_at(
        &self,
        name: &MigrationName,
        index: u32,
        timestamp: &str,
    ) -> CoreResult<MigrationUnit> {
        if index == 0 || index > MAX_INDEX {
            return Err(CoreError::InvalidIndex { index });
        }

        fs::create_dir_all(&self.root).map_err(|e| CoreError::io(&self.root, e))?;

        let directory = format_dir_name(index, name);
        let path = self.root.join(&directory);

        if let Some(existing) = self.discover()?.into_iter().find(|u| u.index == index) {
            if existing.directory == directory {
                return Err(CoreError::AlreadyExists {
                    path: path.display().to_string(),
                });
            }
            return Err(CoreError::DuplicateIndex {
                index,
                existing: existing.directory,
            });
        }

        create_dir_exclusive(&path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => CoreError::AlreadyExists {
                path: path.display().to_string(),
            },
            _ => CoreError::io(&path, e),
        })?;

        let up_file = format!("{timestamp}_{name}{UP_SUFFIX}");
        let down_file = format!("{timestamp}_{name}{DOWN_SUFFIX}");

        for file in [&up_file, &down_file] {
            if let Err(e) = create_file_exclusive(&path.join(file)) {
                // The directory was created above, so nothing else lives in it
                if let Err(cleanup) = fs::remove_dir_all(&path) {
                    log::warn!(
                        "Failed to clean up partial migration {}: {}",
                        path.display(),
                        cleanup
                    );
                }
                return Err(e);
            }
        }

        log::info!("Created migration {}", directory);

        Ok(MigrationUnit {
            index,
            directory,
            path,
            up_file: Some(up_file),
            down_file: Some(down_file),
        })
    }

    /// Shift every unit with index >= `from_index` up by one.
    ///
    /// Renames run from the highest index down so a directory is only ever
    /// renamed into a slot that has already been vacated. Nothing is renamed
    /// if any shifted index would exceed [`MAX_INDEX`].
    pub fn renumber(&self, from_index: u32) -> CoreResult<Vec<Renamed>> {
        let mut shifting: Vec<MigrationUnit> = match self.discover() {
            Ok(units) => units.into_iter().filter(|u| u.index >= from_index).collect(),
            Err(CoreError::MigrationsDirNotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        if let Some(overflow) = shifting.iter().find(|u| u.index + 1 > MAX_INDEX) {
            return Err(CoreError::SequenceOverflow {
                directory: overflow.directory.clone(),
                index: overflow.index + 1,
            });
        }

        shifting.sort_by(|a, b| {
            b.index
                .cmp(&a.index)
                .then_with(|| b.directory.cmp(&a.directory))
        });

        let mut renamed = Vec::with_capacity(shifting.len());
        for unit in shifting {
            let new_directory = match parse_prefix(&unit.directory) {
                Some(prefix) => prefix.with_index(unit.index + 1),
                None => continue,
            };
            let target = self.root.join(&new_directory);

            // rename(2) silently replaces an empty directory on Unix
            if target.exists() {
                return Err(CoreError::AlreadyExists {
                    path: target.display().to_string(),
                });
            }

            fs::rename(&unit.path, &target).map_err(|e| CoreError::io(&unit.path, e))?;
            log::debug!("Renamed {} -> {}", unit.directory, new_directory);

            renamed.push(Renamed {
                from: unit.directory,
                to: new_directory,
            });
        }

        Ok(renamed)
    }
}

/// Up and down scripts found in one migration directory.
#[derive(Debug, Default)]
struct Scripts {
    up: Option<String>,
    down: Option<String>,
    /// Extra scripts that lost to a lexicographically earlier file
    ignored: Vec<String>,
}

/// Find the up and down scripts inside a migration directory.
///
/// When several files share a suffix the lexicographically first one wins
/// and the rest are logged as ignored.
fn scan_scripts(dir: &Path) -> CoreResult<Scripts> {
    let mut scripts = Scripts::default();

    for entry in fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))? {
        let entry = entry.map_err(|e| CoreError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        let slot = if name.ends_with(UP_SUFFIX) {
            &mut scripts.up
        } else if name.ends_with(DOWN_SUFFIX) {
            &mut scripts.down
        } else {
            continue;
        };

        match slot.take() {
            Some(current) if current.as_str() < name.as_str() => {
                *slot = Some(current);
                scripts.ignored.push(name);
            }
            Some(current) => {
                *slot = Some(name);
                scripts.ignored.push(current);
            }
            None => *slot = Some(name),
        }
    }

    scripts.ignored.sort();
    for file in &scripts.ignored {
        log::warn!(
            "Ignoring extra script {} in {}, only one up and one down file is used",
            file,
            dir.display()
        );
    }
    Ok(scripts)
}

fn create_dir_exclusive(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}

fn create_file_exclusive(path: &Path) -> CoreResult<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => CoreError::AlreadyExists {
                path: path.display().to_string(),
            },
            _ => CoreError::io(path, e),
        })
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
