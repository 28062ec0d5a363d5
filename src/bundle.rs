/// Jingle resource bundle
///
/// Preloads every jingle into memory at startup so playback never touches
/// the filesystem. A missing or unreadable file is fatal, like a malformed
/// variant table: the plugin must not reach a running state with partial
/// resources.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::error::BundleError;
use crate::skill::Skill;

/// In-memory audio resources, keyed by resource name
#[derive(Debug)]
pub struct JingleBundle {
    audio: HashMap<String, Arc<Vec<u8>>>,
}

impl JingleBundle {
    /// Preload the primary and alternate jingle of every skill from `dir`
    pub fn load_dir(dir: &Path) -> Result<Self, BundleError> {
        let mut audio = HashMap::new();
        let mut total_bytes = 0usize;

        for skill in Skill::ALL {
            for alternate in [false, true] {
                let name = skill.resource_name(alternate);
                let path = dir.join(&name);
                let data = fs::read(&path).map_err(|e| {
                    if e.kind() == io::ErrorKind::NotFound {
                        BundleError::MissingResource {
                            path: path.display().to_string(),
                        }
                    } else {
                        BundleError::ReadFailed {
                            path: path.display().to_string(),
                            source: e,
                        }
                    }
                })?;
                total_bytes += data.len();
                audio.insert(name, Arc::new(data));
            }
        }

        tracing::info!(
            "Preloaded {} jingle resources ({} bytes)",
            audio.len(),
            total_bytes
        );
        Ok(Self { audio })
    }

    /// Build a bundle from named byte buffers (embedded resources, tests)
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        let audio = entries
            .into_iter()
            .map(|(name, data)| (name, Arc::new(data)))
            .collect();
        Self { audio }
    }

    /// Look up a resource's preloaded bytes
    pub fn audio(&self, resource: &str) -> Option<Arc<Vec<u8>>> {
        self.audio.get(resource).cloned()
    }

    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
