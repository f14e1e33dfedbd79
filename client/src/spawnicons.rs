//! Model icons rendered by the game into its spawnicon cache.

use std::collections::{HashMap, HashSet};

use hud_core::constants::SPAWNICON_URL_PREFIX;

/// Asset URL of the icon for `model`.
///
/// `models/Humans/Group01/male_02.mdl` becomes
/// `asset://garrysmod/materials/spawnicons/models/humans/group01/male_02.png`.
pub fn spawnicon_url(model: &str) -> String {
    let lower = model.to_lowercase();
    let path = lower.strip_prefix("models/").unwrap_or(&lower);
    let path = path.strip_suffix(".mdl").unwrap_or(path);
    format!("{SPAWNICON_URL_PREFIX}{path}.png")
}

/// Tracks icon reloads and which icons were already asked for.
#[derive(Debug, Default)]
pub struct SpawniconCache {
    versions: HashMap<String, u64>,
    requested: HashSet<String>,
}

impl SpawniconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL to load for `model`, with `?v=` once the icon has been re-rendered.
    pub fn url_for(&self, model: &str) -> String {
        let url = spawnicon_url(model);
        match self.versions.get(model) {
            Some(version) => format!("{url}?v={version}"),
            None => url,
        }
    }

    /// Records a failed load of `model`'s current URL.
    ///
    /// Returns true the first time, when the host should be asked to render the icon.
    pub fn load_failed(&mut self, model: &str) -> bool {
        self.requested.insert(self.url_for(model))
    }

    /// The host rendered `model`; the next load uses a fresh URL.
    pub fn icon_ready(&mut self, model: &str) {
        *self.versions.entry(model.to_string()).or_insert(0) += 1;
    }
}
