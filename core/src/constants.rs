//! Shared limits, wire names and status strings.

// Character names (trimmed, counted in characters)
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 32;

// Crafting quantities.
// The slider never offers more than CRAFT_SLIDER_CAP per batch, while startCraft itself
// accepts up to CRAFT_ACTION_CAP. Both values come from the host contract and are kept
// apart on purpose until the host side confirms which one is authoritative.
pub const CRAFT_SLIDER_CAP: i64 = 64;
pub const CRAFT_ACTION_CAP: i64 = 4095;

pub const SPAWNICON_URL_PREFIX: &str = "asset://garrysmod/materials/spawnicons/models/";
pub const DEFAULT_PROJECT_URL: &str = "https://spf-base.ru";

/// `invOpen` mode used by the admin panel for a read-only inventory view.
pub const INV_OPEN_READ_ONLY: u8 = 2;

// Loading screen lifecycle
pub const STATUS_WORKSHOP_COMPLETE: &str = "Workshop Complete";
pub const STATUS_CLIENT_INFO_SENT: &str = "Client info sent!";
pub const STATUS_STARTING_LUA: &str = "Starting Lua...";
pub const LOAD_FLOOR_WORKSHOP: f32 = 80.0;
pub const LOAD_FLOOR_CLIENT_INFO: f32 = 95.0;
pub const LOAD_STATUS_INCREMENT: f32 = 0.1;
pub const LOADING_HISTORY_LEN: usize = 10;
