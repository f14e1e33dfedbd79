pub mod fixtures;
pub mod preview_bridge;
pub mod scenes;
pub mod settings;
pub mod spawnicons;
