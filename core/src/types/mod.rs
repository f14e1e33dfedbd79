//! View models pushed by the host. Every list is replaced wholesale on each push.

mod admin;
mod character;
mod item;
pub mod lenient;
mod recipe;

// Re-export all types
pub use admin::{CatalogEntry, PlayerRecord, SpawnDestination, SpawnRequest};
pub use character::{race_label, Backstory, CharacterSummary, Gender};
pub use item::{InventoryItem, InventoryMode, InventoryViewModel, ItemList, ProgressRecord};
pub use recipe::{requirements_text, ItemStack, Recipe};
