//! Inventory items and the inventory view model pushed by the host.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::string_operations::contains_folded;

/// Reads the `equipped` field, which the host sends as a flag, a slot name or a slot list.
///
/// `None` means the item sits in the bag; `Some(slots)` means it is worn, with an empty
/// list when the slot is unknown.
fn equipped_slots<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(slots) => Some(
            slots
                .iter()
                .map(lenient::value_to_string)
                .filter(|slot| !slot.is_empty())
                .collect(),
        ),
        Value::String(slot) if !slot.is_empty() => Some(vec![slot]),
        other if lenient::is_truthy(&other) => Some(Vec::new()),
        _ => None,
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct InventoryItem {
    /// Unique instance id, used in every action payload.
    #[serde(deserialize_with = "lenient::string")]
    pub uid: String,

    /// Item class id.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub name: String,

    /// Unit weight in kg.
    #[serde(deserialize_with = "lenient::number")]
    pub w: f64,

    #[serde(deserialize_with = "lenient::integer")]
    pub count: i64,

    #[serde(deserialize_with = "equipped_slots")]
    pub equipped: Option<Vec<String>>,
}

impl InventoryItem {
    pub fn is_equipped(&self) -> bool {
        self.equipped.is_some()
    }

    /// Slots shown in the equipment block, "?" when the host did not say which.
    pub fn slots(&self) -> Vec<String> {
        match &self.equipped {
            Some(slots) if !slots.is_empty() => slots.clone(),
            Some(_) => vec!["?".to_string()],
            None => Vec::new(),
        }
    }

    /// Stack size; the host omits it (or sends 0) for single items.
    pub fn stack_count(&self) -> i64 {
        if self.count == 0 { 1 } else { self.count }
    }

    /// Total weight of the stack. A missing or zero unit weight counts as 1 kg.
    pub fn total_weight(&self) -> f64 {
        let unit = if self.w == 0.0 { 1.0 } else { self.w };
        unit * self.stack_count() as f64
    }

    /// "name xN" for stacks, plain name otherwise.
    pub fn title(&self) -> String {
        let count = self.stack_count();
        if count > 1 {
            format!("{} x{}", self.name, count)
        } else {
            self.name.clone()
        }
    }

    /// Matches an already-folded query against name and item id.
    pub fn matches(&self, query_folded: &str) -> bool {
        contains_folded(&self.name, query_folded) || contains_folded(&self.id, query_folded)
    }
}

/// A timed action running on an item (for example putting on armour).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProgressRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub kind: String,

    /// Completion time, unix seconds.
    #[serde(rename = "endT", deserialize_with = "lenient::number")]
    pub end_t: f64,
}

impl ProgressRecord {
    /// True while an equip action is still running at `now`.
    pub fn is_equip_in_flight(&self, now: f64) -> bool {
        self.kind == "equip" && self.end_t > now
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ItemList {
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<InventoryItem>,
}

/// Which layout the inventory screen uses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventoryMode {
    /// Own equipment and bag.
    #[default]
    #[serde(rename = "self")]
    Own,
    /// Own equipment and bag plus a world container.
    Container,
    /// Inspecting another actor.
    Frisk,
    /// Read-only admin view of a target.
    Admin,
}

impl InventoryMode {
    /// Unknown mode names render as the player's own inventory.
    pub fn from_wire(mode: &str) -> Self {
        match mode {
            "container" => InventoryMode::Container,
            "frisk" => InventoryMode::Frisk,
            "admin" => InventoryMode::Admin,
            _ => InventoryMode::Own,
        }
    }
}

/// Full inventory snapshot (`onInvState`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryViewModel {
    /// Absent keeps the current mode.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,

    #[serde(deserialize_with = "lenient::string")]
    pub target_name: String,

    #[serde(deserialize_with = "lenient::integer")]
    pub container_ent: i64,

    #[serde(deserialize_with = "lenient::truthy")]
    pub frisk: bool,

    #[serde(deserialize_with = "lenient::number")]
    pub frisk_action_delay: f64,

    /// Extra seconds a forced unequip takes.
    #[serde(deserialize_with = "lenient::number")]
    pub frisk_force_extra: f64,

    /// Absent keeps the last known permission.
    #[serde(deserialize_with = "lenient::opt_truthy")]
    pub has_admin: Option<bool>,

    #[serde(deserialize_with = "lenient::number")]
    pub inv_load: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub inv_max_load: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub my_inv_load: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub my_inv_max_load: f64,

    /// Running actions keyed by item uid.
    #[serde(deserialize_with = "lenient::string_map")]
    pub progress: BTreeMap<String, ProgressRecord>,

    /// Inventory being displayed (own, target's or admin target's).
    #[serde(deserialize_with = "lenient::or_default")]
    pub inv: ItemList,

    /// Viewer's own inventory while frisking.
    #[serde(deserialize_with = "lenient::or_default")]
    pub my_inv: ItemList,

    #[serde(deserialize_with = "lenient::or_default")]
    pub container: ItemList,
}
