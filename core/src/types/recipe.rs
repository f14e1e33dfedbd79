use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::lenient;
use crate::string_operations::contains_folded;

/// One `(itemId, quantity)` pair of a recipe. Arrives on the wire as `[id, n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: i64,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

impl<'de> Deserialize<'de> for ItemStack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let (id, quantity) = match &value {
            Value::Array(pair) => (
                pair.first().cloned().unwrap_or(Value::Null),
                pair.get(1).cloned().unwrap_or(Value::Null),
            ),
            Value::Object(map) => (
                map.get("id").cloned().unwrap_or(Value::Null),
                map.get("n")
                    .or_else(|| map.get("count"))
                    .cloned()
                    .unwrap_or(Value::Null),
            ),
            other => {
                return Err(de::Error::custom(format!(
                    "expected an [id, quantity] pair, got {other}"
                )));
            }
        };

        let quantity = lenient::value_to_i64(&quantity);
        Ok(ItemStack {
            item_id: lenient::value_to_string(&id),
            quantity: if quantity == 0 { 1 } else { quantity },
        })
    }
}

impl Serialize for ItemStack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.item_id, self.quantity).serialize(serializer)
    }
}

/// Formats requirement pairs as "id xN, id xN".
pub fn requirements_text(stacks: &[ItemStack]) -> String {
    stacks
        .iter()
        .map(|stack| format!("{} x{}", stack.item_id, stack.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A recipe offered by a crafting station.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,

    #[serde(deserialize_with = "lenient::list")]
    pub inputs: Vec<ItemStack>,

    #[serde(deserialize_with = "lenient::list")]
    pub outputs: Vec<ItemStack>,

    /// Preformatted inputs line; wins over `inputs` when present.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub inputs_str: Option<String>,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub outputs_str: Option<String>,

    /// Craft time in seconds.
    #[serde(deserialize_with = "lenient::number")]
    pub time: f64,

    /// How many times the player can craft this right now.
    #[serde(deserialize_with = "lenient::integer")]
    pub max_crafts: i64,
}

impl Recipe {
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }

        let Some(first) = self.outputs.first() else {
            return if self.id.is_empty() {
                "Рецепт".to_string()
            } else {
                self.id.clone()
            };
        };

        let base = format!("{} x{}", first.item_id, first.quantity);
        if self.outputs.len() > 1 {
            format!("{base} (и ещё {})", self.outputs.len() - 1)
        } else {
            base
        }
    }

    pub fn inputs_text(&self) -> String {
        self.inputs_str
            .clone()
            .unwrap_or_else(|| requirements_text(&self.inputs))
    }

    pub fn outputs_text(&self) -> String {
        self.outputs_str
            .clone()
            .unwrap_or_else(|| requirements_text(&self.outputs))
    }

    /// Remaining craftable count, never negative.
    pub fn remaining(&self) -> i64 {
        self.max_crafts.max(0)
    }

    pub fn is_available(&self) -> bool {
        self.max_crafts > 0
    }

    /// Substring match of an already-folded query against name, inputs and outputs.
    pub fn matches(&self, query_folded: &str) -> bool {
        contains_folded(&self.display_name(), query_folded)
            || contains_folded(&self.inputs_text(), query_folded)
            || contains_folded(&self.outputs_text(), query_folded)
    }

    /// "Время: … c   •   Доступно: …" line.
    pub fn meta_line(&self) -> String {
        format!(
            "Время: {:.1} c   •   Доступно: {}",
            self.time,
            self.remaining()
        )
    }
}
