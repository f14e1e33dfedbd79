//! Admin sub-panel data: player lookup, item catalog and spawn requests.

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::string_operations::contains_folded;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PlayerRecord {
    /// Entity index of the player.
    #[serde(deserialize_with = "lenient::integer")]
    pub ent: i64,

    #[serde(deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(deserialize_with = "lenient::truthy")]
    pub alive: bool,

    #[serde(deserialize_with = "lenient::string")]
    pub steamid: String,
}

impl PlayerRecord {
    pub fn matches(&self, query_folded: &str) -> bool {
        contains_folded(&self.name, query_folded) || contains_folded(&self.steamid, query_folded)
    }

    pub fn status_label(&self) -> &'static str {
        if self.alive { "alive" } else { "dead" }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(deserialize_with = "lenient::opt_number")]
    pub weight: Option<f64>,
}

impl CatalogEntry {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn matches(&self, query_folded: &str) -> bool {
        contains_folded(&self.name, query_folded) || contains_folded(&self.id, query_folded)
    }
}

/// Where an admin-spawned item ends up.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpawnDestination {
    #[default]
    #[serde(rename = "self")]
    Own,
    Player,
    Container,
    World,
}

impl SpawnDestination {
    pub const ALL: [SpawnDestination; 4] = [
        SpawnDestination::Own,
        SpawnDestination::Player,
        SpawnDestination::Container,
        SpawnDestination::World,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpawnDestination::Own => "Себе",
            SpawnDestination::Player => "Выбранный игрок",
            SpawnDestination::Container => "Контейнер под прицелом",
            SpawnDestination::World => "В мир перед собой",
        }
    }
}

/// Payload of `invAdmin("spawn_item", …)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub id: String,
    pub count: i64,
    pub dst: SpawnDestination,
    /// Target player entity for [`SpawnDestination::Player`], 0 otherwise.
    #[serde(rename = "ref")]
    pub target: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spawn_request_uses_host_field_names() {
        let request = SpawnRequest {
            id: "medkit".into(),
            count: 2,
            dst: SpawnDestination::Own,
            target: 0,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": "medkit", "count": 2, "dst": "self", "ref": 0})
        );
    }

    #[test]
    fn player_matches_name_or_steam_id() {
        let player: PlayerRecord = serde_json::from_value(json!({
            "ent": "12", "name": "Иван", "alive": 1, "steamid": "STEAM_0:1:42"
        }))
        .unwrap();
        assert_eq!(player.ent, 12);
        assert!(player.matches("иван"));
        assert!(player.matches("steam_0"));
        assert_eq!(player.status_label(), "alive");
    }

    #[test]
    fn catalog_entry_without_name_shows_id() {
        let entry: CatalogEntry = serde_json::from_value(json!({"id": "ammo_9mm"})).unwrap();
        assert_eq!(entry.display_name(), "ammo_9mm");
        assert_eq!(entry.weight, None);
    }
}
