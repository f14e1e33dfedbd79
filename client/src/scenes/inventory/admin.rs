//! Admin sub-panel: player lookup, item catalog and the spawn form.

use hud_core::bridge::HostCall;
use hud_core::constants::INV_OPEN_READ_ONLY;
use hud_core::string_operations::{casefold, format_kg, parse_int_prefix};
use hud_core::types::{CatalogEntry, PlayerRecord, SpawnDestination, SpawnRequest};

use crate::scenes::scene::PanelContext;

pub const PICK_PLAYER_FIRST: &str = "Выбери игрока слева";

/// "ID: <id> · <w> кг" under a catalog entry.
pub fn catalog_subtitle(entry: &CatalogEntry) -> String {
    match entry.weight {
        Some(weight) => format!("ID: {} · {} кг", entry.id, format_kg(weight)),
        None => format!("ID: {}", entry.id),
    }
}

#[derive(Debug)]
pub struct AdminPanel {
    pub players: Vec<PlayerRecord>,
    pub catalog: Vec<CatalogEntry>,
    pub selected_player: Option<i64>,
    pub player_query: String,
    pub catalog_query: String,
    pub spawn_id: String,
    pub spawn_count: String,
    pub destination: SpawnDestination,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            catalog: Vec::new(),
            selected_player: None,
            player_query: String::new(),
            catalog_query: String::new(),
            spawn_id: String::new(),
            spawn_count: "1".to_string(),
            destination: SpawnDestination::Own,
        }
    }

    /// Requests the player list, and the catalog unless one is cached.
    pub fn open(&mut self, context: &mut PanelContext) {
        self.refresh_players(context);
        if self.catalog.is_empty() {
            context.send(HostCall::RequestItemsCatalog);
        }
    }

    pub fn refresh_players(&mut self, context: &mut PanelContext) {
        context.send(HostCall::RequestPlayers);
    }

    pub fn set_players(&mut self, players: Vec<PlayerRecord>) {
        if let Some(ent) = self.selected_player {
            if !players.iter().any(|player| player.ent == ent) {
                log::debug!("Selected player {} left the list", ent);
            }
        }
        self.players = players;
    }

    pub fn set_catalog(&mut self, catalog: Vec<CatalogEntry>) {
        self.catalog = catalog;
    }

    /// Players matching the search text, sorted by name.
    pub fn player_rows(&self) -> Vec<&PlayerRecord> {
        let query = casefold(&self.player_query);
        let mut rows: Vec<&PlayerRecord> = self
            .players
            .iter()
            .filter(|player| player.matches(&query))
            .collect();
        rows.sort_by_cached_key(|player| (casefold(&player.name), player.ent));
        rows
    }

    /// Catalog entries matching the search text, sorted by name (or id), then id.
    pub fn catalog_rows(&self) -> Vec<&CatalogEntry> {
        let query = casefold(&self.catalog_query);
        let mut rows: Vec<&CatalogEntry> = self
            .catalog
            .iter()
            .filter(|entry| entry.matches(&query))
            .collect();
        rows.sort_by_cached_key(|entry| (casefold(entry.display_name()), entry.id.clone()));
        rows
    }

    pub fn select_player(&mut self, ent: i64) {
        self.selected_player = Some(ent);
    }

    pub fn selected_player_name(&self) -> Option<&str> {
        let ent = self.selected_player?;
        self.players
            .iter()
            .find(|player| player.ent == ent)
            .map(|player| player.name.as_str())
    }

    /// Opens the player's inventory read-only. The selection is left alone.
    pub fn open_player(&mut self, context: &mut PanelContext, ent: i64) {
        context.send(HostCall::InvOpen {
            mode: INV_OPEN_READ_ONLY,
            ent,
        });
    }

    pub fn pick_item(&mut self, id: &str) {
        self.spawn_id = id.to_string();
    }

    /// Spawn count from the form; anything below one or garbage means one.
    pub fn count(&self) -> i64 {
        parse_int_prefix(&self.spawn_count)
            .filter(|count| *count > 0)
            .unwrap_or(1)
    }

    /// Builds the spawn request from the form, or the alert that blocks it.
    pub fn spawn_request(&self) -> Result<Option<SpawnRequest>, &'static str> {
        let id = self.spawn_id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let target = match self.destination {
            SpawnDestination::Player => self.selected_player.ok_or(PICK_PLAYER_FIRST)?,
            _ => 0,
        };

        Ok(Some(SpawnRequest {
            id: id.to_string(),
            count: self.count(),
            dst: self.destination,
            target,
        }))
    }

    /// Sends the spawn form. An empty item id sends nothing.
    pub fn spawn(&mut self, context: &mut PanelContext) {
        match self.spawn_request() {
            Ok(Some(request)) => {
                log::info!("Spawning {} x{} ({:?})", request.id, request.count, request.dst);
                context.send(HostCall::SpawnItem(request));
            }
            Ok(None) => log::debug!("Spawn without an item id"),
            Err(alert) => context.alert(alert),
        }
    }

    /// Catalog double click: fills the form with `id` and submits it.
    pub fn pick_and_spawn(&mut self, context: &mut PanelContext, id: &str) {
        self.pick_item(id);
        self.spawn(context);
    }

    /// Spawns a single `id` to the admin's own inventory.
    pub fn spawn_one(&mut self, context: &mut PanelContext, id: &str) {
        context.send(HostCall::SpawnItem(SpawnRequest {
            id: id.to_string(),
            count: 1,
            dst: SpawnDestination::Own,
            target: 0,
        }));
    }
}

impl Default for AdminPanel {
    fn default() -> Self {
        Self::new()
    }
}
