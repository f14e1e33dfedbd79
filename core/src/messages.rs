//! Inbound host messages.
//!
//! The host calls named entry points with positional JSON arguments. Each call is
//! decoded into one [`HostMessage`] so panels handle a single typed union instead of
//! a set of loosely typed callbacks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::requests::RequestKind;
use crate::types::lenient;
use crate::types::{
    Backstory, CatalogEntry, CharacterSummary, InventoryViewModel, PlayerRecord, Recipe,
};

/// Panel a message (or a host call) belongs to.
#[derive(Serialize, Deserialize, Hash, Eq, PartialEq, Debug, Copy, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    #[default]
    CharacterSelect,
    Crafting,
    Inventory,
    Loading,
}

impl PanelKind {
    pub const ALL: [PanelKind; 4] = [
        PanelKind::CharacterSelect,
        PanelKind::Crafting,
        PanelKind::Inventory,
        PanelKind::Loading,
    ];
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("unknown entry point `{0}`")]
    UnknownEntryPoint(String),

    #[error("malformed payload for `{entry_point}`: {source}")]
    Payload {
        entry_point: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// `onCraftInit` payload.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CraftStation {
    #[serde(deserialize_with = "lenient::integer")]
    pub ent_index: i64,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub station: Option<String>,
}

/// `onInvAdmin` payload, dispatched on its `kind` tag.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdminMessage {
    Players {
        #[serde(default, deserialize_with = "lenient::list")]
        players: Vec<PlayerRecord>,
    },
    ItemsCatalog {
        #[serde(default, deserialize_with = "lenient::list")]
        items: Vec<CatalogEntry>,
    },
    AdminPerm {
        #[serde(default, deserialize_with = "lenient::truthy")]
        ok: bool,
    },
    SpawnResult {
        #[serde(default, deserialize_with = "lenient::truthy")]
        ok: bool,
    },
}

/// `GameDetails(...)` arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameDetails {
    pub server_name: String,
    pub server_url: String,
    pub map_name: String,
    pub max_players: i64,
    pub steam_id: String,
    pub gamemode: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    CharacterList(Vec<CharacterSummary>),
    Backstories(Vec<Backstory>),
    CharacterError(String),
    CraftInit(CraftStation),
    CraftList(Vec<Recipe>),
    CraftError(String),
    InventoryState(Box<InventoryViewModel>),
    InventoryAdmin(AdminMessage),
    /// Host finished wiring the page.
    Ready,
    /// A model icon has been rendered and can be reloaded.
    SpawniconReady(String),
    GameDetails(GameDetails),
    FilesTotal(i64),
    FilesNeeded(i64),
    DownloadingFile(String),
    StatusChanged(String),
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn text_arg(args: &[Value], index: usize) -> String {
    lenient::value_to_string(&arg(args, index))
}

fn payload<T: DeserializeOwned>(
    entry_point: &'static str,
    args: &[Value],
) -> Result<T, MessageError> {
    serde_json::from_value(arg(args, 0))
        .map_err(|source| MessageError::Payload { entry_point, source })
}

fn list_payload<T: DeserializeOwned>(
    entry_point: &'static str,
    args: &[Value],
) -> Result<Vec<T>, MessageError> {
    let items = lenient::value_to_list(arg(args, 0)).map_err(|reason| MessageError::Payload {
        entry_point,
        source: serde::de::Error::custom(reason),
    })?;

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|source| MessageError::Payload { entry_point, source })
        })
        .collect()
}

impl HostMessage {
    /// Decodes a call of the host entry point `name` with positional `args`.
    pub fn from_entry_point(name: &str, args: &[Value]) -> Result<Self, MessageError> {
        let message = match name {
            "onCharacterList" => HostMessage::CharacterList(list_payload("onCharacterList", args)?),
            "onBackstories" => HostMessage::Backstories(list_payload("onBackstories", args)?),
            "onCharError" => HostMessage::CharacterError(error_text(&arg(args, 0))),
            "onCraftInit" => HostMessage::CraftInit(payload("onCraftInit", args)?),
            "onCraftList" => {
                // Anything that is not an array clears the list.
                let recipes = match arg(args, 0) {
                    Value::Array(_) => list_payload("onCraftList", args)?,
                    _ => Vec::new(),
                };
                HostMessage::CraftList(recipes)
            }
            "onCraftError" => HostMessage::CraftError(error_text(&arg(args, 0))),
            "onInvState" => HostMessage::InventoryState(Box::new(payload("onInvState", args)?)),
            "onInvAdmin" => HostMessage::InventoryAdmin(payload("onInvAdmin", args)?),
            "GMOD_READY" => HostMessage::Ready,
            "__onSpawniconReady" => HostMessage::SpawniconReady(text_arg(args, 0)),
            "GameDetails" => HostMessage::GameDetails(GameDetails {
                server_name: text_arg(args, 0),
                server_url: text_arg(args, 1),
                map_name: text_arg(args, 2),
                max_players: lenient::value_to_i64(&arg(args, 3)),
                steam_id: text_arg(args, 4),
                gamemode: text_arg(args, 5),
            }),
            "SetFilesTotal" => HostMessage::FilesTotal(lenient::value_to_i64(&arg(args, 0))),
            "SetFilesNeeded" => HostMessage::FilesNeeded(lenient::value_to_i64(&arg(args, 0))),
            "DownloadingFile" => HostMessage::DownloadingFile(text_arg(args, 0)),
            "SetStatusChanged" => HostMessage::StatusChanged(text_arg(args, 0)),
            other => return Err(MessageError::UnknownEntryPoint(other.to_string())),
        };

        Ok(message)
    }

    /// Entry point name the message was decoded from.
    pub fn entry_point(&self) -> &'static str {
        match self {
            HostMessage::CharacterList(_) => "onCharacterList",
            HostMessage::Backstories(_) => "onBackstories",
            HostMessage::CharacterError(_) => "onCharError",
            HostMessage::CraftInit(_) => "onCraftInit",
            HostMessage::CraftList(_) => "onCraftList",
            HostMessage::CraftError(_) => "onCraftError",
            HostMessage::InventoryState(_) => "onInvState",
            HostMessage::InventoryAdmin(_) => "onInvAdmin",
            HostMessage::Ready => "GMOD_READY",
            HostMessage::SpawniconReady(_) => "__onSpawniconReady",
            HostMessage::GameDetails(_) => "GameDetails",
            HostMessage::FilesTotal(_) => "SetFilesTotal",
            HostMessage::FilesNeeded(_) => "SetFilesNeeded",
            HostMessage::DownloadingFile(_) => "DownloadingFile",
            HostMessage::StatusChanged(_) => "SetStatusChanged",
        }
    }

    /// Panel that owns the message. `None` for page-wide hooks handled by the active panel.
    pub fn panel(&self) -> Option<PanelKind> {
        match self {
            HostMessage::CharacterList(_)
            | HostMessage::Backstories(_)
            | HostMessage::CharacterError(_)
            | HostMessage::SpawniconReady(_) => Some(PanelKind::CharacterSelect),
            HostMessage::CraftInit(_) | HostMessage::CraftList(_) | HostMessage::CraftError(_) => {
                Some(PanelKind::Crafting)
            }
            HostMessage::InventoryState(_) | HostMessage::InventoryAdmin(_) => {
                Some(PanelKind::Inventory)
            }
            HostMessage::GameDetails(_)
            | HostMessage::FilesTotal(_)
            | HostMessage::FilesNeeded(_)
            | HostMessage::DownloadingFile(_)
            | HostMessage::StatusChanged(_) => Some(PanelKind::Loading),
            HostMessage::Ready => None,
        }
    }

    /// The outstanding request this message answers, if any.
    pub fn answers(&self) -> Option<RequestKind> {
        match self {
            HostMessage::Backstories(_) => Some(RequestKind::Backstories),
            HostMessage::InventoryAdmin(AdminMessage::Players { .. }) => Some(RequestKind::Players),
            HostMessage::InventoryAdmin(AdminMessage::ItemsCatalog { .. }) => {
                Some(RequestKind::ItemsCatalog)
            }
            HostMessage::InventoryAdmin(AdminMessage::AdminPerm { .. }) => {
                Some(RequestKind::AdminPermission)
            }
            _ => None,
        }
    }
}

/// Error callbacks may pass nothing, a string or an arbitrary value.
fn error_text(value: &Value) -> String {
    let text = lenient::value_to_string(value);
    if text.is_empty() { "Error".to_string() } else { text }
}
