//! Outbound calls to the host bridge.
//!
//! Every user action becomes a [`HostCall`], which is lowered to the string-only
//! [`WireCall`] form the host bridge exposes (function name plus string arguments,
//! structured payloads as JSON text). Calls are fire and forget.

use serde::{Serialize, Serializer};

use crate::requests::RequestKind;
use crate::types::{Gender, SpawnRequest};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("host bridge has no method `{0}`")]
    MissingMethod(String),

    #[error("host call `{function}` failed: {reason}")]
    CallFailed { function: String, reason: String },

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Inventory operation names understood by `invAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvOp {
    Equip,
    Unequip,
    Use,
    StackCompact,
    Drop,
    MoveToContainer,
    MoveFromContainer,
    FriskForceEquip,
    FriskForceUnequip,
    FriskUse,
    FriskSteal,
    FriskGive,
}

impl InvOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InvOp::Equip => "equip",
            InvOp::Unequip => "unequip",
            InvOp::Use => "use",
            InvOp::StackCompact => "stack_compact",
            InvOp::Drop => "drop",
            InvOp::MoveToContainer => "move_to_container",
            InvOp::MoveFromContainer => "move_from_container",
            InvOp::FriskForceEquip => "frisk_force_equip",
            InvOp::FriskForceUnequip => "frisk_force_unequip",
            InvOp::FriskUse => "frisk_use",
            InvOp::FriskSteal => "frisk_steal",
            InvOp::FriskGive => "frisk_give",
        }
    }

    /// Operations whose payload carries an `n` quantity.
    pub fn takes_quantity(self) -> bool {
        matches!(
            self,
            InvOp::Drop
                | InvOp::MoveToContainer
                | InvOp::MoveFromContainer
                | InvOp::FriskSteal
                | InvOp::FriskGive
        )
    }

    /// Operations whose payload carries the container entity.
    pub fn targets_container(self) -> bool {
        matches!(self, InvOp::MoveToContainer | InvOp::MoveFromContainer)
    }
}

/// Writes purely numeric uids back as JSON numbers, the way the host sent them.
fn serialize_uid<S: Serializer>(uid: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let numeric = !uid.is_empty()
        && uid.bytes().all(|b| b.is_ascii_digit())
        && (uid == "0" || !uid.starts_with('0'));

    match uid.parse::<u64>() {
        Ok(n) if numeric => serializer.serialize_u64(n),
        _ => serializer.serialize_str(uid),
    }
}

/// JSON payload of `invAction`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InvPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ent: Option<i64>,

    #[serde(serialize_with = "serialize_uid")]
    pub uid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    RequestBackstories,
    CreateCharacter {
        name: String,
        gender: Gender,
        backstory_id: String,
    },
    SelectCharacter {
        id: String,
    },
    EnsureSpawnicon {
        model: String,
    },
    OpenUrl {
        url: String,
    },
    StartCraft {
        ent_index: i64,
        recipe_id: String,
        count: i64,
    },
    InvAction {
        op: InvOp,
        payload: InvPayload,
    },
    InvOpen {
        mode: u8,
        ent: i64,
    },
    SpawnItem(SpawnRequest),
    RequestPlayers,
    RequestItemsCatalog,
    CheckAdminPerm,
}

/// A host call lowered to the bridge's calling convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCall {
    pub function: &'static str,
    pub args: Vec<String>,
}

impl HostCall {
    pub fn function(&self) -> &'static str {
        match self {
            HostCall::RequestBackstories => "requestBackstories",
            HostCall::CreateCharacter { .. } => "createCharacter",
            HostCall::SelectCharacter { .. } => "selectCharacter",
            HostCall::EnsureSpawnicon { .. } => "ensureSpawnicon",
            HostCall::OpenUrl { .. } => "openURL",
            HostCall::StartCraft { .. } => "startCraft",
            HostCall::InvAction { .. } => "invAction",
            HostCall::InvOpen { .. } => "invOpen",
            HostCall::SpawnItem(_) => "invAdmin",
            HostCall::RequestPlayers => "requestPlayers",
            HostCall::RequestItemsCatalog => "requestItemsCatalog",
            HostCall::CheckAdminPerm => "checkAdminPerm",
        }
    }

    /// Lowers the call to function name and string arguments.
    pub fn to_wire(&self) -> Result<WireCall, BridgeError> {
        let args = match self {
            HostCall::RequestBackstories
            | HostCall::RequestPlayers
            | HostCall::RequestItemsCatalog
            | HostCall::CheckAdminPerm => Vec::new(),
            HostCall::CreateCharacter {
                name,
                gender,
                backstory_id,
            } => vec![
                name.clone(),
                gender.code().to_string(),
                backstory_id.clone(),
            ],
            HostCall::SelectCharacter { id } => vec![id.clone()],
            HostCall::EnsureSpawnicon { model } => vec![model.clone()],
            HostCall::OpenUrl { url } => vec![url.clone()],
            HostCall::StartCraft {
                ent_index,
                recipe_id,
                count,
            } => vec![ent_index.to_string(), recipe_id.clone(), count.to_string()],
            HostCall::InvAction { op, payload } => {
                vec![op.as_str().to_string(), serde_json::to_string(payload)?]
            }
            HostCall::InvOpen { mode, ent } => vec![mode.to_string(), ent.to_string()],
            HostCall::SpawnItem(request) => {
                vec!["spawn_item".to_string(), serde_json::to_string(request)?]
            }
        };

        Ok(WireCall {
            function: self.function(),
            args,
        })
    }

    /// The answer this call waits for, if it is a request.
    pub fn request_kind(&self) -> Option<RequestKind> {
        match self {
            HostCall::RequestBackstories => Some(RequestKind::Backstories),
            HostCall::RequestPlayers => Some(RequestKind::Players),
            HostCall::RequestItemsCatalog => Some(RequestKind::ItemsCatalog),
            HostCall::CheckAdminPerm => Some(RequestKind::AdminPermission),
            _ => None,
        }
    }
}

/// The host-side call surface.
pub trait HostBridge {
    fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError>;
}

/// Encodes and sends `call`.
///
/// Failures are logged and the call is dropped; the caller's UI state stays as it was.
/// Returns whether the host accepted the call.
pub fn dispatch(bridge: &mut dyn HostBridge, call: &HostCall) -> bool {
    let wire = match call.to_wire() {
        Ok(wire) => wire,
        Err(err) => {
            log::error!("Dropping {}: {}", call.function(), err);
            return false;
        }
    };

    log::debug!("-> {}({})", wire.function, wire.args.join(", "));

    match bridge.invoke(&wire) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("{} failed: {}", wire.function, err);
            false
        }
    }
}
