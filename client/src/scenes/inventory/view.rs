//! Projection of the inventory view model into panes, rows and row actions.
//!
//! Nothing here draws or sends anything: the result is a plain tree that the renderer
//! walks and whose commands the panel executes.

use std::collections::{BTreeMap, HashMap};

use hud_core::bridge::{HostCall, InvOp, InvPayload};
use hud_core::string_operations::{casefold, format_kg, format_seconds_left};
use hud_core::types::{InventoryItem, InventoryMode, InventoryViewModel, ProgressRecord};

/// Identifies a pane, so its search text survives re-renders.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub enum PaneId {
    Equipment,
    OwnItems,
    Container,
    TargetItems,
    GiveItems,
    AdminItems,
}

impl PaneId {
    pub fn salt(self) -> &'static str {
        match self {
            PaneId::Equipment => "pane_equipment",
            PaneId::OwnItems => "pane_own_items",
            PaneId::Container => "pane_container",
            PaneId::TargetItems => "pane_target_items",
            PaneId::GiveItems => "pane_give_items",
            PaneId::AdminItems => "pane_admin_items",
        }
    }
}

/// What a button or double click does.
#[derive(Debug, Clone, PartialEq)]
pub enum InvCommand {
    /// Send right away.
    Send(HostCall),
    /// Ask for a quantity first, then send `op` with it.
    Prompt {
        title: &'static str,
        op: InvOp,
        ent: Option<i64>,
        uid: String,
    },
}

impl InvCommand {
    fn act(op: InvOp, ent: Option<i64>, uid: &str, n: Option<i64>) -> Self {
        InvCommand::Send(HostCall::InvAction {
            op,
            payload: InvPayload {
                ent,
                uid: uid.to_string(),
                n,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowAction {
    pub label: String,
    pub command: InvCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub uid: String,
    pub title: String,
    /// "X кг" on item rows.
    pub weight: Option<String>,
    /// Countdown of a running action.
    pub subtitle: Option<String>,
    pub actions: Vec<RowAction>,
    pub double_click: Option<InvCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaneView {
    pub id: PaneId,
    pub title: String,
    pub load_line: Option<String>,
    pub searchable: bool,
    pub rows: Vec<RowView>,
    pub empty_text: &'static str,
}

/// "Нагрузка: L / M кг", or without the maximum when it is unknown.
pub fn load_line(load: f64, max: f64) -> String {
    if max > 0.0 {
        format!("Нагрузка: {} / {} кг", format_kg(load), format_kg(max))
    } else {
        format!("Нагрузка: {} кг", format_kg(load))
    }
}

/// Orders items by folded name, then uid.
pub fn sort_items(items: &mut [&InventoryItem]) {
    items.sort_by_cached_key(|item| (casefold(&item.name), item.uid.clone()));
}

/// Equipment pane flavours.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EquipActions {
    Unequip,
    /// Frisk: forced unequip with the extra delay in the label.
    Force { extra_secs: f64 },
    ReadOnly,
}

fn equipment_pane(title: String, items: &[InventoryItem], actions: EquipActions) -> PaneView {
    let mut worn: Vec<&InventoryItem> = items.iter().filter(|item| item.is_equipped()).collect();
    sort_items(&mut worn);

    let mut rows = Vec::new();
    for item in worn {
        let command = match actions {
            EquipActions::Unequip => Some(("Снять".to_string(), InvOp::Unequip)),
            EquipActions::Force { extra_secs } => {
                let extra = if extra_secs > 0.0 {
                    format!(" (+{}с)", extra_secs.floor() as i64)
                } else {
                    String::new()
                };
                Some((format!("Снять (принуд.){extra}"), InvOp::FriskForceUnequip))
            }
            EquipActions::ReadOnly => None,
        };

        for slot in item.slots() {
            let (row_actions, double_click) = match &command {
                Some((label, op)) => {
                    let command = InvCommand::act(*op, None, &item.uid, None);
                    (
                        vec![RowAction {
                            label: label.clone(),
                            command: command.clone(),
                        }],
                        Some(command),
                    )
                }
                None => (Vec::new(), None),
            };

            rows.push(RowView {
                uid: item.uid.clone(),
                title: format!("[{slot}] {}", item.name),
                weight: None,
                subtitle: None,
                actions: row_actions,
                double_click,
            });
        }
    }

    PaneView {
        id: PaneId::Equipment,
        title,
        load_line: None,
        searchable: false,
        rows,
        empty_text: "Ничего не надето",
    }
}

/// Which actions an item pane offers; the first matching flavour wins.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ItemActions {
    /// Own bag: equip, use, stack, drop.
    Own,
    /// Own bag next to a container: move into it.
    ToContainer(i64),
    /// Container contents: take.
    FromContainer(i64),
    /// Target's bag while frisking.
    Frisk,
    /// Viewer's bag while frisking: give to the target.
    Give,
    ReadOnly,
}

/// Quantity actions "x1", "всё" and "N…" for one operation.
fn quantity_actions(
    actions: &mut Vec<RowAction>,
    verb: &str,
    prompt: &'static str,
    op: InvOp,
    ent: Option<i64>,
    item: &InventoryItem,
) {
    actions.push(RowAction {
        label: format!("{verb} x1"),
        command: InvCommand::act(op, ent, &item.uid, Some(1)),
    });
    actions.push(RowAction {
        label: format!("{verb} всё"),
        command: InvCommand::act(op, ent, &item.uid, Some(item.stack_count())),
    });
    actions.push(RowAction {
        label: format!("{verb} N…"),
        command: InvCommand::Prompt {
            title: prompt,
            op,
            ent,
            uid: item.uid.clone(),
        },
    });
}

fn item_row(item: &InventoryItem, flavour: ItemActions, progress: Option<&ProgressRecord>, now: f64) -> RowView {
    let in_flight = progress.filter(|record| record.is_equip_in_flight(now));
    let subtitle = in_flight.map(|record| format!("Экипировка: {}", format_seconds_left(record.end_t, now)));

    let mut actions = Vec::new();
    let mut double_click = None;

    if in_flight.is_none() {
        let uid = item.uid.as_str();
        match flavour {
            ItemActions::Own => {
                actions.push(RowAction {
                    label: "Экипировать".to_string(),
                    command: InvCommand::act(InvOp::Equip, None, uid, None),
                });
                actions.push(RowAction {
                    label: "Использовать".to_string(),
                    command: InvCommand::act(InvOp::Use, None, uid, None),
                });
                actions.push(RowAction {
                    label: "Объединить".to_string(),
                    command: InvCommand::act(InvOp::StackCompact, None, uid, None),
                });
                quantity_actions(&mut actions, "Выбросить", "Сколько выбросить?", InvOp::Drop, None, item);
                double_click = Some(InvCommand::act(InvOp::Equip, None, uid, None));
            }
            ItemActions::ToContainer(ent) => {
                quantity_actions(
                    &mut actions,
                    "→ Контейнер",
                    "Сколько переложить?",
                    InvOp::MoveToContainer,
                    Some(ent),
                    item,
                );
                double_click = Some(InvCommand::act(InvOp::MoveToContainer, Some(ent), uid, Some(1)));
            }
            ItemActions::FromContainer(ent) => {
                quantity_actions(
                    &mut actions,
                    "Забрать",
                    "Сколько забрать?",
                    InvOp::MoveFromContainer,
                    Some(ent),
                    item,
                );
                double_click = Some(InvCommand::act(InvOp::MoveFromContainer, Some(ent), uid, Some(1)));
            }
            ItemActions::Frisk => {
                actions.push(RowAction {
                    label: "Надеть (силой)".to_string(),
                    command: InvCommand::act(InvOp::FriskForceEquip, None, uid, None),
                });
                actions.push(RowAction {
                    label: "Использовать".to_string(),
                    command: InvCommand::act(InvOp::FriskUse, None, uid, None),
                });
                quantity_actions(&mut actions, "Изъять", "Сколько изъять?", InvOp::FriskSteal, None, item);
                double_click = Some(InvCommand::act(InvOp::FriskSteal, None, uid, Some(1)));
            }
            ItemActions::Give => {
                quantity_actions(&mut actions, "Передать", "Сколько передать?", InvOp::FriskGive, None, item);
                double_click = Some(InvCommand::act(InvOp::FriskGive, None, uid, Some(1)));
            }
            ItemActions::ReadOnly => {}
        }
    }

    RowView {
        uid: item.uid.clone(),
        title: item.title(),
        weight: Some(format!("{} кг", format_kg(item.total_weight()))),
        subtitle,
        actions,
        double_click,
    }
}

#[allow(clippy::too_many_arguments)]
fn item_pane(
    id: PaneId,
    title: String,
    load_line: Option<String>,
    items: &[InventoryItem],
    flavour: ItemActions,
    progress: Option<&BTreeMap<String, ProgressRecord>>,
    query: &str,
    now: f64,
) -> PaneView {
    let query = casefold(query);
    let mut bag: Vec<&InventoryItem> = items
        .iter()
        .filter(|item| !item.is_equipped() && item.matches(&query))
        .collect();
    sort_items(&mut bag);

    let rows = bag
        .into_iter()
        .map(|item| {
            let record = progress.and_then(|progress| progress.get(&item.uid));
            item_row(item, flavour, record, now)
        })
        .collect();

    PaneView {
        id,
        title,
        load_line,
        searchable: true,
        rows,
        empty_text: "Пусто",
    }
}

/// Builds the panes of `mode` from the view model.
///
/// `queries` holds the search text per pane and `now` is the current unix time.
pub fn project(
    mode: InventoryMode,
    vm: &InventoryViewModel,
    queries: &HashMap<PaneId, String>,
    now: f64,
) -> Vec<PaneView> {
    let query = |id: PaneId| queries.get(&id).map(String::as_str).unwrap_or("");
    let inv = &vm.inv.items;
    let progress = Some(&vm.progress);

    match mode {
        InventoryMode::Own => vec![
            equipment_pane("Экипировка".to_string(), inv, EquipActions::Unequip),
            item_pane(
                PaneId::OwnItems,
                "Твой инвентарь".to_string(),
                Some(load_line(vm.inv_load, vm.inv_max_load)),
                inv,
                ItemActions::Own,
                progress,
                query(PaneId::OwnItems),
                now,
            ),
        ],
        InventoryMode::Container => vec![
            equipment_pane("Экипировка".to_string(), inv, EquipActions::Unequip),
            item_pane(
                PaneId::OwnItems,
                "Твой инвентарь".to_string(),
                Some(load_line(vm.inv_load, vm.inv_max_load)),
                inv,
                ItemActions::ToContainer(vm.container_ent),
                progress,
                query(PaneId::OwnItems),
                now,
            ),
            item_pane(
                PaneId::Container,
                "Контейнер".to_string(),
                None,
                &vm.container.items,
                ItemActions::FromContainer(vm.container_ent),
                None,
                query(PaneId::Container),
                now,
            ),
        ],
        InventoryMode::Frisk => vec![
            equipment_pane(
                format!("Экипировка цели: {}", vm.target_name),
                inv,
                EquipActions::Force {
                    extra_secs: vm.frisk_force_extra,
                },
            ),
            item_pane(
                PaneId::TargetItems,
                "Инвентарь цели".to_string(),
                Some(load_line(vm.inv_load, vm.inv_max_load)),
                inv,
                ItemActions::Frisk,
                progress,
                query(PaneId::TargetItems),
                now,
            ),
            item_pane(
                PaneId::GiveItems,
                format!("Твой инвентарь → {}", vm.target_name),
                Some(load_line(vm.my_inv_load, vm.my_inv_max_load)),
                &vm.my_inv.items,
                ItemActions::Give,
                None,
                query(PaneId::GiveItems),
                now,
            ),
        ],
        InventoryMode::Admin => vec![
            equipment_pane("Экипировка игрока".to_string(), inv, EquipActions::ReadOnly),
            item_pane(
                PaneId::AdminItems,
                format!("Инвентарь: {}", vm.target_name),
                Some(load_line(vm.inv_load, vm.inv_max_load)),
                inv,
                ItemActions::ReadOnly,
                None,
                query(PaneId::AdminItems),
                now,
            ),
        ],
    }
}
