//! The inventory panel: own bag, containers, frisking and the admin view.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`view`] | Pure projection of the host view model into panes, rows and commands |
//! | [`admin`] | Admin sub-panel state: players, item catalog, spawn form |
//! | [`ui_render`] | egui drawing of tabs, panes, the admin sub-panel and the quantity prompt |

pub mod admin;
mod ui_render;
pub mod view;

use std::collections::HashMap;

use hud_core::bridge::{HostCall, InvOp, InvPayload};
use hud_core::messages::{AdminMessage, HostMessage};
use hud_core::string_operations::parse_positive_quantity;
use hud_core::types::{InventoryMode, InventoryViewModel};

use crate::scenes::scene::{Panel, PanelContext};

use self::admin::AdminPanel;
use self::view::{InvCommand, PaneId, PaneView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryTab {
    Inventory,
    Admin,
}

/// "How many?" dialog opened by the "N…" actions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityPrompt {
    pub title: &'static str,
    pub op: InvOp,
    pub ent: Option<i64>,
    pub uid: String,
    pub text: String,
    focus: bool,
}

pub struct InventoryPanel {
    mode: InventoryMode,
    vm: InventoryViewModel,
    has_admin: Option<bool>,
    tab: InventoryTab,
    queries: HashMap<PaneId, String>,
    prompt: Option<QuantityPrompt>,
    admin: AdminPanel,
}

impl InventoryPanel {
    pub fn new() -> Self {
        Self {
            mode: InventoryMode::Own,
            vm: InventoryViewModel::default(),
            has_admin: None,
            tab: InventoryTab::Inventory,
            queries: HashMap::new(),
            prompt: None,
            admin: AdminPanel::new(),
        }
    }

    pub fn mode(&self) -> InventoryMode {
        self.mode
    }

    pub fn view_model(&self) -> &InventoryViewModel {
        &self.vm
    }

    /// Admin permission as last reported by the host; unknown until it answers.
    pub fn has_admin(&self) -> Option<bool> {
        self.has_admin
    }

    pub fn tab(&self) -> InventoryTab {
        self.tab
    }

    /// The admin tab only exists once the host confirmed the permission.
    pub fn shows_admin_tab(&self) -> bool {
        self.has_admin == Some(true)
    }

    pub fn admin(&self) -> &AdminPanel {
        &self.admin
    }

    pub fn admin_mut(&mut self) -> &mut AdminPanel {
        &mut self.admin
    }

    pub fn prompt(&self) -> Option<&QuantityPrompt> {
        self.prompt.as_ref()
    }

    pub fn set_query(&mut self, pane: PaneId, query: impl Into<String>) {
        self.queries.insert(pane, query.into());
    }

    /// Panes of the current mode at unix time `now`.
    pub fn panes(&self, now: f64) -> Vec<PaneView> {
        view::project(self.mode, &self.vm, &self.queries, now)
    }

    pub fn show_inventory(&mut self) {
        self.tab = InventoryTab::Inventory;
    }

    /// Switches to the admin tab and asks the host for fresh lists.
    pub fn open_admin(&mut self, context: &mut PanelContext) {
        if !self.shows_admin_tab() {
            log::warn!("Admin tab requested without admin permission");
            return;
        }
        if self.tab != InventoryTab::Admin {
            self.tab = InventoryTab::Admin;
            self.admin.open(context);
        }
    }

    fn set_admin_permission(&mut self, has_admin: bool) {
        self.has_admin = Some(has_admin);
        if !has_admin && self.tab == InventoryTab::Admin {
            log::info!("Admin permission revoked, closing the admin tab");
            self.tab = InventoryTab::Inventory;
        }
    }

    fn apply_state(&mut self, vm: InventoryViewModel) {
        if let Some(mode) = vm.mode.as_deref() {
            self.mode = InventoryMode::from_wire(mode);
        }
        if let Some(has_admin) = vm.has_admin {
            self.set_admin_permission(has_admin);
        }
        self.vm = vm;
    }

    fn apply_admin(&mut self, context: &mut PanelContext, message: AdminMessage) {
        match message {
            AdminMessage::Players { players } => self.admin.set_players(players),
            AdminMessage::ItemsCatalog { items } => {
                self.admin.set_catalog(items);
                // Players only: an empty catalog is not asked for again.
                if self.tab == InventoryTab::Admin {
                    self.admin.refresh_players(context);
                }
            }
            AdminMessage::AdminPerm { ok } => self.set_admin_permission(ok),
            AdminMessage::SpawnResult { ok } => log::info!("Spawn result: ok={}", ok),
        }
    }

    /// Runs a row action or double click.
    pub fn execute(&mut self, context: &mut PanelContext, command: InvCommand) {
        match command {
            InvCommand::Send(call) => {
                context.send(call);
            }
            InvCommand::Prompt { title, op, ent, uid } => {
                self.prompt = Some(QuantityPrompt {
                    title,
                    op,
                    ent,
                    uid,
                    text: "1".to_string(),
                    focus: true,
                });
            }
        }
    }

    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.text = text.into();
        }
    }

    /// Closes the prompt and sends its action when the text starts with a positive number.
    pub fn confirm_prompt(&mut self, context: &mut PanelContext) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        match parse_positive_quantity(&prompt.text) {
            Some(n) => {
                context.send(HostCall::InvAction {
                    op: prompt.op,
                    payload: InvPayload {
                        ent: prompt.ent,
                        uid: prompt.uid,
                        n: Some(n),
                    },
                });
            }
            None => log::debug!("Ignoring quantity {:?}", prompt.text),
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }
}

impl Default for InventoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for InventoryPanel {
    fn on_exit(&mut self, _context: &mut PanelContext) {
        self.prompt = None;
    }

    fn handle_message(&mut self, context: &mut PanelContext, message: HostMessage) {
        match message {
            HostMessage::InventoryState(vm) => self.apply_state(*vm),
            HostMessage::InventoryAdmin(admin) => self.apply_admin(context, admin),
            HostMessage::Ready => {
                context.send(HostCall::CheckAdminPerm);
            }
            other => log::debug!("Inventory ignores {}", other.entry_point()),
        }
    }

    fn render_ui(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        self.handle_keys(context, ctx);
        self.draw(context, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HudSettings;
    use hud_core::bridge::{BridgeError, HostBridge, WireCall};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<WireCall>>>);

    impl HostBridge for Recorder {
        fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError> {
            self.0.borrow_mut().push(call.clone());
            Ok(())
        }
    }

    fn context() -> (PanelContext, Rc<RefCell<Vec<WireCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let context = PanelContext::new(Box::new(Recorder(calls.clone())), HudSettings::default())
            .with_clock(|| 1000.0);
        (context, calls)
    }

    fn state(value: serde_json::Value) -> HostMessage {
        HostMessage::from_entry_point("onInvState", &[value]).unwrap()
    }

    fn admin(value: serde_json::Value) -> HostMessage {
        HostMessage::from_entry_point("onInvAdmin", &[value]).unwrap()
    }

    #[test]
    fn mode_and_permission_survive_partial_snapshots() {
        let (mut context, _) = context();
        let mut panel = InventoryPanel::new();

        panel.handle_message(&mut context, state(json!({"mode": "frisk", "hasAdmin": true})));
        assert_eq!(panel.mode(), InventoryMode::Frisk);
        assert!(panel.shows_admin_tab());

        panel.handle_message(&mut context, state(json!({"targetName": "Петров"})));
        assert_eq!(panel.mode(), InventoryMode::Frisk);
        assert_eq!(panel.has_admin(), Some(true));
        assert_eq!(panel.view_model().target_name, "Петров");

        panel.handle_message(&mut context, state(json!({"mode": "unknown"})));
        assert_eq!(panel.mode(), InventoryMode::Own);
    }

    #[test]
    fn ready_checks_admin_permission() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(&mut context, HostMessage::Ready);
        assert_eq!(calls.borrow()[0].function, "checkAdminPerm");
        assert!(panel.has_admin().is_none());
    }

    /// Losing the permission closes the admin tab.
    #[test]
    fn admin_tab_follows_permission() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();

        panel.open_admin(&mut context);
        assert_eq!(panel.tab(), InventoryTab::Inventory);
        assert!(calls.borrow().is_empty());

        panel.handle_message(&mut context, admin(json!({"kind": "admin_perm", "ok": true})));
        panel.open_admin(&mut context);
        assert_eq!(panel.tab(), InventoryTab::Admin);
        let functions: Vec<_> = calls.borrow().iter().map(|c| c.function).collect();
        assert_eq!(functions, vec!["requestPlayers", "requestItemsCatalog"]);

        panel.handle_message(&mut context, admin(json!({"kind": "admin_perm", "ok": false})));
        assert_eq!(panel.tab(), InventoryTab::Inventory);
        assert!(!panel.shows_admin_tab());
    }

    /// A catalog arriving while the admin tab is open refreshes the player list.
    #[test]
    fn catalog_arrival_refreshes_players() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(&mut context, admin(json!({"kind": "items_catalog", "items": []})));
        assert!(calls.borrow().is_empty());

        panel.handle_message(&mut context, admin(json!({"kind": "admin_perm", "ok": true})));
        panel.open_admin(&mut context);
        calls.borrow_mut().clear();

        panel.handle_message(
            &mut context,
            admin(json!({"kind": "items_catalog", "items": [{"id": "knife"}]})),
        );
        let functions: Vec<_> = calls.borrow().iter().map(|c| c.function).collect();
        assert_eq!(functions, vec!["requestPlayers"]);
    }

    #[test]
    fn admin_lists_are_replaced() {
        let (mut context, _) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            admin(json!({"kind": "players", "players": [{"ent": 1, "name": "A"}, {"ent": 2, "name": "B"}]})),
        );
        panel.handle_message(
            &mut context,
            admin(json!({"kind": "players", "players": {"1": {"ent": 5, "name": "C"}}})),
        );
        assert_eq!(panel.admin().players.len(), 1);
        assert_eq!(panel.admin().players[0].ent, 5);

        panel.handle_message(
            &mut context,
            admin(json!({"kind": "items_catalog", "items": [{"id": "knife", "name": "Нож"}]})),
        );
        assert_eq!(panel.admin().catalog[0].display_name(), "Нож");
    }

    /// "N…" asks for a quantity and only a positive number is sent.
    #[test]
    fn quantity_prompt_sends_positive_numbers() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            state(json!({"inv": {"items": [{"uid": 41, "name": "Патрон", "count": 30}]}})),
        );

        let panes = panel.panes(context.now_unix());
        let prompt = panes[1].rows[0].actions.last().unwrap().command.clone();

        panel.execute(&mut context, prompt.clone());
        assert_eq!(panel.prompt().map(|p| p.text.as_str()), Some("1"));
        panel.set_prompt_text("abc");
        panel.confirm_prompt(&mut context);
        assert!(panel.prompt().is_none());
        assert!(calls.borrow().is_empty());

        panel.execute(&mut context, prompt);
        panel.set_prompt_text("12 штук");
        panel.confirm_prompt(&mut context);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function, "invAction");
        assert_eq!(calls[0].args, vec!["drop".to_string(), r#"{"uid":41,"n":12}"#.to_string()]);
    }

    fn press(
        panel: &mut InventoryPanel,
        context: &mut PanelContext,
        ctx: &egui::Context,
        key: egui::Key,
    ) {
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| panel.render_ui(context, ctx));
    }

    /// Escape closes the quantity prompt, Enter sends it.
    #[test]
    fn quantity_prompt_keys() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            state(json!({"inv": {"items": [{"uid": 41, "name": "Патрон", "count": 30}]}})),
        );
        let prompt = panel.panes(context.now_unix())[1].rows[0]
            .actions
            .last()
            .unwrap()
            .command
            .clone();
        let ctx = egui::Context::default();

        panel.execute(&mut context, prompt.clone());
        press(&mut panel, &mut context, &ctx, egui::Key::Escape);
        assert!(panel.prompt().is_none());
        assert!(calls.borrow().is_empty());

        panel.execute(&mut context, prompt);
        panel.set_prompt_text("3");
        press(&mut panel, &mut context, &ctx, egui::Key::Enter);
        assert!(panel.prompt().is_none());
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["drop".to_string(), r#"{"uid":41,"n":3}"#.to_string()]);
    }

    /// Double click performs the pane's primary action.
    #[test]
    fn double_click_runs_primary_action() {
        let (mut context, calls) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            state(json!({
                "mode": "container",
                "containerEnt": 9,
                "inv": {"items": [{"uid": "a1", "name": "Вода"}]},
                "container": {"items": [{"uid": 3, "name": "Хлеб"}]}
            })),
        );

        let panes = panel.panes(context.now_unix());
        for pane in &panes[1..] {
            let command = pane.rows[0].double_click.clone().unwrap();
            panel.execute(&mut context, command);
        }

        let calls = calls.borrow();
        assert_eq!(
            calls[0].args,
            vec!["move_to_container".to_string(), r#"{"ent":9,"uid":"a1","n":1}"#.to_string()]
        );
        assert_eq!(
            calls[1].args,
            vec!["move_from_container".to_string(), r#"{"ent":9,"uid":3,"n":1}"#.to_string()]
        );
    }

    /// Rows of an item being equipped offer nothing until the countdown ends.
    #[test]
    fn in_flight_equip_uses_panel_clock() {
        let (mut context, _) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            state(json!({
                "inv": {"items": [{"uid": 1, "name": "Бронежилет"}]},
                "progress": {"1": {"kind": "equip", "endT": 1003.4}}
            })),
        );

        let panes = panel.panes(context.now_unix());
        let row = &panes[1].rows[0];
        assert_eq!(row.subtitle.as_deref(), Some("Экипировка: 3.4s"));
        assert!(row.actions.is_empty());
        assert!(row.double_click.is_none());
    }

    #[test]
    fn search_text_is_kept_per_pane() {
        let (mut context, _) = context();
        let mut panel = InventoryPanel::new();
        panel.handle_message(
            &mut context,
            state(json!({"inv": {"items": [{"uid": 1, "name": "Аптечка"}, {"uid": 2, "name": "Нож"}]}})),
        );
        panel.set_query(PaneId::OwnItems, "НОЖ");
        panel.handle_message(
            &mut context,
            state(json!({"inv": {"items": [{"uid": 2, "name": "Нож"}, {"uid": 3, "name": "Ножницы"}]}})),
        );

        let panes = panel.panes(0.0);
        assert_eq!(panes[1].rows.len(), 2);
    }
}
