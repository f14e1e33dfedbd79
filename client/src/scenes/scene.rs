use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use hud_core::bridge::{dispatch, HostBridge, HostCall};
use hud_core::messages::{HostMessage, PanelKind};
use hud_core::requests::{PendingRequests, RequestKind};
use serde_json::Value;

use crate::scenes::helpers;
use crate::settings::HudSettings;

/// Trait implemented by each HUD panel (character select, crafting, inventory, loading).
///
/// The panel manager drives the lifecycle: `on_enter` → host messages and frames
/// (`handle_message`, `update`, `render_ui`) → `on_exit`.
pub trait Panel {
    /// Called once when the panel becomes active.
    fn on_enter(&mut self, _context: &mut PanelContext) {}

    /// Called once when the panel is about to be replaced by another.
    fn on_exit(&mut self, _context: &mut PanelContext) {}

    /// Applies one host message to the panel's view state.
    fn handle_message(&mut self, context: &mut PanelContext, message: HostMessage);

    /// Per-frame logic update. `dt` is the time elapsed since the last frame.
    fn update(&mut self, _context: &mut PanelContext, _dt: Duration) {}

    /// Draws the panel from its current view state.
    fn render_ui(&mut self, context: &mut PanelContext, ctx: &egui::Context);
}

fn system_unix_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// Everything a panel needs besides its own state: the host bridge, settings, request
/// bookkeeping and the blocking alert.
pub struct PanelContext {
    bridge: Box<dyn HostBridge>,
    pub settings: HudSettings,
    pub requests: PendingRequests,
    alert: Option<String>,
    clock: fn() -> f64,
}

impl PanelContext {
    pub fn new(bridge: Box<dyn HostBridge>, settings: HudSettings) -> Self {
        Self {
            bridge,
            settings,
            requests: PendingRequests::new(),
            alert: None,
            clock: system_unix_time,
        }
    }

    /// Replaces the wall clock used for progress countdowns.
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    /// Current unix time in seconds.
    pub fn now_unix(&self) -> f64 {
        (self.clock)()
    }

    /// Sends `call` to the host. Requests are tracked until their answer arrives.
    pub fn send(&mut self, call: HostCall) -> bool {
        let request = call
            .request_kind()
            .map(|kind| (kind, self.requests.begin(kind, Instant::now())));

        let sent = dispatch(self.bridge.as_mut(), &call);
        if !sent {
            if let Some((kind, id)) = request {
                log::debug!("Forgetting request {:?} #{}", kind, id.0);
                self.requests.forget(id);
            }
        }
        sent
    }

    /// True when a request of `kind` went unanswered for longer than the configured timeout.
    pub fn is_stale(&self, kind: RequestKind) -> bool {
        self.requests
            .is_stale(kind, Instant::now(), self.settings.request_timeout())
    }

    /// Raises a blocking alert; a newer alert replaces the one shown.
    pub fn alert(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("Alert: {text}");
        self.alert = Some(text);
    }

    pub fn alert_text(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

/// Owns all panel instances and routes host messages to them.
///
/// Exactly one panel is active (drawn and updated) at a time; messages always reach the
/// panel that owns them, active or not.
pub struct PanelManager {
    active_panel: PanelKind,
    panels: HashMap<PanelKind, Box<dyn Panel>>,
    context: PanelContext,
}

impl PanelManager {
    /// Creates a manager with every known panel, starting on `settings.initial_panel`.
    pub fn new(bridge: Box<dyn HostBridge>, settings: HudSettings) -> Self {
        Self::with_context(PanelContext::new(bridge, settings))
    }

    pub fn with_context(mut context: PanelContext) -> Self {
        let mut panel_map: HashMap<PanelKind, Box<dyn Panel>> = HashMap::new();

        panel_map.insert(
            PanelKind::CharacterSelect,
            Box::new(crate::scenes::character_select::CharacterSelectPanel::new()),
        );

        panel_map.insert(
            PanelKind::Crafting,
            Box::new(crate::scenes::crafting::CraftingPanel::new()),
        );

        panel_map.insert(
            PanelKind::Inventory,
            Box::new(crate::scenes::inventory::InventoryPanel::new()),
        );

        panel_map.insert(
            PanelKind::Loading,
            Box::new(crate::scenes::loading::LoadingPanel::new()),
        );

        let active_panel = context.settings.initial_panel;
        if let Some(panel) = panel_map.get_mut(&active_panel) {
            panel.on_enter(&mut context);
        }

        PanelManager {
            active_panel,
            panels: panel_map,
            context,
        }
    }

    pub fn active_panel(&self) -> PanelKind {
        self.active_panel
    }

    pub fn context(&self) -> &PanelContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PanelContext {
        &mut self.context
    }

    /// Decodes a host entry point call and delivers it. Bad calls are logged and dropped.
    pub fn deliver_entry_point(&mut self, name: &str, args: &[Value]) {
        match HostMessage::from_entry_point(name, args) {
            Ok(message) => self.deliver(message),
            Err(err) => log::warn!("Dropping host call: {}", err),
        }
    }

    /// Routes one host message to the panel that owns it.
    ///
    /// Page-wide hooks (`GMOD_READY`) go to the active panel.
    pub fn deliver(&mut self, message: HostMessage) {
        if let Some(kind) = message.answers() {
            if self.context.requests.resolve(kind).is_none() {
                log::debug!("Unsolicited {}", message.entry_point());
            }
        }

        let target = message.panel().unwrap_or(self.active_panel);
        log::debug!("<- {} ({:?})", message.entry_point(), target);

        match self.panels.get_mut(&target) {
            Some(panel) => panel.handle_message(&mut self.context, message),
            None => log::error!("No panel registered for {:?}", target),
        }
    }

    /// Runs the active panel's per-frame update.
    pub fn update(&mut self, dt: Duration) {
        if let Some(panel) = self.panels.get_mut(&self.active_panel) {
            panel.update(&mut self.context, dt);
        }
    }

    /// Draws the active panel, then the alert on top of it.
    pub fn render_ui(&mut self, ctx: &egui::Context) {
        if let Some(panel) = self.panels.get_mut(&self.active_panel) {
            panel.render_ui(&mut self.context, ctx);
        }

        if let Some(text) = self.context.alert_text() {
            if helpers::draw_alert(ctx, text) {
                self.context.dismiss_alert();
            }
        }
    }

    /// Switches the active panel, calling `on_exit` / `on_enter`.
    pub fn set_panel(&mut self, kind: PanelKind) {
        if kind == self.active_panel {
            return;
        }

        if !self.panels.contains_key(&kind) {
            log::error!("Attempted to switch to unknown panel: {:?}", kind);
            return;
        }

        log::info!("Switching to panel: {:?}", kind);

        if let Some(current) = self.panels.get_mut(&self.active_panel) {
            current.on_exit(&mut self.context);
        }

        self.active_panel = kind;

        if let Some(next) = self.panels.get_mut(&self.active_panel) {
            next.on_enter(&mut self.context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_core::bridge::{BridgeError, WireCall};

    struct Detached;

    impl HostBridge for Detached {
        fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError> {
            Err(BridgeError::MissingMethod(call.function.to_string()))
        }
    }

    /// A call that never reached the host stops being tracked; older requests stay.
    #[test]
    fn failed_send_forgets_only_its_own_request() {
        let mut context = PanelContext::new(Box::new(Detached), HudSettings::default());
        let older = context.requests.begin(RequestKind::Players, Instant::now());

        assert!(!context.send(HostCall::RequestPlayers));
        assert_eq!(context.requests.len(), 1);
        assert_eq!(context.requests.resolve(RequestKind::Players), Some(older));
    }
}
