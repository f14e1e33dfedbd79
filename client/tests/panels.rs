use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hud_client::fixtures::sample_calls;
use hud_client::scenes::scene::PanelManager;
use hud_client::settings::HudSettings;
use hud_core::bridge::{BridgeError, HostBridge, WireCall};
use hud_core::messages::{HostMessage, PanelKind};
use hud_core::requests::RequestKind;
use serde_json::json;

type Calls = Rc<RefCell<Vec<WireCall>>>;

struct Recorder(Calls);

impl HostBridge for Recorder {
    fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError> {
        self.0.borrow_mut().push(call.clone());
        Ok(())
    }
}

/// Bridge whose every method is missing, like a page opened outside the game.
struct Detached;

impl HostBridge for Detached {
    fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError> {
        Err(BridgeError::MissingMethod(call.function.to_string()))
    }
}

fn manager_with(settings: HudSettings) -> (PanelManager, Calls) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let manager = PanelManager::new(Box::new(Recorder(calls.clone())), settings);
    (manager, calls)
}

fn manager() -> (PanelManager, Calls) {
    manager_with(HudSettings::default())
}

fn functions(calls: &Calls) -> Vec<&'static str> {
    calls.borrow().iter().map(|call| call.function).collect()
}

fn frame(ctx: &egui::Context, manager: &mut PanelManager, events: Vec<egui::Event>) {
    let input = egui::RawInput {
        events,
        ..Default::default()
    };
    let _ = ctx.run(input, |ctx| manager.render_ui(ctx));
}

/// One frame with `key` pressed while `modifiers` are held.
fn press(
    ctx: &egui::Context,
    manager: &mut PanelManager,
    key: egui::Key,
    modifiers: egui::Modifiers,
) {
    let input = egui::RawInput {
        modifiers,
        events: vec![egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }],
        ..Default::default()
    };
    let _ = ctx.run(input, |ctx| manager.render_ui(ctx));
}

#[test]
fn ready_hook_goes_to_the_active_panel() {
    let (mut manager, calls) = manager();
    assert_eq!(manager.active_panel(), PanelKind::CharacterSelect);

    manager.deliver_entry_point("GMOD_READY", &[]);
    assert_eq!(functions(&calls), vec!["requestBackstories"]);

    manager.set_panel(PanelKind::Inventory);
    manager.deliver(HostMessage::Ready);
    assert_eq!(functions(&calls), vec!["requestBackstories", "checkAdminPerm"]);
}

/// Answers reach their panel and settle the request even when another panel is shown.
#[test]
fn answers_resolve_pending_requests() {
    let (mut manager, _calls) = manager();
    manager.set_panel(PanelKind::Inventory);
    manager.deliver(HostMessage::Ready);
    assert!(manager.context().requests.is_pending(RequestKind::AdminPermission));

    manager.set_panel(PanelKind::Crafting);
    manager.deliver_entry_point("onInvAdmin", &[json!({"kind": "admin_perm", "ok": true})]);
    assert!(!manager.context().requests.is_pending(RequestKind::AdminPermission));
}

#[test]
fn unanswered_requests_go_stale() {
    let settings = HudSettings {
        request_timeout_secs: 0.0,
        ..HudSettings::default()
    };
    let (mut manager, _calls) = manager_with(settings);

    manager.deliver(HostMessage::Ready);
    std::thread::sleep(Duration::from_millis(5));
    assert!(manager.context().is_stale(RequestKind::Backstories));

    let (name, args) = sample_calls(PanelKind::CharacterSelect)
        .into_iter()
        .find(|(name, _)| *name == "onBackstories")
        .unwrap();
    manager.deliver_entry_point(name, &args);
    assert!(!manager.context().is_stale(RequestKind::Backstories));
    assert!(!manager.context().requests.is_pending(RequestKind::Backstories));
}

/// A call the bridge cannot deliver is not left waiting for an answer.
#[test]
fn failed_sends_are_not_tracked() {
    let mut manager = PanelManager::new(Box::new(Detached), HudSettings::default());
    manager.deliver(HostMessage::Ready);
    assert!(!manager.context().requests.is_pending(RequestKind::Backstories));
}

#[test]
fn bad_host_calls_are_dropped() {
    let (mut manager, calls) = manager();
    manager.deliver_entry_point("onWeather", &[json!({"rain": true})]);
    manager.deliver_entry_point("onInvAdmin", &[json!({"kind": "weather"})]);
    assert!(calls.borrow().is_empty());
    assert!(!manager.context().has_alert());
}

/// Host errors raise the alert, which Enter dismisses.
#[test]
fn host_error_alert_is_dismissed_with_enter() {
    let (mut manager, _calls) = manager();
    manager.deliver_entry_point("onCharError", &[json!("Имя уже занято")]);
    assert_eq!(manager.context().alert_text(), Some("Имя уже занято"));

    let ctx = egui::Context::default();
    frame(&ctx, &mut manager, Vec::new());
    assert!(manager.context().has_alert());

    frame(
        &ctx,
        &mut manager,
        vec![egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }],
    );
    assert!(!manager.context().has_alert());
}

#[test]
fn loading_screen_simulates_without_host() {
    let settings = HudSettings {
        initial_panel: PanelKind::Loading,
        ..HudSettings::default()
    };
    let (mut manager, calls) = manager_with(settings);

    manager.update(Duration::from_secs(2));
    manager.update(Duration::from_secs(60));

    let ctx = egui::Context::default();
    frame(&ctx, &mut manager, Vec::new());
    assert!(calls.borrow().is_empty());
}

/// Every panel draws headlessly from its sample payloads.
#[test]
fn every_panel_renders_sample_state() {
    let (mut manager, _calls) = manager();
    let ctx = egui::Context::default();

    for kind in PanelKind::ALL {
        manager.set_panel(kind);
        for (name, args) in sample_calls(kind) {
            manager.deliver_entry_point(name, &args);
        }
        manager.update(Duration::from_millis(16));

        frame(&ctx, &mut manager, Vec::new());
        frame(&ctx, &mut manager, Vec::new());
        assert_eq!(manager.active_panel(), kind);
    }
}

/// Ctrl+N opens the create screen from the list and Escape goes back.
#[test]
fn character_select_keys_switch_screens() {
    let (mut manager, calls) = manager();
    let ctx = egui::Context::default();
    let ctrl = egui::Modifiers {
        ctrl: true,
        command: true,
        ..Default::default()
    };

    frame(&ctx, &mut manager, Vec::new());
    press(&ctx, &mut manager, egui::Key::N, egui::Modifiers::NONE);
    assert!(calls.borrow().is_empty());

    press(&ctx, &mut manager, egui::Key::N, ctrl);
    assert_eq!(functions(&calls), vec!["requestBackstories"]);

    // Already on the create screen.
    press(&ctx, &mut manager, egui::Key::N, ctrl);
    assert_eq!(functions(&calls), vec!["requestBackstories"]);

    press(&ctx, &mut manager, egui::Key::Escape, egui::Modifiers::NONE);
    press(&ctx, &mut manager, egui::Key::N, ctrl);
    assert_eq!(functions(&calls), vec!["requestBackstories", "requestBackstories"]);
}

/// Enter crafts the selected recipe and the arrows move the selection.
#[test]
fn crafting_keys_select_and_craft() {
    let (mut manager, calls) = manager();
    manager.set_panel(PanelKind::Crafting);
    for (name, args) in sample_calls(PanelKind::Crafting) {
        manager.deliver_entry_point(name, &args);
    }
    let ctx = egui::Context::default();
    frame(&ctx, &mut manager, Vec::new());

    press(&ctx, &mut manager, egui::Key::Enter, egui::Modifiers::NONE);
    assert_eq!(calls.borrow()[0].function, "startCraft");
    assert_eq!(calls.borrow()[0].args, vec!["128", "bandage", "1"]);

    // The knife has nothing left to craft.
    press(&ctx, &mut manager, egui::Key::ArrowDown, egui::Modifiers::NONE);
    press(&ctx, &mut manager, egui::Key::Enter, egui::Modifiers::NONE);
    assert_eq!(calls.borrow().len(), 1);

    press(&ctx, &mut manager, egui::Key::ArrowDown, egui::Modifiers::NONE);
    press(&ctx, &mut manager, egui::Key::Enter, egui::Modifiers::NONE);
    assert_eq!(calls.borrow()[1].args, vec!["128", "ammo_9mm", "1"]);

    press(&ctx, &mut manager, egui::Key::ArrowUp, egui::Modifiers::NONE);
    press(&ctx, &mut manager, egui::Key::ArrowUp, egui::Modifiers::NONE);
    press(&ctx, &mut manager, egui::Key::Enter, egui::Modifiers::NONE);
    assert_eq!(calls.borrow()[2].args, vec!["128", "bandage", "1"]);
}
