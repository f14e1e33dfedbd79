//! Preview window for the HUD panels.
//!
//! Hosts the panel manager with a logging bridge and sample payloads so each panel can
//! be looked at without the game running.

use std::time::{Duration, Instant};

use eframe::egui;

use hud_client::fixtures::sample_calls;
use hud_client::preview_bridge::{CallLog, LoggingBridge};
use hud_client::scenes::scene::PanelManager;
use hud_client::settings::{self, HudSettings};
use hud_core::messages::{HostMessage, PanelKind};

const CALL_LOG_LEN: usize = 8;

fn panel_label(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::CharacterSelect => "Персонажи",
        PanelKind::Crafting => "Крафт",
        PanelKind::Inventory => "Инвентарь",
        PanelKind::Loading => "Загрузка",
    }
}

struct PreviewApp {
    manager: PanelManager,
    call_log: CallLog,
    last_frame: Instant,
}

impl PreviewApp {
    fn new(settings: HudSettings) -> Self {
        let bridge = LoggingBridge::new(CALL_LOG_LEN);
        let call_log = bridge.call_log();
        let mut manager = PanelManager::new(Box::new(bridge), settings);

        // The loading screen is left alone so its stand-in load kicks in.
        for kind in [PanelKind::CharacterSelect, PanelKind::Crafting, PanelKind::Inventory] {
            Self::replay(&mut manager, kind);
        }

        Self {
            manager,
            call_log,
            last_frame: Instant::now(),
        }
    }

    fn replay(manager: &mut PanelManager, kind: PanelKind) {
        for (name, args) in sample_calls(kind) {
            manager.deliver_entry_point(name, &args);
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("preview_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let active = self.manager.active_panel();
                for kind in PanelKind::ALL {
                    if ui.selectable_label(active == kind, panel_label(kind)).clicked() {
                        self.manager.set_panel(kind);
                    }
                }

                ui.separator();
                if ui.button("Пример").clicked() {
                    Self::replay(&mut self.manager, active);
                }
                if ui.button("GMOD_READY").clicked() {
                    self.manager.deliver(HostMessage::Ready);
                }
            });

            ui.collapsing("Вызовы хоста", |ui| {
                let log = self.call_log.borrow();
                if log.is_empty() {
                    ui.weak("-");
                }
                for line in log.iter() {
                    ui.monospace(line);
                }
            });
        });
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        self.manager.update(dt);
        self.draw_toolbar(ctx);
        self.manager.render_ui(ctx);

        // Countdowns and the stand-in load move without input.
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

fn main() -> Result<(), eframe::Error> {
    let settings_path = settings::settings_file_path();
    let (settings, settings_error) = match settings::read_settings(&settings_path) {
        Ok(settings) => (settings.unwrap_or_default(), None),
        Err(err) => (HudSettings::default(), Some(err)),
    };

    if let Err(err) =
        hud_core::initialize_logger(settings.log_level_filter(), settings.log_file.as_deref())
    {
        eprintln!("Failed to initialize logging: {err}");
    }

    if let Some(err) = settings_error {
        log::warn!("{err}. Using default HUD settings.");
    }
    log::info!("Starting panel preview on {:?}", settings.initial_panel);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("SPF HUD Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "SPF HUD Preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new(settings)))),
    )
}
