use std::time::Duration;

use hud_core::circular_buffer::CircularBuffer;
use hud_core::constants::{
    LOADING_HISTORY_LEN, LOAD_FLOOR_CLIENT_INFO, LOAD_FLOOR_WORKSHOP, LOAD_STATUS_INCREMENT,
    STATUS_CLIENT_INFO_SENT, STATUS_STARTING_LUA, STATUS_WORKSHOP_COMPLETE,
};
use hud_core::messages::{GameDetails, HostMessage};
use hud_core::string_operations::strip_quotes;

use crate::scenes::scene::{Panel, PanelContext};

/// Opacity of the history line `age` entries old.
pub fn history_opacity(age: usize) -> f32 {
    (1.0 - 0.1 * age as f32).max(0.0)
}

/// Stand-in host used when the game never talks to the loading screen.
#[derive(Debug)]
struct FallbackLoad {
    needed: i64,
    since_tick: Duration,
    finished: bool,
}

pub struct LoadingPanel {
    host_seen: bool,
    waited: Duration,
    fallback: Option<FallbackLoad>,

    map_name: String,
    total_files: i64,
    total_known: bool,
    needed_files: Option<i64>,

    percent: f32,
    allow_increment: bool,
    history: CircularBuffer<String>,
}

impl LoadingPanel {
    pub fn new() -> Self {
        Self {
            host_seen: false,
            waited: Duration::ZERO,
            fallback: None,
            map_name: String::new(),
            total_files: 0,
            total_known: false,
            needed_files: None,
            percent: 0.0,
            allow_increment: true,
            history: CircularBuffer::new(LOADING_HISTORY_LEN),
        }
    }

    /// Progress shown on the bar, in whole percent.
    pub fn percent(&self) -> u32 {
        self.percent.round().clamp(0.0, 100.0) as u32
    }

    pub fn label(&self) -> String {
        format!("Загрузка: {}%", self.percent())
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn is_simulating(&self) -> bool {
        self.fallback.is_some()
    }

    /// History lines, newest first.
    pub fn history(&self) -> impl Iterator<Item = &String> + '_ {
        self.history.iter()
    }

    /// Raises the bar to `percent`; it never moves backwards.
    fn set_load(&mut self, percent: f32) {
        self.percent = self.percent.max(percent.min(100.0));
    }

    fn apply(&mut self, message: HostMessage) {
        match message {
            HostMessage::GameDetails(details) => {
                log::info!(
                    "Joining {} on {} ({} slots)",
                    details.server_name,
                    details.map_name,
                    details.max_players
                );
                self.map_name = details.map_name;
            }
            HostMessage::FilesTotal(total) => {
                self.total_files = total;
                self.total_known = true;
            }
            HostMessage::FilesNeeded(needed) => {
                self.needed_files = Some(needed);
                if self.total_known && self.total_files > 0 {
                    let done = 100.0 - (needed as f64 / self.total_files as f64 * 100.0).round();
                    self.set_load(done as f32);
                }
            }
            HostMessage::DownloadingFile(file) => {
                self.history.push(format!("Файл: {}", strip_quotes(&file)));
            }
            HostMessage::StatusChanged(status) => {
                self.history.push(format!("Статус: {status}"));
                match status.as_str() {
                    STATUS_WORKSHOP_COMPLETE => {
                        self.allow_increment = false;
                        self.set_load(LOAD_FLOOR_WORKSHOP);
                    }
                    STATUS_CLIENT_INFO_SENT => {
                        self.allow_increment = false;
                        self.set_load(LOAD_FLOOR_CLIENT_INFO);
                    }
                    STATUS_STARTING_LUA => self.set_load(100.0),
                    _ => {
                        if self.allow_increment {
                            self.set_load(self.percent + LOAD_STATUS_INCREMENT);
                        }
                    }
                }
            }
            other => log::debug!("Loading screen ignores {}", other.entry_point()),
        }
    }

    fn start_fallback(&mut self, file_count: i64) {
        log::info!("No loading calls from the host, simulating a load");
        self.apply(HostMessage::GameDetails(GameDetails {
            server_name: "SPF Base".to_string(),
            server_url: String::new(),
            map_name: "rp_downtown".to_string(),
            max_players: 64,
            steam_id: "76561198000000000".to_string(),
            gamemode: "militaryrp".to_string(),
        }));
        self.apply(HostMessage::FilesTotal(file_count));
        self.apply(HostMessage::StatusChanged("Connecting...".to_string()));

        self.fallback = Some(FallbackLoad {
            needed: file_count,
            since_tick: Duration::ZERO,
            finished: false,
        });
    }

    /// Advances the simulated load by the ticks that fit in `dt`.
    fn advance_fallback(&mut self, dt: Duration, tick: Duration) {
        let mut due = Vec::new();
        if let Some(fallback) = self.fallback.as_mut() {
            fallback.since_tick += dt;
            while !fallback.finished && fallback.since_tick >= tick {
                fallback.since_tick -= tick;
                if fallback.needed > 0 {
                    fallback.needed -= 1;
                    due.push(HostMessage::FilesNeeded(fallback.needed));
                    due.push(HostMessage::DownloadingFile(format!(
                        "materials/example_{}.vtf",
                        fallback.needed
                    )));
                } else {
                    fallback.finished = true;
                    due.push(HostMessage::StatusChanged(STATUS_STARTING_LUA.to_string()));
                }
            }
        }

        for message in due {
            self.apply(message);
        }
    }
}

impl Default for LoadingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for LoadingPanel {
    fn handle_message(&mut self, _context: &mut PanelContext, message: HostMessage) {
        if message.panel().is_some() && !self.host_seen {
            self.host_seen = true;
            if self.fallback.take().is_some() {
                log::info!("Host took over the loading screen");
            }
        }
        self.apply(message);
    }

    fn update(&mut self, context: &mut PanelContext, dt: Duration) {
        if self.host_seen {
            return;
        }

        if self.fallback.is_none() {
            self.waited += dt;
            if self.waited >= context.settings.loading_grace() {
                self.start_fallback(context.settings.fallback_file_count.max(0));
            }
            return;
        }

        self.advance_fallback(dt, context.settings.fallback_tick());
    }

    fn render_ui(&mut self, _context: &mut PanelContext, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading(&self.map_name);
                ui.add_space(16.0);

                ui.add(
                    egui::ProgressBar::new(self.percent() as f32 / 100.0)
                        .desired_width(480.0)
                        .text(self.label()),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if self.total_known {
                        ui.label(format!("Всего файлов: {}", self.total_files));
                    }
                    if let Some(needed) = self.needed_files {
                        ui.label(format!("Осталось: {needed}"));
                    }
                });

                ui.add_space(16.0);
                let base = ui.visuals().text_color();
                for (age, line) in self.history.iter().enumerate() {
                    ui.colored_label(base.gamma_multiply(history_opacity(age)), line);
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HudSettings;
    use hud_core::bridge::{BridgeError, HostBridge, WireCall};

    struct Silent;

    impl HostBridge for Silent {
        fn invoke(&mut self, _call: &WireCall) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    fn context() -> PanelContext {
        PanelContext::new(Box::new(Silent), HudSettings::default())
    }

    /// Counting the needed files down from the total only ever raises the bar.
    #[test]
    fn progress_increases_monotonically_to_completion() {
        let mut context = context();
        let mut panel = LoadingPanel::new();
        panel.handle_message(&mut context, HostMessage::FilesTotal(25));

        let mut last = panel.percent();
        for needed in (0..=25).rev() {
            panel.handle_message(&mut context, HostMessage::FilesNeeded(needed));
            let now = panel.percent();
            if needed < 25 {
                assert!(now > last, "{now} should exceed {last}");
            }
            last = now;
        }
        assert_eq!(last, 100);
    }

    /// A status floor never pulls the bar back down.
    #[test]
    fn floors_never_lower_progress() {
        let mut context = context();
        let mut panel = LoadingPanel::new();
        panel.handle_message(&mut context, HostMessage::FilesTotal(10));
        panel.handle_message(&mut context, HostMessage::FilesNeeded(1));
        assert_eq!(panel.percent(), 90);

        panel.handle_message(
            &mut context,
            HostMessage::StatusChanged(STATUS_WORKSHOP_COMPLETE.to_string()),
        );
        assert_eq!(panel.percent(), 90);

        panel.handle_message(
            &mut context,
            HostMessage::StatusChanged(STATUS_CLIENT_INFO_SENT.to_string()),
        );
        assert_eq!(panel.percent(), 95);
        assert_eq!(panel.label(), "Загрузка: 95%");
    }

    /// Small status increments accumulate until they show.
    #[test]
    fn status_increments_accumulate() {
        let mut context = context();
        let mut panel = LoadingPanel::new();
        for _ in 0..6 {
            panel.handle_message(&mut context, HostMessage::StatusChanged("Mounting".into()));
        }
        assert_eq!(panel.percent(), 1);

        panel.handle_message(
            &mut context,
            HostMessage::StatusChanged(STATUS_WORKSHOP_COMPLETE.to_string()),
        );
        panel.handle_message(&mut context, HostMessage::StatusChanged("Mounting".into()));
        assert_eq!(panel.percent(), 80);
    }

    /// Only the newest ten lines are kept; file names lose quotes.
    #[test]
    fn history_keeps_newest_entries() {
        let mut context = context();
        let mut panel = LoadingPanel::new();
        for i in 0..12 {
            panel.handle_message(
                &mut context,
                HostMessage::DownloadingFile(format!("\"maps/part_{i}.bsp?\"")),
            );
        }
        let lines: Vec<_> = panel.history().cloned().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Файл: maps/part_11.bsp");
        assert_eq!(lines[9], "Файл: maps/part_2.bsp");
        assert!((history_opacity(9) - 0.1).abs() < 1e-6);
    }

    /// Without host calls the panel simulates a load after the grace period.
    #[test]
    fn fallback_simulation_runs_to_completion() {
        let mut context = context();
        let mut panel = LoadingPanel::new();

        panel.update(&mut context, Duration::from_millis(500));
        assert!(!panel.is_simulating());

        panel.update(&mut context, Duration::from_millis(600));
        assert!(panel.is_simulating());
        assert_eq!(panel.map_name(), "rp_downtown");
        assert_eq!(panel.history().next().map(String::as_str), Some("Статус: Connecting..."));

        panel.update(&mut context, Duration::from_millis(300));
        assert_eq!(panel.percent(), 4);

        panel.update(&mut context, Duration::from_secs(30));
        assert_eq!(panel.percent(), 100);
        assert_eq!(panel.history().next().map(String::as_str), Some("Статус: Starting Lua..."));
    }

    /// A host call stops the simulation and keeps the panel under host control.
    #[test]
    fn host_call_cancels_fallback() {
        let mut context = context();
        let mut panel = LoadingPanel::new();
        panel.update(&mut context, Duration::from_secs(2));
        assert!(panel.is_simulating());

        panel.handle_message(&mut context, HostMessage::FilesTotal(3));
        assert!(!panel.is_simulating());
        panel.update(&mut context, Duration::from_secs(10));
        assert!(!panel.is_simulating());
    }
}
