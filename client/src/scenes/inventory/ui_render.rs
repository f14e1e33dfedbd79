use egui::RichText;

use hud_core::requests::RequestKind;
use hud_core::types::SpawnDestination;

use crate::scenes::helpers;
use crate::scenes::scene::PanelContext;

use super::admin::catalog_subtitle;
use super::view::{InvCommand, PaneView};
use super::{InventoryPanel, InventoryTab};

const PANE_HEIGHT: f32 = 380.0;

/// Clicks collected while drawing the admin tab, applied afterwards.
enum AdminAction {
    Refresh,
    Open(i64),
    Select(i64),
    Pick(String),
    SpawnOne(String),
    PickAndSpawn(String),
    Spawn,
}

impl InventoryPanel {
    /// Escape and Enter drive the quantity prompt. An open alert takes the keyboard.
    pub(super) fn handle_keys(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        if context.has_alert() || self.prompt.is_none() {
            return;
        }

        let (escape, enter) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Enter),
            )
        });

        if escape {
            self.cancel_prompt();
        } else if enter {
            self.confirm_prompt(context);
        }
    }

    pub(super) fn draw(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        let mut command = None;
        let mut admin_action = None;
        let mut open_admin = false;

        egui::Window::new("inventory")
            .title_bar(false)
            .default_width(960.0)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if self.shows_admin_tab() {
                    ui.horizontal(|ui| {
                        if ui
                            .selectable_label(self.tab == InventoryTab::Inventory, "Инвентарь")
                            .clicked()
                        {
                            self.show_inventory();
                        }
                        if ui
                            .selectable_label(self.tab == InventoryTab::Admin, "Админ-панель")
                            .clicked()
                        {
                            open_admin = true;
                        }
                    });
                    ui.separator();
                }

                match self.tab {
                    InventoryTab::Inventory => {
                        let panes = self.panes(context.now_unix());
                        command = self.draw_panes(ui, &panes);
                    }
                    InventoryTab::Admin => {
                        let stale_players = context.is_stale(RequestKind::Players);
                        let stale_catalog = context.is_stale(RequestKind::ItemsCatalog);
                        admin_action = self.draw_admin(ui, stale_players, stale_catalog);
                    }
                }
            });

        self.draw_prompt(context, ctx);

        if open_admin {
            self.open_admin(context);
        }
        if let Some(command) = command {
            self.execute(context, command);
        }
        if let Some(action) = admin_action {
            self.run_admin_action(context, action);
        }
    }

    fn draw_panes(&mut self, ui: &mut egui::Ui, panes: &[PaneView]) -> Option<InvCommand> {
        let mut clicked = None;
        let queries = &mut self.queries;

        ui.columns(panes.len().max(1), |columns| {
            for (column, pane) in columns.iter_mut().zip(panes) {
                helpers::pane_header(column, &pane.title, pane.load_line.as_deref());
                if pane.searchable {
                    helpers::search_field(column, queries.entry(pane.id).or_default());
                }
                column.separator();

                egui::ScrollArea::vertical()
                    .id_salt(pane.id.salt())
                    .max_height(PANE_HEIGHT)
                    .show(column, |ui| {
                        if pane.rows.is_empty() {
                            helpers::empty_marker(ui, pane.empty_text);
                        }

                        for row in &pane.rows {
                            helpers::row_frame(ui, false, |ui| {
                                let title = helpers::row_title(ui, &row.title, row.subtitle.is_some());
                                if title.double_clicked() {
                                    if let Some(command) = &row.double_click {
                                        clicked = Some(command.clone());
                                    }
                                }

                                if let Some(weight) = &row.weight {
                                    ui.weak(weight);
                                }
                                if let Some(subtitle) = &row.subtitle {
                                    ui.label(RichText::new(subtitle).italics());
                                }

                                if !row.actions.is_empty() {
                                    ui.horizontal_wrapped(|ui| {
                                        for action in &row.actions {
                                            if ui.small_button(&action.label).clicked() {
                                                clicked = Some(action.command.clone());
                                            }
                                        }
                                    });
                                }
                            });
                        }
                    });
            }
        });

        clicked
    }

    fn draw_admin(
        &mut self,
        ui: &mut egui::Ui,
        stale_players: bool,
        stale_catalog: bool,
    ) -> Option<AdminAction> {
        let mut action = None;
        let admin = &mut self.admin;

        ui.columns(2, |columns| {
            let (left, right) = columns.split_at_mut(1);
            let left = &mut left[0];
            let right = &mut right[0];

            // Players
            helpers::pane_header(left, "Игроки", None);
            left.horizontal(|ui| {
                if ui.button("Обновить список").clicked() {
                    action = Some(AdminAction::Refresh);
                }
                if stale_players {
                    helpers::stale_marker(ui);
                }
            });
            helpers::search_field(left, &mut admin.player_query);
            left.separator();

            egui::ScrollArea::vertical()
                .id_salt("admin_players")
                .max_height(PANE_HEIGHT)
                .show(left, |ui| {
                    let rows = admin.player_rows();
                    if rows.is_empty() {
                        helpers::empty_marker(ui, "Пусто");
                    }
                    for player in rows {
                        let selected = admin.selected_player == Some(player.ent);
                        helpers::row_frame(ui, selected, |ui| {
                            if helpers::row_title(ui, &player.name, !player.alive).double_clicked() {
                                action = Some(AdminAction::Open(player.ent));
                            }
                            ui.weak(format!("{} · {}", player.steamid, player.status_label()));
                            ui.horizontal(|ui| {
                                if ui.small_button("Открыть (RO)").clicked() {
                                    action = Some(AdminAction::Open(player.ent));
                                }
                                if ui.small_button("Выбрать").clicked() {
                                    action = Some(AdminAction::Select(player.ent));
                                }
                            });
                        });
                    }
                });

            // Spawn form
            helpers::pane_header(right, "Выдать предмет", None);
            egui::Grid::new("spawn_form")
                .num_columns(2)
                .show(right, |ui| {
                    ui.label("ID предмета");
                    ui.text_edit_singleline(&mut admin.spawn_id);
                    ui.end_row();

                    ui.label("Количество");
                    ui.add(egui::TextEdit::singleline(&mut admin.spawn_count).desired_width(60.0));
                    ui.end_row();

                    ui.label("Куда");
                    egui::ComboBox::from_id_salt("spawn_destination")
                        .selected_text(admin.destination.label())
                        .show_ui(ui, |ui| {
                            for destination in SpawnDestination::ALL {
                                ui.selectable_value(
                                    &mut admin.destination,
                                    destination,
                                    destination.label(),
                                );
                            }
                        });
                    ui.end_row();
                });

            let player_line = match admin.selected_player_name() {
                Some(name) => format!("Игрок: {name}"),
                None => "Игрок не выбран".to_string(),
            };
            right.weak(player_line);
            if right.button("Спавн").clicked() {
                action = Some(AdminAction::Spawn);
            }
            right.separator();

            // Catalog
            right.horizontal(|ui| {
                ui.strong("Каталог предметов");
                if stale_catalog {
                    helpers::stale_marker(ui);
                }
            });
            helpers::search_field(right, &mut admin.catalog_query);

            egui::ScrollArea::vertical()
                .id_salt("admin_catalog")
                .max_height(PANE_HEIGHT / 2.0)
                .show(right, |ui| {
                    let rows = admin.catalog_rows();
                    if rows.is_empty() {
                        helpers::empty_marker(ui, "Пусто");
                    }
                    for entry in rows {
                        let selected = admin.spawn_id.trim() == entry.id;
                        helpers::row_frame(ui, selected, |ui| {
                            if helpers::row_title(ui, entry.display_name(), false).double_clicked() {
                                action = Some(AdminAction::PickAndSpawn(entry.id.clone()));
                            }
                            ui.weak(catalog_subtitle(entry));
                            ui.horizontal(|ui| {
                                if ui.small_button("Выбрать").clicked() {
                                    action = Some(AdminAction::Pick(entry.id.clone()));
                                }
                                if ui.small_button("Спавн x1").clicked() {
                                    action = Some(AdminAction::SpawnOne(entry.id.clone()));
                                }
                            });
                        });
                    }
                });
        });

        action
    }

    fn run_admin_action(&mut self, context: &mut PanelContext, action: AdminAction) {
        match action {
            AdminAction::Refresh => self.admin.refresh_players(context),
            AdminAction::Open(ent) => self.admin.open_player(context, ent),
            AdminAction::Select(ent) => self.admin.select_player(ent),
            AdminAction::Pick(id) => self.admin.pick_item(&id),
            AdminAction::SpawnOne(id) => self.admin.spawn_one(context, &id),
            AdminAction::PickAndSpawn(id) => self.admin.pick_and_spawn(context, &id),
            AdminAction::Spawn => self.admin.spawn(context),
        }
    }

    fn draw_prompt(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        let mut confirm = false;
        let mut cancel = false;

        egui::Window::new(prompt.title)
            .id(egui::Id::new("quantity_prompt"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let input = ui.text_edit_singleline(&mut prompt.text);
                if std::mem::take(&mut prompt.focus) {
                    input.request_focus();
                }
                ui.horizontal(|ui| {
                    confirm = ui.button("OK").clicked();
                    cancel = ui.button("Отмена").clicked();
                });
            });

        if confirm {
            self.confirm_prompt(context);
        } else if cancel {
            self.cancel_prompt();
        }
    }
}
