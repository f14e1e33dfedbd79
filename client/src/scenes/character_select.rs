use hud_core::bridge::HostCall;
use hud_core::constants::{NAME_MAX_LEN, NAME_MIN_LEN};
use hud_core::messages::HostMessage;
use hud_core::requests::RequestKind;
use hud_core::types::{Backstory, CharacterSummary, Gender};

use crate::scenes::helpers;
use crate::scenes::scene::{Panel, PanelContext};
use crate::spawnicons::SpawniconCache;

const ICON_SIZE: f32 = 64.0;
const PREVIEW_SIZE: f32 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    List,
    Create,
}

/// Checks a typed character name: trimmed length in characters within the allowed range.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let length = name.trim().chars().count();
    if length < NAME_MIN_LEN {
        Err("Имя слишком короткое")
    } else if length > NAME_MAX_LEN {
        Err("Слишком длинное имя")
    } else {
        Ok(())
    }
}

pub struct CharacterSelectPanel {
    screen: Screen,
    characters: Vec<CharacterSummary>,
    backstories: Vec<Backstory>,
    gender: Gender,
    name: String,
    name_hint: String,
    /// Snapshot of the backstory picked by the player.
    chosen: Option<Backstory>,
    spawnicons: SpawniconCache,
}

impl CharacterSelectPanel {
    pub fn new() -> Self {
        Self {
            screen: Screen::List,
            characters: Vec::new(),
            backstories: Vec::new(),
            gender: Gender::Male,
            name: String::new(),
            name_hint: String::new(),
            chosen: None,
            spawnicons: SpawniconCache::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn title(&self) -> &'static str {
        match self.screen {
            Screen::List => "Выбор персонажа",
            Screen::Create => "Создание персонажа",
        }
    }

    pub fn primary_label(&self) -> &'static str {
        match self.screen {
            Screen::List => "+ Создать нового",
            Screen::Create => "☰ Выбрать существующего",
        }
    }

    pub fn characters(&self) -> &[CharacterSummary] {
        &self.characters
    }

    pub fn backstories(&self) -> &[Backstory] {
        &self.backstories
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn name_hint(&self) -> &str {
        &self.name_hint
    }

    pub fn chosen_backstory_id(&self) -> Option<&str> {
        self.chosen.as_ref().map(|backstory| backstory.id.as_str())
    }

    fn has_name_generator(&self) -> bool {
        self.chosen
            .as_ref()
            .is_some_and(|backstory| backstory.has_name_generator)
    }

    pub fn show_list(&mut self) {
        self.screen = Screen::List;
    }

    /// Switches to the creation form, asking for backstories when none are cached.
    pub fn show_create(&mut self, context: &mut PanelContext) {
        self.screen = Screen::Create;
        if self.backstories.is_empty() {
            context.send(HostCall::RequestBackstories);
        }
    }

    /// Header button: flips between the two screens.
    pub fn toggle_screen(&mut self, context: &mut PanelContext) {
        match self.screen {
            Screen::List => self.show_create(context),
            Screen::Create => self.show_list(),
        }
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.refresh_name_hint();
    }

    fn refresh_name_hint(&mut self) {
        self.name_hint = match self.name_check() {
            Ok(()) => String::new(),
            Err(message) => message.to_string(),
        };
    }

    fn name_check(&self) -> Result<(), &'static str> {
        if self.has_name_generator() {
            Ok(())
        } else {
            validate_name(&self.name)
        }
    }

    /// Picks the backstory with `id` from the current list.
    pub fn select_backstory(&mut self, id: &str) {
        let Some(backstory) = self.backstories.iter().find(|b| b.id == id) else {
            log::warn!("Unknown backstory {id}");
            return;
        };

        self.chosen = Some(backstory.clone());
        if !backstory.has_name_generator {
            self.name_hint.clear();
        }
    }

    /// Model shown in the preview for the chosen backstory and gender.
    pub fn preview_model(&self) -> Option<&str> {
        self.chosen.as_ref()?.model_for(self.gender)
    }

    pub fn can_create(&self) -> bool {
        self.chosen.is_some() && self.name_check().is_ok()
    }

    /// Create button. Validation failures are reported locally and nothing is sent.
    pub fn press_create(&mut self, context: &mut PanelContext) {
        let Some(backstory_id) = self.chosen_backstory_id().map(str::to_string) else {
            context.alert("Выбери предысторию");
            return;
        };

        if let Err(message) = self.name_check() {
            self.name_hint = message.to_string();
            return;
        }

        let name = if self.has_name_generator() {
            String::new()
        } else {
            self.name.clone()
        };

        context.send(HostCall::CreateCharacter {
            name,
            gender: self.gender,
            backstory_id,
        });
    }

    pub fn select_character(&mut self, context: &mut PanelContext, index: usize) {
        if let Some(character) = self.characters.get(index) {
            context.send(HostCall::SelectCharacter {
                id: character.wire_id(),
            });
        }
    }

    pub fn open_project_link(&mut self, context: &mut PanelContext) {
        let url = context.settings.project_url.clone();
        context.send(HostCall::OpenUrl { url });
    }

    fn handle_keys(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        if context.has_alert() {
            return;
        }

        let (escape, new_character) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::N),
            )
        });

        if escape && self.screen == Screen::Create {
            self.show_list();
        }
        if new_character && self.screen == Screen::List {
            self.show_create(context);
        }
    }

    /// Model icon, or an empty placeholder while it is missing.
    fn draw_icon(
        &mut self,
        context: &mut PanelContext,
        ui: &mut egui::Ui,
        model: Option<&str>,
        size: f32,
    ) {
        let size = egui::vec2(size, size);
        let Some(model) = model.filter(|model| !model.is_empty()) else {
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
            return;
        };

        let url = self.spawnicons.url_for(model);
        match ui.ctx().try_load_texture(
            &url,
            egui::TextureOptions::LINEAR,
            egui::load::SizeHint::default(),
        ) {
            Ok(egui::load::TexturePoll::Ready { texture }) => {
                ui.add(egui::Image::new(texture).fit_to_exact_size(size));
            }
            Ok(egui::load::TexturePoll::Pending { .. }) => {
                ui.add_sized(size, egui::Spinner::new());
            }
            Err(err) => {
                if self.spawnicons.load_failed(model) {
                    log::debug!("Icon {url} failed to load: {err}");
                    context.send(HostCall::EnsureSpawnicon {
                        model: model.to_string(),
                    });
                }
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
            }
        }
    }

    fn draw_list(&mut self, context: &mut PanelContext, ui: &mut egui::Ui) {
        if self.characters.is_empty() {
            helpers::empty_marker(ui, "Персонажей пока нет");
            return;
        }

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("characters")
            .max_height(420.0)
            .show(ui, |ui| {
                for index in 0..self.characters.len() {
                    let model = self.characters[index].model.clone();
                    helpers::row_frame(ui, false, |ui| {
                        ui.horizontal(|ui| {
                            self.draw_icon(context, ui, Some(&model), ICON_SIZE);
                            ui.vertical(|ui| {
                                let character = &self.characters[index];
                                ui.strong(character.display_name());
                                ui.weak(character.meta_line());
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("Выбрать").clicked() {
                                        picked = Some(index);
                                    }
                                },
                            );
                        });
                    });
                }
            });

        if let Some(index) = picked {
            self.select_character(context, index);
        }
    }

    fn draw_create(&mut self, context: &mut PanelContext, ui: &mut egui::Ui) {
        ui.columns(2, |columns| {
            let (left, right) = columns.split_at_mut(1);
            let left = &mut left[0];
            let right = &mut right[0];

            let stale = context.is_stale(RequestKind::Backstories);
            helpers::pane_header(left, "Предыстория", stale.then_some(helpers::NO_ANSWER));

            let mut picked = None;
            if self.backstories.is_empty() {
                helpers::empty_marker(left, "Предыстории не загружены");
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("backstories")
                    .max_height(360.0)
                    .show(left, |ui| {
                        for backstory in &self.backstories {
                            let chosen = self.chosen_backstory_id() == Some(backstory.id.as_str());
                            helpers::row_frame(ui, chosen, |ui| {
                                ui.horizontal(|ui| {
                                    ui.vertical(|ui| {
                                        ui.strong(backstory.display_title());
                                        ui.small(&backstory.description);
                                    });
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            let label = if chosen { "Выбрано" } else { "Выбрать" };
                                            if ui.selectable_label(chosen, label).clicked() {
                                                picked = Some(backstory.id.clone());
                                            }
                                        },
                                    );
                                });
                            });
                        }
                    });
            }
            if let Some(id) = picked {
                self.select_backstory(&id);
            }

            if !self.has_name_generator() {
                right.label("Имя");
                let mut name = self.name.clone();
                if right.text_edit_singleline(&mut name).changed() {
                    self.set_name(name);
                }
                if !self.name_hint.is_empty() {
                    right.colored_label(egui::Color32::LIGHT_RED, &self.name_hint);
                }
            }

            right.add_space(8.0);
            right.horizontal(|ui| {
                ui.label("Пол:");
                for gender in [Gender::Male, Gender::Female] {
                    if ui
                        .selectable_label(self.gender == gender, gender.label())
                        .clicked()
                    {
                        self.set_gender(gender);
                    }
                }
            });

            right.add_space(8.0);
            let model = self.preview_model().map(str::to_string);
            self.draw_icon(context, right, model.as_deref(), PREVIEW_SIZE);
            if model.is_none() {
                right.weak("Выбери предысторию — появится иконка модели");
            }

            right.add_space(12.0);
            let create = right.add_enabled(
                self.can_create(),
                egui::Button::new("Создать").min_size(egui::vec2(200.0, 32.0)),
            );
            if create.clicked() {
                self.press_create(context);
            }
        });
    }
}

impl Default for CharacterSelectPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for CharacterSelectPanel {
    fn handle_message(&mut self, context: &mut PanelContext, message: HostMessage) {
        match message {
            HostMessage::CharacterList(characters) => {
                log::info!("Received {} characters", characters.len());
                self.characters = characters;
            }
            HostMessage::Backstories(backstories) => {
                log::info!("Received {} backstories", backstories.len());
                self.backstories = backstories;
            }
            HostMessage::CharacterError(text) => {
                log::warn!("Character error from host: {text}");
                context.alert(text);
            }
            HostMessage::SpawniconReady(model) => self.spawnicons.icon_ready(&model),
            HostMessage::Ready => {
                context.send(HostCall::RequestBackstories);
            }
            other => log::debug!("Character select ignores {}", other.entry_point()),
        }
    }

    fn render_ui(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        self.handle_keys(context, ctx);

        egui::Window::new("character_select")
            .title_bar(false)
            .default_width(720.0)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(self.title());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(self.primary_label()).clicked() {
                            self.toggle_screen(context);
                        }
                    });
                });
                ui.separator();

                match self.screen {
                    Screen::List => self.draw_list(context, ui),
                    Screen::Create => self.draw_create(context, ui),
                }

                ui.separator();
                if ui.link("spf-base.ru").clicked() {
                    self.open_project_link(context);
                }
            });
    }
}
