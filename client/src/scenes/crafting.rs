use hud_core::bridge::HostCall;
use hud_core::constants::{CRAFT_ACTION_CAP, CRAFT_SLIDER_CAP};
use hud_core::messages::HostMessage;
use hud_core::string_operations::casefold;
use hud_core::types::Recipe;

use crate::scenes::helpers;
use crate::scenes::scene::{Panel, PanelContext};

const DEFAULT_STATION: &str = "Станция";

/// Upper bound of the quantity slider for a recipe with `remaining` crafts left.
///
/// Nothing left pins the slider at 1.
pub fn slider_max(remaining: i64) -> i64 {
    remaining.clamp(1, CRAFT_SLIDER_CAP)
}

pub struct CraftingPanel {
    ent_index: i64,
    station: String,
    recipes: Vec<Recipe>,
    query: String,
    selected: Option<String>,
    quantity: i64,
    focus_search: bool,
}

impl CraftingPanel {
    pub fn new() -> Self {
        Self {
            ent_index: 0,
            station: DEFAULT_STATION.to_string(),
            recipes: Vec::new(),
            query: String::new(),
            selected: None,
            quantity: 1,
            focus_search: false,
        }
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        let id = self.selected.as_deref()?;
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Recipes matching the search text, in host order.
    pub fn filtered(&self) -> Vec<&Recipe> {
        let query = casefold(&self.query);
        self.recipes
            .iter()
            .filter(|recipe| recipe.matches(&query))
            .collect()
    }

    fn remaining(&self) -> i64 {
        self.selected_recipe().map_or(0, Recipe::remaining)
    }

    pub fn slider_max(&self) -> i64 {
        slider_max(self.remaining())
    }

    pub fn can_craft(&self) -> bool {
        self.selected.is_some() && self.remaining() > 0
    }

    /// "Доступно: N" under the slider.
    pub fn hint(&self) -> String {
        format!("Доступно: {}", self.remaining())
    }

    /// Selects a recipe and clamps the current quantity to its slider range.
    pub fn select_recipe(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.quantity = if self.remaining() <= 0 {
            1
        } else {
            self.quantity.clamp(1, self.slider_max())
        };
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.clamp(1, self.slider_max());
    }

    /// Moves the selection one step within the filtered list; no selection picks the first.
    pub fn move_selection(&mut self, step: isize) {
        let next = {
            let filtered = self.filtered();
            if filtered.is_empty() {
                return;
            }

            let current = self
                .selected
                .as_deref()
                .and_then(|id| filtered.iter().position(|recipe| recipe.id == id));
            let index = match current {
                None => 0,
                Some(index) => index
                    .saturating_add_signed(step)
                    .min(filtered.len() - 1),
            };
            filtered[index].id.clone()
        };
        self.select_recipe(&next);
    }

    pub fn craft(&mut self, context: &mut PanelContext) {
        if !self.can_craft() {
            return;
        }
        let Some(recipe_id) = self.selected.clone() else {
            return;
        };

        context.send(HostCall::StartCraft {
            ent_index: self.ent_index,
            recipe_id,
            count: self.quantity.clamp(1, CRAFT_ACTION_CAP),
        });
    }

    fn replace_recipes(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
        let first = self
            .recipes
            .iter()
            .find(|recipe| recipe.is_available())
            .or_else(|| self.recipes.first())
            .map(|recipe| recipe.id.clone());

        match first {
            Some(id) => self.select_recipe(&id),
            None => self.selected = None,
        }
    }

    fn handle_keys(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        if context.has_alert() || self.filtered().is_empty() {
            return;
        }

        let (enter, down, up) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowUp),
            )
        });

        if enter {
            self.craft(context);
        } else if down {
            self.move_selection(1);
        } else if up {
            self.move_selection(-1);
        }
    }

    fn draw_recipes(&mut self, ui: &mut egui::Ui) {
        let filtered = self.filtered();
        if filtered.is_empty() {
            helpers::empty_marker(ui, "Нет рецептов");
            return;
        }

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("recipes")
            .max_height(420.0)
            .show(ui, |ui| {
                for recipe in filtered {
                    let selected = self.selected.as_deref() == Some(recipe.id.as_str());
                    helpers::row_frame(ui, selected, |ui| {
                        if helpers::row_title(ui, &recipe.display_name(), !recipe.is_available())
                            .clicked()
                        {
                            picked = Some(recipe.id.clone());
                        }
                        ui.weak(recipe.meta_line());
                        ui.label(format!("Требуется: {}", recipe.inputs_text()));
                        ui.label(format!("Результат: {}", recipe.outputs_text()));
                    });
                }
            });

        if let Some(id) = picked {
            self.select_recipe(&id);
        }
    }
}

impl Default for CraftingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for CraftingPanel {
    fn handle_message(&mut self, context: &mut PanelContext, message: HostMessage) {
        match message {
            HostMessage::CraftInit(init) => {
                self.ent_index = init.ent_index;
                self.station = init
                    .station
                    .unwrap_or_else(|| DEFAULT_STATION.to_string());
                log::info!("Crafting at {} (ent {})", self.station, self.ent_index);
            }
            HostMessage::CraftList(recipes) => {
                log::info!("Received {} recipes", recipes.len());
                self.replace_recipes(recipes);
            }
            HostMessage::CraftError(text) => {
                log::error!("[CraftError] {text}");
                context.alert(text);
            }
            HostMessage::Ready => self.focus_search = true,
            other => log::debug!("Crafting ignores {}", other.entry_point()),
        }
    }

    fn render_ui(&mut self, context: &mut PanelContext, ctx: &egui::Context) {
        self.handle_keys(context, ctx);

        egui::Window::new("crafting")
            .title_bar(false)
            .default_width(640.0)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.heading(&self.station);

                let search = helpers::search_field(ui, &mut self.query);
                if std::mem::take(&mut self.focus_search) {
                    search.request_focus();
                }
                ui.separator();

                self.draw_recipes(ui);

                ui.separator();
                ui.horizontal(|ui| {
                    let max = self.slider_max();
                    let mut quantity = self.quantity;
                    let slider = ui.add_enabled(
                        self.can_craft(),
                        egui::Slider::new(&mut quantity, 1..=max).text("шт."),
                    );
                    if slider.changed() {
                        self.set_quantity(quantity);
                    }
                    ui.weak(self.hint());
                });

                let craft = ui.add_enabled(
                    self.can_craft(),
                    egui::Button::new("Создать").min_size(egui::vec2(200.0, 32.0)),
                );
                if craft.clicked() {
                    self.craft(context);
                }
            });
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
        let context = PanelContext::new(Box::new(Recorder(calls.clone())), HudSettings::default());
        (context, calls)
    }

    fn panel_with(recipes: serde_json::Value) -> (CraftingPanel, PanelContext, Rc<RefCell<Vec<WireCall>>>) {
        let (mut context, calls) = context();
        let mut panel = CraftingPanel::new();
        panel.handle_message(
            &mut context,
            HostMessage::CraftInit(serde_json::from_value(json!({"entIndex": 42})).unwrap()),
        );
        panel.handle_message(
            &mut context,
            HostMessage::CraftList(serde_json::from_value(recipes).unwrap()),
        );
        (panel, context, calls)
    }

    /// The slider range is [1, min(remaining, 64)], pinned to 1 when nothing is left.
    #[test]
    fn slider_max_clamps_remaining() {
        assert_eq!(slider_max(0), 1);
        assert_eq!(slider_max(-4), 1);
        assert_eq!(slider_max(5), 5);
        assert_eq!(slider_max(500), 64);
    }

    /// A new list selects the first craftable recipe.
    #[test]
    fn list_selects_first_available_recipe() {
        let (panel, _, _) = panel_with(json!([
            {"id": "a", "maxCrafts": 0},
            {"id": "b", "maxCrafts": 3},
        ]));
        assert_eq!(panel.selected_id(), Some("b"));
        assert_eq!(panel.slider_max(), 3);
        assert_eq!(panel.hint(), "Доступно: 3");
        assert_eq!(panel.station(), "Станция");
    }

    /// Unavailable recipes stay selectable but cannot be crafted.
    #[test]
    fn unavailable_recipe_disables_craft() {
        let (mut panel, mut context, calls) = panel_with(json!([
            {"id": "a", "maxCrafts": 0},
            {"id": "b", "maxCrafts": 100},
        ]));
        panel.set_quantity(80);
        assert_eq!(panel.quantity(), 64);

        panel.select_recipe("a");
        assert_eq!(panel.quantity(), 1);
        assert_eq!(panel.slider_max(), 1);
        assert!(!panel.can_craft());

        panel.craft(&mut context);
        assert!(calls.borrow().is_empty());
    }

    /// Crafting sends the station entity, the recipe and the chosen count.
    #[test]
    fn craft_sends_start_craft() {
        let (mut panel, mut context, calls) = panel_with(json!([{"id": "bandage", "maxCrafts": 10}]));
        panel.set_quantity(4);
        panel.craft(&mut context);

        let calls = calls.borrow();
        assert_eq!(calls[0].function, "startCraft");
        assert_eq!(calls[0].args, vec!["42", "bandage", "4"]);
    }

    /// Arrow keys walk the filtered list and stop at its ends.
    #[test]
    fn selection_moves_within_filtered_recipes() {
        let (mut panel, _, _) = panel_with(json!([
            {"id": "a", "displayName": "Бинт", "maxCrafts": 1},
            {"id": "b", "displayName": "Нож", "maxCrafts": 1},
            {"id": "c", "displayName": "Большой бинт", "maxCrafts": 1},
        ]));

        panel.set_query("БИНТ");
        assert_eq!(panel.filtered().len(), 2);

        panel.move_selection(1);
        assert_eq!(panel.selected_id(), Some("c"));
        panel.move_selection(1);
        assert_eq!(panel.selected_id(), Some("c"));
        panel.move_selection(-1);
        assert_eq!(panel.selected_id(), Some("a"));
        panel.move_selection(-1);
        assert_eq!(panel.selected_id(), Some("a"));
    }

    /// Search matches the requirement lines as well as the name.
    #[test]
    fn search_matches_inputs() {
        let (mut panel, _, _) = panel_with(json!([
            {"id": "a", "inputs": [["cloth", 2]], "outputs": [["bandage", 1]]},
            {"id": "b", "inputs": [["metal", 1]], "outputs": [["knife", 1]]},
        ]));
        panel.set_query("cloth");
        let ids: Vec<_> = panel.filtered().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    /// Errors are surfaced as alerts.
    #[test]
    fn craft_error_raises_alert() {
        let (mut panel, mut context, _) = panel_with(json!([]));
        assert_eq!(panel.selected_id(), None);
        panel.handle_message(&mut context, HostMessage::CraftError("Нет места".into()));
        assert_eq!(context.alert_text(), Some("Нет места"));
    }
}
