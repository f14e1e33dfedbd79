//! Sample host calls for previewing panels outside the game.

use hud_core::messages::PanelKind;
use serde_json::{json, Value};

/// Entry point calls that bring `panel` into a representative state.
pub fn sample_calls(panel: PanelKind) -> Vec<(&'static str, Vec<Value>)> {
    match panel {
        PanelKind::CharacterSelect => vec![
            (
                "onCharacterList",
                vec![json!([
                    {"id": 1, "name": "Иван Петров", "gender": 0, "race": 0,
                     "model": "models/player/group01/male_02.mdl"},
                    {"id": 2, "name": "", "gender": 1, "race": 2,
                     "model": "models/player/group01/female_01.mdl"}
                ])],
            ),
            (
                "onBackstories",
                vec![json!({
                    "1": {"id": "soldier", "title": "Солдат", "description": "Бывший военный.",
                          "gender_models": {"0": "models/player/group03/male_04.mdl",
                                            "1": "models/player/group03/female_02.mdl"}},
                    "2": {"id": "doll", "title": "Кукла", "description": "Имя выдаётся автоматически.",
                          "has_name_generator": true}
                })],
            ),
        ],
        PanelKind::Crafting => vec![
            ("onCraftInit", vec![json!({"entIndex": 128, "station": "Верстак"})]),
            (
                "onCraftList",
                vec![json!([
                    {"id": "bandage", "displayName": "Бинт", "inputs": [["cloth", 2]],
                     "outputs": [["bandage", 1]], "time": 2.5, "maxCrafts": 12},
                    {"id": "knife", "inputs": [["scrap_metal", 3], ["wood", 1]],
                     "outputs": [["knife", 1]], "time": 10, "maxCrafts": 0},
                    {"id": "ammo_9mm", "displayName": "Патроны 9мм", "inputsStr": "Порох x1, Гильзы x30",
                     "outputsStr": "Патроны 9мм x30", "time": 15, "maxCrafts": 200}
                ])],
            ),
        ],
        PanelKind::Inventory => vec![
            (
                "onInvState",
                vec![json!({
                    "mode": "self",
                    "hasAdmin": true,
                    "invLoad": 12.5,
                    "invMaxLoad": 40,
                    "inv": {"items": [
                        {"uid": 101, "id": "helmet", "name": "Шлем", "w": 1.5, "equipped": "head"},
                        {"uid": 102, "id": "vest", "name": "Бронежилет", "w": 6},
                        {"uid": 103, "id": "bandage", "name": "Бинт", "w": 0.1, "count": 5},
                        {"uid": 104, "id": "knife", "name": "Нож", "w": 0.4}
                    ]},
                    "progress": {}
                })],
            ),
            (
                "onInvAdmin",
                vec![json!({"kind": "players", "players": [
                    {"ent": 1, "name": "Иван Петров", "alive": true, "steamid": "STEAM_0:1:1001"},
                    {"ent": 2, "name": "Мария", "alive": false, "steamid": "STEAM_0:0:2002"}
                ]})],
            ),
            (
                "onInvAdmin",
                vec![json!({"kind": "items_catalog", "items": [
                    {"id": "bandage", "name": "Бинт", "weight": 0.1},
                    {"id": "knife", "name": "Нож", "weight": 0.4},
                    {"id": "scrap_metal"}
                ]})],
            ),
        ],
        PanelKind::Loading => vec![
            (
                "GameDetails",
                vec![
                    json!("SPF Base"),
                    json!(""),
                    json!("rp_downtown"),
                    json!(64),
                    json!("76561198000000000"),
                    json!("militaryrp"),
                ],
            ),
            ("SetFilesTotal", vec![json!(40)]),
            ("SetFilesNeeded", vec![json!(12)]),
            ("DownloadingFile", vec![json!("\"materials/spf/hud_bg.vtf\"")]),
            ("SetStatusChanged", vec![json!("Retrieving server info...")]),
        ],
    }
}
