use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Character gender as used by the host (`0` male, anything else female).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: i64) -> Self {
        if code == 0 { Gender::Male } else { Gender::Female }
    }

    pub fn code(self) -> i64 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Мужской",
            Gender::Female => "Женский",
        }
    }
}

/// Display name of a race code.
pub fn race_label(code: i64) -> &'static str {
    match code {
        0 => "Человек",
        1 => "Полу-человек",
        2 => "Кукла",
        _ => "?",
    }
}

/// One entry of the character list pushed by the host.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CharacterSummary {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub name: String,

    /// Raw gender code, see [`Gender::from_code`].
    #[serde(deserialize_with = "lenient::integer")]
    pub gender: i64,

    /// Raw race code, see [`race_label`].
    #[serde(deserialize_with = "lenient::integer")]
    pub race: i64,

    /// Model path used for the card icon.
    #[serde(deserialize_with = "lenient::string")]
    pub model: String,
}

impl CharacterSummary {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Без имени"
        } else {
            &self.name
        }
    }

    /// Id sent with `selectCharacter`; a missing id is sent as "0".
    pub fn wire_id(&self) -> String {
        if self.id.is_empty() {
            "0".to_string()
        } else {
            self.id.clone()
        }
    }

    /// "Пол: … · Раса: …" line shown under the name.
    pub fn meta_line(&self) -> String {
        format!(
            "Пол: {} · Раса: {}",
            Gender::from_code(self.gender).label(),
            race_label(self.race)
        )
    }
}

/// A backstory the player may pick when creating a character.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Backstory {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    /// When set, the host names the character itself and the name field is hidden.
    #[serde(deserialize_with = "lenient::truthy")]
    pub has_name_generator: bool,

    /// Preview model per gender code.
    #[serde(deserialize_with = "lenient::index_map")]
    pub gender_models: Option<BTreeMap<i64, String>>,
}

impl Backstory {
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "?"
        }
    }

    /// Model previewed for `gender`, falling back to the gender-0 model.
    pub fn model_for(&self, gender: Gender) -> Option<&str> {
        let models = self.gender_models.as_ref()?;
        models
            .get(&gender.code())
            .or_else(|| models.get(&0))
            .map(String::as_str)
            .filter(|model| !model.is_empty())
    }
}
