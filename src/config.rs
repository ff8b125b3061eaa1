use crate::category::{Category, ColorTable};
use crate::error::ConfigError;
use crate::extractor::Extractor;
use crate::roster::KnownNames;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Deployment configuration read from a JSON file.
///
/// ```json
/// {
///   "roster": ["Bram Verbelen", "Lisa Corten"],
///   "colors": { "#6aa84f": "aanwezig", "#e69138": "verontschuldigd" }
/// }
/// ```
///
/// Both keys are optional; a missing key keeps the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub roster: Option<Vec<String>>,
    #[serde(default)]
    pub colors: Option<BTreeMap<String, String>>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn known_names(&self) -> Result<KnownNames, ConfigError> {
        match &self.roster {
            None => Ok(KnownNames::default()),
            Some(names) => {
                let roster = KnownNames::from_names(names);
                if roster.is_empty() {
                    return Err(ConfigError::EmptyRoster);
                }
                Ok(roster)
            }
        }
    }

    pub fn color_table(&self) -> Result<ColorTable, ConfigError> {
        let Some(colors) = &self.colors else {
            return Ok(ColorTable::default());
        };
        let mut table = ColorTable::empty();
        for (color, category) in colors {
            let category = Category::from_strng(category)
                .ok_or_else(|| ConfigError::UnknownCategory(category.clone()))?;
            table.insert(color, category)?;
        }
        Ok(table)
    }

    pub fn extractor(&self) -> Result<Extractor, ConfigError> {
        Ok(Extractor::new(self.known_names()?, self.color_table()?))
    }
}
