use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attendance outcome a name is classified into.
///
/// The order of the variants is the order categories are listed and
/// concatenated in everywhere else (page checkboxes, candidate pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "aanwezig", alias = "present")]
    Present,
    #[serde(rename = "verontschuldigd", alias = "excused")]
    Excused,
    #[serde(rename = "afwezig", alias = "absent")]
    Absent,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Present, Category::Excused, Category::Absent];

    /// Key used in JSON payloads and URLs.
    pub fn key(self) -> &'static str {
        match self {
            Category::Present => "aanwezig",
            Category::Excused => "verontschuldigd",
            Category::Absent => "afwezig",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Present => "Aanwezig",
            Category::Excused => "Verontschuldigd",
            Category::Absent => "Afwezig",
        }
    }

    /// Accepts the wire key or the English name, case-insensitively.
    pub fn from_strng(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "aanwezig" | "present" => Some(Category::Present),
            "verontschuldigd" | "excused" => Some(Category::Excused),
            "afwezig" | "absent" => Some(Category::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalises a colour to the `#rrggbb` lowercase form used as table key.
pub fn normalize_hex(color: &str) -> Option<String> {
    let trimmed = color.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", digits.to_ascii_lowercase()))
    } else {
        None
    }
}

/// Mapping from text colour to attendance category.
///
/// Colours without an entry, and spans without any colour, always classify
/// as [`Category::Absent`]. That fallback is part of the business rule and
/// cannot be remapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: HashMap<String, Category>,
}

impl ColorTable {
    /// An empty table: every colour falls back to Absent.
    pub fn empty() -> Self {
        ColorTable {
            entries: HashMap::new(),
        }
    }

    /// Builds a table from `(colour, category)` pairs, rejecting colours
    /// that are not six hex digits.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, Category)>,
        S: AsRef<str>,
    {
        let mut table = ColorTable::empty();
        for (color, category) in pairs {
            table.insert(color.as_ref(), category)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, color: &str, category: Category) -> Result<(), ConfigError> {
        let key = normalize_hex(color).ok_or_else(|| ConfigError::InvalidColor(color.to_string()))?;
        self.entries.insert(key, category);
        Ok(())
    }

    /// Category for an effective span colour; `None` means no colour class
    /// matched.
    pub fn classify(&self, color: Option<&str>) -> Category {
        color
            .and_then(normalize_hex)
            .and_then(|key| self.entries.get(&key).copied())
            .unwrap_or(Category::Absent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert("#6aa84f".to_string(), Category::Present);
        entries.insert("#38761d".to_string(), Category::Present);
        entries.insert("#e69138".to_string(), Category::Excused);
        ColorTable { entries }
    }
}
