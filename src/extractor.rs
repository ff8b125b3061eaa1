use crate::category::{Category, ColorTable};
use crate::error::ExtractError;
use crate::roster::KnownNames;
use dom_query::Document;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    // `.c12{...;color:#rrggbb...}` as written by the document export. The
    // optional group stops `background-color` from matching.
    static ref COLOR_RULE_REGEX: Regex =
        Regex::new(r"\.(c\d+)\s*\{(?:[^}]*?[;\s])?color\s*:\s*#([0-9a-fA-F]{6})").unwrap();
}

/// Style class name to lowercase `#rrggbb` text colour, for one document.
pub type ColorClassMap = HashMap<String, String>;

/// Names found in one uploaded document, grouped by category.
///
/// Each list keeps document order and may contain the same name more than
/// once when it was written in several spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(rename = "aanwezig")]
    pub present: Vec<String>,
    #[serde(rename = "verontschuldigd")]
    pub excused: Vec<String>,
    #[serde(rename = "afwezig")]
    pub absent: Vec<String>,
}

impl Attendance {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Present => &self.present,
            Category::Excused => &self.excused,
            Category::Absent => &self.absent,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Present => &mut self.present,
            Category::Excused => &mut self.excused,
            Category::Absent => &mut self.absent,
        }
    }

    pub fn push(&mut self, category: Category, name: String) {
        self.get_mut(category).push(name);
    }

    /// Number of recorded names over all categories, duplicates included.
    pub fn total(&self) -> usize {
        self.present.len() + self.excused.len() + self.absent.len()
    }
}

/// Scans style sheet text for `.c<digits>` rules that set a text colour.
///
/// Only the first rule seen for a class is kept. Anything that is not a
/// class rule with a six digit `color` value is ignored.
pub fn parse_color_classes(style_text: &str) -> ColorClassMap {
    let mut map = ColorClassMap::new();
    for caps in COLOR_RULE_REGEX.captures_iter(style_text) {
        let class = caps[1].to_string();
        let color = format!("#{}", caps[2].to_ascii_lowercase());
        map.entry(class).or_insert(color);
    }
    map
}

/// Resolves the colour of a span from its `class` attribute: the first token
/// with a known colour wins.
fn effective_color<'a>(class_attr: &str, classes: &'a ColorClassMap) -> Option<&'a str> {
    class_attr
        .split_whitespace()
        .find_map(|token| classes.get(token).map(String::as_str))
}

/// Attendance extractor for exported documents with colour-coded names.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    roster: KnownNames,
    colors: ColorTable,
}

impl Extractor {
    pub fn new(roster: KnownNames, colors: ColorTable) -> Self {
        Extractor { roster, colors }
    }

    pub fn roster(&self) -> &KnownNames {
        &self.roster
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Extracts the attendance lists from raw document bytes.
    ///
    /// Fails only when the bytes are not UTF-8. The markup parser itself is
    /// error tolerant, so any decodable text yields a (possibly empty) result.
    pub fn extract(&self, html: &[u8]) -> Result<Attendance, ExtractError> {
        let text = std::str::from_utf8(html).map_err(|e| ExtractError::Parse(e.to_string()))?;
        Ok(self.extract_str(text))
    }

    pub fn extract_str(&self, html: &str) -> Attendance {
        let document = Document::from(html);

        let style_text = document.select("style").text();
        let classes = parse_color_classes(&style_text);

        let mut attendance = Attendance::default();
        for span in document.select("span").iter() {
            let text = span.text();
            let name = text.trim();
            if name.is_empty() || !self.roster.contains(name) {
                continue;
            }

            let class_attr = span.attr("class");
            let color = class_attr
                .as_deref()
                .and_then(|attr| effective_color(attr, &classes));
            let category = self.colors.classify(color);
            attendance.push(category, name.to_string());
        }

        tracing::debug!(
            color_classes = classes.len(),
            present = attendance.present.len(),
            excused = attendance.excused.len(),
            absent = attendance.absent.len(),
            "extracted attendance"
        );
        attendance
    }
}

/// Extracts with the embedded roster and the default colour table.
pub fn extract(html: &[u8]) -> Result<Attendance, ExtractError> {
    Extractor::default().extract(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rule_for_a_class_wins() {
        let css = ".c3{color:#6AA84F}.c3{color:#000000}.c4 { font-weight:700; color: #e69138 }";
        let map = parse_color_classes(css);
        assert_eq!(map.get("c3").map(String::as_str), Some("#6aa84f"));
        assert_eq!(map.get("c4").map(String::as_str), Some("#e69138"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn background_colour_is_not_text_colour() {
        let css = ".c1{background-color:#ffff00}.c2{background-color:#ffffff;color:#38761d}";
        let map = parse_color_classes(css);
        assert!(!map.contains_key("c1"));
        assert_eq!(map.get("c2").map(String::as_str), Some("#38761d"));
    }

    #[test]
    fn non_class_rules_are_ignored() {
        let css = "p{color:#6aa84f}.title{color:#6aa84f}.c7{color:#fff}.lst-kix_1{color:#e69138}";
        assert!(parse_color_classes(css).is_empty());
    }

    #[test]
    fn effective_colour_uses_first_known_token() {
        let mut map = ColorClassMap::new();
        map.insert("c2".to_string(), "#e69138".to_string());
        map.insert("c5".to_string(), "#6aa84f".to_string());
        assert_eq!(effective_color("c9  c5 c2", &map), Some("#6aa84f"));
        assert_eq!(effective_color("c9 c10", &map), None);
        assert_eq!(effective_color("", &map), None);
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = extract(&[0x3c, 0x70, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
