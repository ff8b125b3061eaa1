use crate::category::Category;
use crate::extractor::Attendance;
use serde::Serialize;
use std::collections::BTreeSet;

/// User action applied to the picking session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A document was uploaded and extracted.
    Uploaded(Attendance),
    /// A category checkbox was flipped.
    Toggle(Category),
    /// A spin came to rest on `name` with the wheel at `offset`.
    Settled { name: String, offset: f64 },
}

/// State of one picking workflow.
///
/// The value is never mutated in place; [`Session::apply`] returns the next
/// state and the owner swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    groups: Option<Attendance>,
    enabled: BTreeSet<Category>,
    chosen: Option<String>,
    offset: f64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, action: Action) -> Session {
        match action {
            Action::Uploaded(attendance) => Session {
                groups: Some(attendance),
                enabled: Category::ALL.into_iter().collect(),
                chosen: None,
                offset: self.offset,
            },
            Action::Toggle(category) => {
                let mut enabled = self.enabled.clone();
                if !enabled.remove(&category) {
                    enabled.insert(category);
                }
                Session {
                    enabled,
                    ..self.clone()
                }
            }
            Action::Settled { name, offset } => {
                let groups = self.groups.as_ref().map(|groups| {
                    let mut groups = groups.clone();
                    for category in Category::ALL {
                        groups.get_mut(category).retain(|n| *n != name);
                    }
                    groups
                });
                Session {
                    groups,
                    enabled: self.enabled.clone(),
                    chosen: Some(name),
                    offset,
                }
            }
        }
    }

    pub fn groups(&self) -> Option<&Attendance> {
        self.groups.as_ref()
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }

    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled.iter().copied()
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    /// Rotation the wheel was left at by the last spin.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Names eligible for the next spin: enabled categories in category
    /// order, each in its original order.
    pub fn candidate_pool(&self) -> Vec<String> {
        let Some(groups) = &self.groups else {
            return Vec::new();
        };
        Category::ALL
            .into_iter()
            .filter(|c| self.enabled.contains(c))
            .flat_map(|c| groups.get(c).iter().cloned())
            .collect()
    }

    /// Remaining names per category, for the checkbox labels.
    pub fn counts(&self) -> [(Category, usize); 3] {
        Category::ALL.map(|c| (c, self.groups.as_ref().map_or(0, |g| g.get(c).len())))
    }
}
