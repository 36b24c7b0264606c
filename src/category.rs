use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

impl Category {
    /// Builds a pending category with a fresh id. Nothing is stored until the
    /// category store saves it.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            title: title.into(),
        }
    }
}

/// Categories known to a single import run, keyed by exact title.
#[derive(Debug, Default, Clone)]
pub struct CategoryCatalog {
    by_title: HashMap<String, Category>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category unless one with the same title is already present.
    pub fn insert(&mut self, category: Category) {
        self.by_title
            .entry(category.title.clone())
            .or_insert(category);
    }

    pub fn resolve(&self, title: &str) -> Option<&Category> {
        self.by_title.get(title)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

impl FromIterator<Category> for CategoryCatalog {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut catalog = CategoryCatalog::new();
        for category in iter {
            catalog.insert(category);
        }
        catalog
    }
}
