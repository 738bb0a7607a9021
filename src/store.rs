use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const FALLBACK_COLOR: Srgb<u8> = Srgb::new(0xff, 0xd7, 0x00);

const DEFAULT_STORE: &str = include_str!("default_store.json");

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShortcutId(String);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryName(String);

crate::impl_string_newtype!(ShortcutId, CategoryName);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct CategoryId(u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: ShortcutId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub layer: CategoryId,
}

impl Shortcut {
    pub fn color(&self) -> Srgb<u8> {
        self.color.trim().parse().unwrap_or_else(|_| {
            log::warn!("Shortcut {} has invalid color '{}'", self.id, self.color);
            FALLBACK_COLOR
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub icon: String,
}

/// Which category to show, relative to the current one or absolute.
#[derive(Debug, Clone, PartialEq, Eq, Default, DeserializeFromStr, SerializeDisplay)]
pub enum CategorySelector {
    Next,
    Prev,
    #[default]
    First,
    Index(usize),
    Name(CategoryName),
}

impl FromStr for CategorySelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_ascii_lowercase().as_str() {
            "next" | "+" => Self::Next,
            "prev" | "previous" | "-" => Self::Prev,
            "first" | "" => Self::First,
            lower => lower
                .parse()
                .map(Self::Index)
                .unwrap_or_else(|_| Self::Name(CategoryName::new(s))),
        })
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
            Self::First => f.write_str("first"),
            Self::Index(i) => write!(f, "{}", i),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed store: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Store {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
}

impl Store {
    pub fn builtin() -> Self {
        Self::from_json(DEFAULT_STORE).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        Self::from_json(&fs_err::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Shortcuts of the category at `index`, in stored order.
    pub fn active_list(&self, index: usize) -> Vec<Shortcut> {
        let Some(category) = self.category(index) else {
            return Vec::new();
        };
        self.shortcuts
            .iter()
            .filter(|s| s.layer == category.id)
            .cloned()
            .collect()
    }

    /// Category index for `selector` as seen from `current`. Relative moves
    /// wrap around the ends.
    pub fn resolve(&self, current: usize, selector: &CategorySelector) -> Option<usize> {
        let len = self.categories.len();
        if len == 0 {
            return None;
        }
        match selector {
            CategorySelector::Next if current + 1 >= len => Some(0),
            CategorySelector::Next => Some(current + 1),
            CategorySelector::Prev if current == 0 || current > len => Some(len - 1),
            CategorySelector::Prev => Some(current - 1),
            CategorySelector::First => Some(0),
            CategorySelector::Index(i) => (*i < len).then_some(*i),
            CategorySelector::Name(name) => self
                .categories
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(name)),
        }
    }
}

pub fn get_store_path() -> Result<PathBuf, StoreError> {
    let proj_dirs =
        ProjectDirs::from("org", "tabdeck", "tabdeck").ok_or(StoreError::DataDirNotFound)?;
    Ok(proj_dirs.data_dir().join("shortcuts.json"))
}

/// Writes the builtin shortcuts unless a store file already exists.
pub fn write_default_store() -> Result<PathBuf, StoreError> {
    let path = get_store_path()?;
    if !path.exists() {
        Store::builtin().save(&path)?;
    }
    Ok(path)
}

pub fn load_or_builtin() -> Store {
    let path = match get_store_path() {
        Ok(path) if path.exists() => path,
        Ok(_) => return Store::builtin(),
        Err(e) => {
            log::error!("{}", e);
            return Store::builtin();
        }
    };

    match Store::load(&path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            Store::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_json(
            r##"{
                "categories": [
                    { "id": 0, "name": "FAVORITES" },
                    { "id": 7, "name": "Work" }
                ],
                "shortcuts": [
                    { "id": "a", "title": "A", "url": "https://a", "color": "#ff0000", "layer": 7 },
                    { "id": "b", "title": "B", "url": "https://b", "layer": 0 },
                    { "id": "c", "title": "C", "url": "https://c", "color": "nope", "layer": 7 }
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_store_parses() {
        let builtin = Store::from_json(DEFAULT_STORE).unwrap();
        assert_eq!(builtin.categories.len(), 6);
        assert_eq!(builtin.active_list(4).len(), 8);
        assert_eq!(builtin, Store::builtin());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("tabdeck-store-{}", std::process::id()));
        let path = dir.join("nested").join("shortcuts.json");

        let saved = store();
        saved.save(&path).unwrap();
        let loaded = Store::load(&path).unwrap();
        fs_err::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.active_list(1).len(), 2);
    }

    #[test]
    fn test_active_list_keeps_order() {
        let store = store();
        let titles: Vec<String> = store.active_list(1).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(store.active_list(9).is_empty());
    }

    #[test]
    fn test_colors_fall_back() {
        let list = store().active_list(1);
        assert_eq!(list[0].color(), Srgb::new(0xff, 0, 0));
        assert_eq!(list[1].color(), FALLBACK_COLOR);
    }

    #[test]
    fn test_resolve_wraps() {
        let store = store();
        assert_eq!(store.resolve(1, &CategorySelector::Next), Some(0));
        assert_eq!(store.resolve(0, &CategorySelector::Prev), Some(1));
        assert_eq!(store.resolve(0, &CategorySelector::Index(5)), None);
        assert_eq!(
            store.resolve(0, &CategorySelector::Name(CategoryName::new("WORK"))),
            Some(1)
        );
        assert_eq!(Store::default().resolve(0, &CategorySelector::Next), None);
    }

    #[test]
    fn test_selector_parsing() {
        let cases = vec![
            ("\"next\"", CategorySelector::Next),
            ("\"-\"", CategorySelector::Prev),
            ("\"2\"", CategorySelector::Index(2)),
            ("\"Work\"", CategorySelector::Name(CategoryName::new("Work"))),
        ];

        for (json, expected) in cases {
            let deserialized: CategorySelector = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(CategorySelector::Index(3).to_string(), "3");
    }
}
