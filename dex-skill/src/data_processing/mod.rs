use crate::error::RankError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// National dex number of a comparable item.
pub type ItemId = u32;

/// One comparable entry of the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    /// Free-form presentation data (form, generation, sprite key...) that the core never reads.
    #[serde(default)]
    pub display_meta: Option<String>,
}

impl CatalogItem {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            display_meta: None,
        }
    }
}

/// The closed, finite set of items a session ranks. Stable for the whole session.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    ids: Vec<ItemId>,
}

impl Catalog {
    /// Builds a catalog ordered by id. Later duplicates of an id are dropped.
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut seen = HashSet::new();
        let mut items: Vec<CatalogItem> = items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        items.sort_unstable_by_key(|item| item.id);
        let ids = items.iter().map(|item| item.id).collect();
        Self { items, ids }
    }

    /// A catalog of `n` placeholder items with ids `1..=n`, useful for testing.
    pub fn numbered(n: u32) -> Self {
        Self::new((1..=n).map(|id| CatalogItem::new(id, format!("Item #{}", id))))
    }

    /// Reads a catalog from a CSV file with headers `id,name,display_meta`.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, RankError> {
        let items: Vec<CatalogItem> = read_csv(path)?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        let idx = self.ids.binary_search(&id).ok()?;
        self.items.get(idx)
    }
}

pub fn read_csv<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, RankError> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(RankError::from)
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, RankError> {
    let json_str = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json_str)?)
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<(), RankError> {
    let cached_json = serde_json::to_string_pretty(&value)?;
    std::fs::write(path.as_ref(), cached_json)?;
    Ok(())
}

fn write_to_csv<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<(), RankError> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    values.iter().try_for_each(|val| writer.serialize(val))?;
    writer.flush()?;
    Ok(())
}

/// Writes to JSON or CSV depending on the extension. Failures are logged and reported,
/// never fatal to the caller's session.
pub fn try_write_slice_to_file<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let write_res = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => write_json(values, path),
        Some("csv") => write_to_csv(values, path),
        _ => Err(RankError::Persistence(
            "Invalid or missing filename extension".into(),
        )),
    };
    match write_res {
        Ok(()) => {
            tracing::info!("Successfully wrote to {:?}", path);
            true
        }
        Err(e) => {
            tracing::error!("WARNING: failed write to {:?} because {}", path, e);
            false
        }
    }
}
