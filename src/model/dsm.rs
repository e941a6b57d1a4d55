//! DSM data types - components, sorting keys and links
//!
//! These types are the persisted document. Field names follow the JSON
//! layout written to disk, and every field defaults so that older or
//! partial documents still load.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Maximum number of characters in a sorting key
pub const MAX_SORTING_KEY_LEN: usize = 2;

/// One row/column element of the matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
}

/// Short user-assigned key used to reorder components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingKey {
    /// Id of the component this key belongs to
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
}

/// Directed links: component id -> ids it links to
pub type Links = BTreeMap<String, Vec<String>>;

/// The whole persisted document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsmState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<Component>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sorting_keys: Vec<SortingKey>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Links,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_bidirectional_link: bool,
}

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DsmState {
    /// Find a component by id
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Position of a component in display order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    /// Sorting key for a component, empty if none is set
    pub fn sorting_key(&self, id: &str) -> &str {
        self.sorting_keys
            .iter()
            .find(|k| k.id == id)
            .map(|k| k.key.as_str())
            .unwrap_or("")
    }

    /// Whether the sorting-key ids and the component ids are the same set
    pub fn check_parity(&self) -> bool {
        let component_ids: HashSet<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        let key_ids: HashSet<&str> = self.sorting_keys.iter().map(|k| k.id.as_str()).collect();
        component_ids == key_ids && key_ids.len() == self.sorting_keys.len()
    }

    /// Linked predicate for the cell at (`row`, `col`) in display order
    pub fn is_cell_linked(&self, row: usize, col: usize) -> bool {
        match (self.components.get(row), self.components.get(col)) {
            (Some(r), Some(c)) => is_linked(&r.id, &c.id, &self.links, self.is_bidirectional_link),
            _ => false,
        }
    }
}

/// Whether `row_id` links to `col_id`
///
/// With `bidirectional` set, a link stored in either direction counts.
/// The stored direction is never changed by this.
pub fn is_linked(row_id: &str, col_id: &str, links: &Links, bidirectional: bool) -> bool {
    let contains = |from: &str, to: &str| {
        links
            .get(from)
            .is_some_and(|targets| targets.iter().any(|t| t == to))
    };

    contains(row_id, col_id) || (bidirectional && contains(col_id, row_id))
}

/// Header label for a matrix row/column: `A`..`Z`, then the numeric index
pub fn column_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        index.to_string()
    }
}

/// Case-normalize a sorting key
pub fn normalize_sorting_key(key: &str) -> String {
    key.to_uppercase()
}
