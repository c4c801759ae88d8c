//! Top-5 list data model.
//!
//! A [`Top5List`] is a named list of exactly five ranked items owned by one user.
//! While a list is open for editing, the store keeps a [`Draft`] of its six editable
//! fields (name plus items); edits land in the draft and reach the persisted list
//! only through an explicit commit.

mod id;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use id::ListId;

use crate::{
    constants::{DRAFT_FIELDS, LIST_LENGTH, PLACEHOLDER_ITEM, UNTITLED_PREFIX},
    user::UserIdentity,
};

/// A persisted top-5 list.
///
/// The persistence layer's summaries carry the full record, so this type doubles
/// as the list summary used for mode filtering, sorting and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Top5List {
    pub id: ListId,
    pub name: String,
    /// Ranked items, best first.
    pub items: [String; LIST_LENGTH],
    pub owner_email: String,
    pub owner_user_name: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    /// View counter. Older records store it as a numeric string.
    #[serde(default, deserialize_with = "deserialize_views")]
    pub views: u64,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    /// Comments, each prefixed with the author's username.
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub comments: Vec<String>,
}

/// List summaries are full list records.
pub type ListSummary = Top5List;

impl Top5List {
    /// Whether the given user owns this list. Ownership is keyed by email.
    pub fn is_owned_by(&self, identity: &UserIdentity) -> bool {
        self.owner_email == identity.email
    }

    /// Snapshot the editable fields of this list.
    pub fn draft(&self) -> Draft {
        Draft {
            id: self.id,
            name: self.name.clone(),
            items: self.items.clone(),
        }
    }
}

/// Payload for creating a list. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub name: String,
    pub items: [String; LIST_LENGTH],
    pub owner_email: String,
    pub owner_user_name: String,
    pub created_date: DateTime<Utc>,
}

impl NewList {
    /// A blank `Untitled<counter>` list with placeholder items.
    pub fn untitled(counter: u32, owner: &UserIdentity, now: DateTime<Utc>) -> Self {
        Self {
            name: format!("{UNTITLED_PREFIX}{counter}"),
            items: std::array::from_fn(|_| PLACEHOLDER_ITEM.to_string()),
            owner_email: owner.email.clone(),
            owner_user_name: owner.user_name.clone(),
            created_date: now,
        }
    }

    /// Materialize the unpublished list record under the given id.
    pub fn into_list(self, id: ListId) -> Top5List {
        Top5List {
            id,
            name: self.name,
            items: self.items,
            owner_email: self.owner_email,
            owner_user_name: self.owner_user_name,
            likes: Vec::new(),
            dislikes: Vec::new(),
            views: 0,
            published: false,
            published_date: None,
            created_date: self.created_date,
            comments: Vec::new(),
        }
    }
}

/// Editable snapshot of the current list: `[name, item1..item5, id]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: ListId,
    pub name: String,
    pub items: [String; LIST_LENGTH],
}

/// Which parts of a list a draft changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftChanges {
    /// Indices of items that differ from the persisted list.
    pub items: Vec<usize>,
    pub renamed: bool,
}

impl DraftChanges {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.renamed
    }
}

impl Draft {
    /// The six editable fields, name first.
    pub fn fields(&self) -> [&str; DRAFT_FIELDS] {
        let [a, b, c, d, e] = &self.items;
        [
            self.name.as_str(),
            a.as_str(),
            b.as_str(),
            c.as_str(),
            d.as_str(),
            e.as_str(),
        ]
    }

    /// Replace the item at `index`. Returns `false` when `index` is out of range.
    pub fn set_item(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Compare against the persisted list.
    pub fn changes(&self, list: &Top5List) -> DraftChanges {
        DraftChanges {
            items: (0..LIST_LENGTH)
                .filter(|&i| self.items[i] != list.items[i])
                .collect(),
            renamed: self.name != list.name,
        }
    }

    /// Write only the changed fields into `list`.
    pub fn apply_to(&self, list: &mut Top5List) -> DraftChanges {
        let changes = self.changes(list);
        for &i in &changes.items {
            list.items[i] = self.items[i].clone();
        }
        if changes.renamed {
            list.name = self.name.clone();
        }
        changes
    }
}

/// Accepts the view counter as a JSON number or a numeric string.
fn deserialize_views<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Views {
        Number(u64),
        Text(String),
    }

    match Views::deserialize(deserializer)? {
        Views::Number(n) => Ok(n),
        Views::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("views must be a non-negative integer, got {s:?}"))
        }),
    }
}

fn deserialize_nullable_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
