//! In-memory snapshot of the chart of accounts.
//!
//! Accounts are owned by a flat map keyed by id. Parent links are plain ids and
//! "children of X" is answered from a derived index, so there is no cyclic
//! ownership between parents and children.

use std::collections::{BTreeMap, HashMap, HashSet};

use model::entities::account;
use model::Code;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use tracing::{debug, instrument};

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    accounts: BTreeMap<i32, account::Model>,
    children: HashMap<i32, Vec<i32>>,
    by_code: HashMap<String, i32>,
}

impl AccountTree {
    pub fn from_models(models: impl IntoIterator<Item = account::Model>) -> Self {
        let mut tree = Self::default();
        for model in models {
            if let Some(parent_id) = model.parent_id {
                tree.children.entry(parent_id).or_default().push(model.id);
            }
            tree.by_code.entry(model.code.clone()).or_insert(model.id);
            tree.accounts.insert(model.id, model);
        }
        tree
    }

    /// Reads every account through `conn`, so the snapshot shares the caller's
    /// transaction.
    #[instrument(skip(conn))]
    pub async fn load<C: ConnectionTrait>(conn: &C) -> Result<Self> {
        let models = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .all(conn)
            .await?;
        debug!("Loaded {} accounts into tree snapshot", models.len());
        Ok(Self::from_models(models))
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn get(&self, id: i32) -> Option<&account::Model> {
        self.accounts.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &account::Model> {
        self.accounts.values()
    }

    pub fn children_of(&self, id: i32) -> impl Iterator<Item = &account::Model> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child_id| self.accounts.get(child_id))
    }

    pub fn child_count(&self, id: i32) -> usize {
        self.children.get(&id).map_or(0, Vec::len)
    }

    pub fn find_by_code(&self, code: &Code) -> Option<&account::Model> {
        self.by_code
            .get(code.as_str())
            .and_then(|id| self.accounts.get(id))
    }

    /// Whether any account other than `except` already uses `code`.
    pub fn code_taken(&self, code: &Code, except: Option<i32>) -> bool {
        self.accounts
            .values()
            .any(|a| a.code == code.as_str() && Some(a.id) != except)
    }

    /// An account that can hold entries and already has children is frozen:
    /// its code, type and parent can't change and it can't be deleted.
    pub fn is_leaf_frozen(&self, id: i32) -> bool {
        self.get(id)
            .is_some_and(|a| a.can_have_entries && self.child_count(id) > 0)
    }

    /// Ids of `id` and everything below it, parents before children.
    pub fn subtree(&self, id: i32) -> Vec<i32> {
        let mut ids = Vec::new();
        if !self.accounts.contains_key(&id) {
            return ids;
        }
        ids.push(id);
        let mut visited = HashSet::from([id]);
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor];
            if let Some(children) = self.children.get(&current) {
                for child in children {
                    // Corrupted parent links may form a loop.
                    if visited.insert(*child) {
                        ids.push(*child);
                    }
                }
            }
            cursor += 1;
        }
        ids
    }

    /// Parsed codes of the direct children of `id`.
    pub fn child_codes(&self, id: i32) -> Result<Vec<Code>> {
        self.children_of(id)
            .map(|child| child.code().map_err(Into::into))
            .collect()
    }
}
