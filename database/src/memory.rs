use crate::{DatabaseError, DatabaseResult, ListStore};
use async_trait::async_trait;
use contracts::ListtoList;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Lists kept in process memory, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    lists: RwLock<BTreeMap<(String, String), ListtoList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn get_list(&self, guild: &str, name: &str) -> DatabaseResult<ListtoList> {
        self.lists
            .read()
            .await
            .get(&(guild.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| DatabaseError::ListNotFound(name.to_owned()))
    }

    async fn get_all_lists(
        &self,
        guild: &str,
        user: Option<&str>,
    ) -> DatabaseResult<Vec<ListtoList>> {
        let lists = self.lists.read().await;

        let found: Vec<ListtoList> = std::iter::once(guild)
            .chain(user)
            .flat_map(|scope| lists.values().filter(move |list| list.guild == scope))
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(DatabaseError::ListsNotFound);
        }

        Ok(found)
    }

    async fn put_list(&self, list: &ListtoList) -> DatabaseResult<()> {
        self.lists
            .write()
            .await
            .insert((list.guild.clone(), list.name.clone()), list.clone());
        Ok(())
    }

    async fn delete_list(&self, guild: &str, name: &str) -> DatabaseResult<()> {
        self.lists
            .write()
            .await
            .remove(&(guild.to_owned(), name.to_owned()));
        Ok(())
    }
}
