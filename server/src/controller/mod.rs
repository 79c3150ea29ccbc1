use crate::{
    app::{AppError, AppResult},
    locks::{self, KeyLocks},
};
use contracts::{Embed, ListtoList, MessageEvent};
use database::ListStore;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

pub use access::AccessController;
pub use item::ItemController;
pub use list::ListController;
pub use server::ServerController;

mod access;
mod item;
mod list;
mod server;

/// Who sent a command, and from where
#[derive(Clone, Copy, Debug)]
pub struct Caller<'a> {
    pub user: &'a str,
    pub guild: Option<&'a str>,
    pub roles: &'a [String],
}

impl<'a> Caller<'a> {
    /// Scope new lists are created in, the user's own scope in direct messages
    pub fn scope(&self) -> &'a str {
        self.guild.unwrap_or(self.user)
    }

    /// Scopes a list name is looked up in, in order
    pub fn scopes(&self) -> impl Iterator<Item = &'a str> {
        self.guild.into_iter().chain(std::iter::once(self.user))
    }
}

impl<'a> From<&'a MessageEvent> for Caller<'a> {
    fn from(event: &'a MessageEvent) -> Self {
        Self {
            user: &event.author_id,
            guild: event.guild_id.as_deref(),
            roles: &event.roles,
        }
    }
}

/// Finds lists for a caller and applies access checks before anything touches them
pub struct Lists {
    store: Arc<dyn ListStore>,
    locks: KeyLocks,
}

impl Lists {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
        }
    }

    pub fn store(&self) -> &dyn ListStore {
        self.store.as_ref()
    }

    /// The list called `name` in the caller's guild, or else in the caller's personal scope
    pub async fn find(&self, caller: &Caller<'_>, name: &str) -> AppResult<ListtoList> {
        for scope in caller.scopes() {
            match self.store.get_list(scope, name).await {
                Ok(list) => return Ok(list),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(AppError::from_store("get_list", e)),
            }
        }
        Err(AppError::no_list(name))
    }

    /// Like `find`, but refuses callers without access
    pub async fn view(&self, caller: &Caller<'_>, name: &str) -> AppResult<ListtoList> {
        let list = self.find(caller, name).await?;
        if !list.can_access(caller.user, caller.roles) {
            return Err(AppError::no_perms(name));
        }
        Ok(list)
    }

    /// Fetches the list, lets `change` modify it, and stores it again.
    ///
    /// Nothing is stored when `change` returns an error.
    pub async fn update<F>(&self, caller: &Caller<'_>, name: &str, change: F) -> AppResult<Embed>
    where
        F: FnOnce(&mut ListtoList) -> AppResult<Embed> + Send,
    {
        let _guards = self.lock(caller.scopes(), name).await;

        let mut list = self.view(caller, name).await?;
        let reply = change(&mut list)?;
        self.store
            .put_list(&list)
            .await
            .map_err(|e| AppError::from_store("put_list", e))?;

        Ok(reply)
    }

    /// Locks `name` in each scope, always in the order given
    pub async fn lock<'s>(
        &self,
        scopes: impl Iterator<Item = &'s str>,
        name: &str,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut guards = Vec::new();
        for scope in scopes {
            guards.push(self.locks.lock(locks::list_key(scope, name)).await);
        }
        guards
    }
}
