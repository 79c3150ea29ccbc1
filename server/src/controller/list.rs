use super::{Caller, Lists};
use crate::{
    app::{AppError, AppResult, ParamsError},
    reply,
};
use contracts::{parse_index, Embed, InvalidIndex, InvalidSortKey, ListtoList, SortKey, Visibility};
use std::{collections::HashSet, sync::Arc};

pub struct ListController {
    lists: Arc<Lists>,
}

impl ListController {
    pub fn new(lists: Arc<Lists>) -> Self {
        Self { lists }
    }

    /// Creates a list in the caller's scope.
    ///
    /// Lists created from a direct message are always personal. `access` seeds the access
    /// list of private lists.
    pub async fn create(
        &self,
        caller: &Caller<'_>,
        name: &str,
        visibility: Visibility,
        access: &[String],
    ) -> AppResult<Embed> {
        let visibility = match caller.guild {
            None => Visibility::Personal,
            Some(_) => visibility,
        };
        let scope = match visibility {
            Visibility::Personal => caller.user,
            _ => caller.scope(),
        };

        let _guard = self.lists.lock(std::iter::once(scope), name).await;

        match self.lists.store().get_list(scope, name).await {
            Ok(_) => {
                return Err(AppError::from(reply::hint(format!(
                    "I found another list already called {}",
                    name
                ))))
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(AppError::from_store("get_list", e)),
        }

        let mut list = ListtoList::new(scope, name, visibility);
        list.add_access(access);
        self.lists
            .store()
            .put_list(&list)
            .await
            .map_err(|e| AppError::from_store("put_list", e))?;

        let message = match visibility {
            Visibility::Public => format!("{} list created!", name),
            Visibility::Private => format!("I created a private list called {} for you", name),
            Visibility::Personal => format!("I created a personal list called {} for you", name),
        };
        Ok(Embed::success(message))
    }

    pub async fn delete(&self, caller: &Caller<'_>, name: &str) -> AppResult<Embed> {
        let _guards = self.lists.lock(caller.scopes(), name).await;

        let list = self.lists.view(caller, name).await?;
        self.lists
            .store()
            .delete_list(&list.guild, &list.name)
            .await
            .map_err(|e| AppError::from_store("delete_list", e))?;

        Ok(Embed::success(format!("I have deleted {}", name)))
    }

    pub async fn clear(&self, caller: &Caller<'_>, name: &str) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                list.clear();
                Ok(Embed::success(format!("I've cleared {}", list.name)))
            })
            .await
    }

    /// The whole list, or with `arg`, the item at that position
    pub async fn get(&self, caller: &Caller<'_>, name: &str, arg: &str) -> AppResult<Embed> {
        let list = self.lists.view(caller, name).await?;

        if arg.is_empty() {
            return Ok(reply::render_list(&list));
        }

        let index = parse_index(arg)?;
        match list.select_item(index) {
            Some(value) => Ok(reply::render_item(index, value)),
            None => Err(AppError::from(reply::hint(
                "I couldn't find an item at that position!",
            ))),
        }
    }

    /// Names of every list the caller can use, from the guild and their personal scope
    pub async fn list_lists(&self, caller: &Caller<'_>) -> AppResult<Embed> {
        let personal = caller.guild.map(|_| caller.user);
        let lists = self
            .lists
            .store()
            .get_all_lists(caller.scope(), personal)
            .await
            .map_err(|e| AppError::from_store("get_all_lists", e))?;

        let mut seen = HashSet::new();
        let names = lists
            .iter()
            .filter(|list| list.can_access(caller.user, caller.roles))
            .map(|list| list.name.as_str())
            .filter(|name| seen.insert(*name));

        Ok(reply::render_names(names))
    }

    pub async fn sort(&self, caller: &Caller<'_>, name: &str, arg: &str) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                let key: SortKey = arg.parse()?;
                list.sort(key);
                Ok(Embed::success(format!("I have sorted {} by {}!", list.name, key)))
            })
            .await
    }
}

impl ParamsError for InvalidSortKey {}

impl ParamsError for InvalidIndex {}
