use super::{Caller, Lists};
use crate::{
    app::{AppError, AppResult, ParamsError},
    reply,
};
use contracts::{EditArgs, Embed, InvalidEditArgs, ItemRef};
use std::sync::Arc;

pub struct ItemController {
    lists: Arc<Lists>,
}

impl ItemController {
    pub fn new(lists: Arc<Lists>) -> Self {
        Self { lists }
    }

    /// Appends `value`, noting in the reply when it was already in the list
    pub async fn add(
        &self,
        caller: &Caller<'_>,
        name: &str,
        value: &str,
        time_added: i64,
    ) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                if value.is_empty() {
                    return Err(AppError::from(reply::hint(format!(
                        "You need to tell me what to add to {}",
                        list.name
                    ))));
                }

                let dupe = if list.contains(value) { ", again" } else { "!" };
                list.add_item(value, time_added);

                Ok(Embed::success(format!(
                    "I added {} to {}{}",
                    value, list.name, dupe
                )))
            })
            .await
    }

    /// Removes by position when `arg` is a number, by value otherwise
    pub async fn remove(&self, caller: &Caller<'_>, name: &str, arg: &str) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                let removed = match ItemRef::parse(arg) {
                    ItemRef::Index(index) => list.remove_index(index).ok_or_else(|| {
                        AppError::from(reply::hint(format!(
                            "{} doesn't seem to have that many items!",
                            list.name
                        )))
                    })?,
                    ItemRef::Value(value) => list.remove_item(&value).ok_or_else(|| {
                        AppError::from(reply::hint(format!(
                            "{} doesn't seem to contain {}",
                            list.name, value
                        )))
                    })?,
                };

                Ok(Embed::success(format!(
                    "I have removed {} from {}",
                    removed, list.name
                )))
            })
            .await
    }

    pub async fn edit(&self, caller: &Caller<'_>, name: &str, arg: &str) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                let updated = match arg.parse::<EditArgs>()? {
                    EditArgs::ByIndex { index, value } => {
                        list.edit_index(index, &value).ok_or_else(|| {
                            AppError::from(reply::hint(format!(
                                "{} doesn't seem to have that many items!",
                                list.name
                            )))
                        })?
                    }
                    EditArgs::ByValue { old, new } => {
                        list.edit_item(&old, &new).ok_or_else(|| {
                            AppError::from(reply::hint(format!(
                                "{} doesn't seem to contain {}",
                                list.name, old
                            )))
                        })?
                    }
                };

                Ok(Embed::success(format!(
                    "I have updated {} in {}",
                    updated, list.name
                )))
            })
            .await
    }

    pub async fn random(&self, caller: &Caller<'_>, name: &str) -> AppResult<Embed> {
        let list = self.lists.view(caller, name).await?;

        match list.select_random() {
            Some(value) => Ok(Embed::success(format!(
                "A random element from {} is {}",
                list.name, value
            ))),
            None => Err(AppError::from(reply::hint(format!(
                "{} is empty, there's nothing to pick from",
                list.name
            )))),
        }
    }
}

impl ParamsError for InvalidEditArgs {}
