use super::{Caller, Lists};
use crate::{
    app::{AppError, AppResult, ParamsError},
    reply,
};
use contracts::{AccessError, Embed, ListtoList, Visibility};
use std::sync::Arc;

pub struct AccessController {
    lists: Arc<Lists>,
}

impl AccessController {
    pub fn new(lists: Arc<Lists>) -> Self {
        Self { lists }
    }

    /// Gives `tagged` users and roles access to a private list
    pub async fn add_access(
        &self,
        caller: &Caller<'_>,
        name: &str,
        tagged: &[String],
    ) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                check_private(list, tagged)?;
                list.add_access(tagged);

                Ok(Embed::success(format!(
                    "I have added those tags to allowed users on {}",
                    list.name
                )))
            })
            .await
    }

    /// Takes access to a private list away from `tagged` users and roles
    pub async fn remove_access(
        &self,
        caller: &Caller<'_>,
        name: &str,
        tagged: &[String],
    ) -> AppResult<Embed> {
        self.lists
            .update(caller, name, |list| {
                check_private(list, tagged)?;
                list.remove_access(tagged)?;

                Ok(Embed::success(format!(
                    "I have removed those tags from allowed users on {}",
                    list.name
                )))
            })
            .await
    }
}

fn check_private(list: &ListtoList, tagged: &[String]) -> AppResult<()> {
    if list.visibility != Visibility::Private {
        return Err(AppError::from(reply::hint(format!(
            "{} isn't a private list, everyone who can see it can already use it",
            list.name
        ))));
    }

    if tagged.is_empty() {
        return Err(AppError::from(reply::hint(
            "You need to tag the users or roles you mean",
        )));
    }

    Ok(())
}

impl ParamsError for AccessError {}
