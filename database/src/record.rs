//! Layout of a list in Redis.
//!
//! Each list is a hash at `listto:list:{guild}:{name}` with the fields `guild`, `name`,
//! `type`, `access` (JSON array of ids) and `list` (JSON array of `{value, timeAdded}`).
//! The names of every list in a scope are kept in the set `listto:guild:{guild}`.

use crate::{DatabaseError, DatabaseResult};
use contracts::{ListItem, ListtoList, Visibility};
use std::collections::HashMap;

pub const GUILD: &str = "guild";
pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const ACCESS: &str = "access";
pub const LIST: &str = "list";
/// Older records only say whether the list is private
const LEGACY_PRIVATE: &str = "private";

const KEY_PREFIX: &str = "listto";

pub fn list_key(guild: &str, name: &str) -> String {
    format!("{}:list:{}:{}", KEY_PREFIX, guild, name)
}

pub fn scope_key(guild: &str) -> String {
    format!("{}:guild:{}", KEY_PREFIX, guild)
}

pub fn encode(list: &ListtoList) -> DatabaseResult<Vec<(&'static str, String)>> {
    Ok(vec![
        (GUILD, list.guild.clone()),
        (NAME, list.name.clone()),
        (TYPE, list.visibility.to_string()),
        (ACCESS, serde_json::to_string(&list.access)?),
        (LIST, serde_json::to_string(&list.items)?),
    ])
}

pub fn decode(mut fields: HashMap<String, String>) -> DatabaseResult<ListtoList> {
    let guild = take(&mut fields, GUILD)?;
    let name = take(&mut fields, NAME)?;
    let visibility = visibility(&mut fields)?;

    let access: Vec<String> = match fields.remove(ACCESS) {
        Some(access) => serde_json::from_str(&access)?,
        None => Vec::new(),
    };

    let items: Vec<ListItem> = match fields.remove(LIST) {
        Some(items) => serde_json::from_str(&items)?,
        None => Vec::new(),
    };

    Ok(ListtoList {
        guild,
        name,
        visibility,
        access,
        items,
    })
}

/// Decodes the records fetched for every name indexed in `scope`.
///
/// A name whose record is gone is skipped with a warning.
pub fn decode_indexed(
    scope: &str,
    records: Vec<(String, HashMap<String, String>)>,
) -> DatabaseResult<Vec<ListtoList>> {
    let mut lists = Vec::with_capacity(records.len());
    for (name, fields) in records {
        if fields.is_empty() {
            warn!(
                "scope '{}' lists '{}' but there is no record for it",
                scope, name
            );
            continue;
        }
        lists.push(decode(fields)?);
    }
    Ok(lists)
}

fn take(fields: &mut HashMap<String, String>, field: &'static str) -> DatabaseResult<String> {
    fields.remove(field).ok_or(DatabaseError::MissingField(field))
}

fn visibility(fields: &mut HashMap<String, String>) -> DatabaseResult<Visibility> {
    if let Some(value) = fields.remove(TYPE) {
        return value
            .parse()
            .map_err(|_| DatabaseError::InvalidField { field: TYPE, value });
    }

    match fields.remove(LEGACY_PRIVATE).as_deref() {
        Some("true") => Ok(Visibility::Private),
        Some("false") => Ok(Visibility::Public),
        Some(other) => Err(DatabaseError::InvalidField {
            field: LEGACY_PRIVATE,
            value: other.to_owned(),
        }),
        None => Err(DatabaseError::MissingField(TYPE)),
    }
}
