use rand::seq::SliceRandom;
use std::{error::Error, fmt::Display, str::FromStr};

const PUBLIC: &str = "public";
const PRIVATE: &str = "private";
const PERSONAL: &str = "personal";

const SORT_NAME: &str = "name";
const SORT_TIME: &str = "time";

/// Who is allowed to see and change a list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Anyone in the owning guild
    Public,
    /// Only the users and roles in the list's access list
    Private,
    /// Only the user that created it, the owner scope is that user's id
    Personal,
}

impl FromStr for Visibility {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PUBLIC => Ok(Self::Public),
            PRIVATE => Ok(Self::Private),
            PERSONAL => Ok(Self::Personal),
            _ => Err(()),
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Visibility::Public => PUBLIC,
                Visibility::Private => PRIVATE,
                Visibility::Personal => PERSONAL,
            }
        )
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    pub value: String,
    #[serde(rename = "timeAdded")]
    pub time_added: i64,
}

impl ListItem {
    pub fn new(value: String, time_added: i64) -> Self {
        Self { value, time_added }
    }
}

/// A named list of items, owned by a guild or, for personal lists, by a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListtoList {
    pub guild: String,
    pub name: String,
    pub visibility: Visibility,
    pub access: Vec<String>,
    pub items: Vec<ListItem>,
}

impl ListtoList {
    pub fn new(guild: &str, name: &str, visibility: Visibility) -> Self {
        Self {
            guild: guild.to_owned(),
            name: name.to_owned(),
            visibility,
            access: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item.value == value)
    }

    pub fn add_item(&mut self, value: &str, time_added: i64) {
        self.items.push(ListItem::new(value.to_owned(), time_added));
    }

    /// Removes the first item equal to `value`
    pub fn remove_item(&mut self, value: &str) -> Option<String> {
        let index = self.items.iter().position(|item| item.value == value)?;
        Some(self.items.remove(index).value)
    }

    pub fn remove_index(&mut self, index: usize) -> Option<String> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index).value)
    }

    /// Replaces the first item equal to `old`, returning the replaced value
    pub fn edit_item(&mut self, old: &str, new: &str) -> Option<String> {
        let item = self.items.iter_mut().find(|item| item.value == old)?;
        Some(std::mem::replace(&mut item.value, new.to_owned()))
    }

    pub fn edit_index(&mut self, index: usize, new: &str) -> Option<String> {
        let item = self.items.get_mut(index)?;
        Some(std::mem::replace(&mut item.value, new.to_owned()))
    }

    pub fn select_item(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.value.as_str())
    }

    pub fn select_random(&self) -> Option<&str> {
        self.items
            .choose(&mut rand::thread_rng())
            .map(|item| item.value.as_str())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self
                .items
                .sort_by(|a, b| a.value.to_lowercase().cmp(&b.value.to_lowercase())),
            SortKey::Time => self.items.sort_by_key(|item| item.time_added),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive, by item value
    Name,
    /// By the time each item was added
    Time,
}

impl FromStr for SortKey {
    type Err = InvalidSortKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            SORT_NAME => Ok(Self::Name),
            SORT_TIME => Ok(Self::Time),
            _ => Err(InvalidSortKey(s.to_owned())),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortKey::Name => SORT_NAME,
                SortKey::Time => SORT_TIME,
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSortKey(pub String);

impl Error for InvalidSortKey {}

impl Display for InvalidSortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"Sorry! I only sort by "{}" or "{}"!"#, SORT_NAME, SORT_TIME)
    }
}
