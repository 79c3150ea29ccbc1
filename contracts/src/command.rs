use std::{error::Error, fmt::Display, str::FromStr};

const ADD: &str = "add";
const CLEAR: &str = "clear";
const CREATE: &str = "create";
const CREATE_PRIVATE: &str = "createprivate";
const CREATE_PERSONAL: &str = "createpersonal";
const ADD_TO_PRIVATE: &str = "addtoprivate";
const REMOVE_FROM_PRIVATE: &str = "removefromprivate";
const DELETE: &str = "delete";
const EDIT: &str = "edit";
const GET: &str = "get";
const HELP: &str = "help";
const LIST: &str = "list";
const PING: &str = "ping";
const RANDOM: &str = "random";
const REMOVE: &str = "remove";
const SORT: &str = "sort";

/// A bot command, addressed by its full name or its short alias
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add an item to a list
    Add,
    /// Remove every item from a list
    Clear,
    /// Create a public list
    Create,
    /// Create a private list for the author and everyone tagged
    CreatePrivate,
    /// Create a list only the author can use
    CreatePersonal,
    /// Give tagged users and roles access to a private list
    AddToPrivate,
    /// Take access to a private list away from tagged users and roles
    RemoveFromPrivate,
    /// Delete a list
    Delete,
    /// Edit an item, by index or by value
    Edit,
    /// Show a list, or a single item in it
    Get,
    /// Show usage
    Help,
    /// Show every list the author can use
    List,
    Ping,
    /// Pick a random item
    Random,
    /// Remove an item, by index or by value
    Remove,
    /// Sort a list by name or time
    Sort,
}

impl Command {
    /// Whether the command operates on a named list
    pub fn needs_list(&self) -> bool {
        !matches!(self, Command::Help | Command::List | Command::Ping)
    }
}

impl FromStr for Command {
    type Err = (); // any failure means the command simply doesn't exist
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            ADD | "a" => Ok(Self::Add),
            CLEAR | "cl" => Ok(Self::Clear),
            CREATE | "c" => Ok(Self::Create),
            CREATE_PRIVATE | "cp" => Ok(Self::CreatePrivate),
            CREATE_PERSONAL | "cm" => Ok(Self::CreatePersonal),
            ADD_TO_PRIVATE | "ap" => Ok(Self::AddToPrivate),
            REMOVE_FROM_PRIVATE | "rp" => Ok(Self::RemoveFromPrivate),
            DELETE | "d" => Ok(Self::Delete),
            EDIT | "e" => Ok(Self::Edit),
            GET | "g" => Ok(Self::Get),
            HELP | "h" => Ok(Self::Help),
            LIST | "l" => Ok(Self::List),
            PING => Ok(Self::Ping),
            RANDOM | "rv" => Ok(Self::Random),
            REMOVE | "r" => Ok(Self::Remove),
            SORT | "s" => Ok(Self::Sort),
            _ => Err(()),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Command::Add => ADD,
                Command::Clear => CLEAR,
                Command::Create => CREATE,
                Command::CreatePrivate => CREATE_PRIVATE,
                Command::CreatePersonal => CREATE_PERSONAL,
                Command::AddToPrivate => ADD_TO_PRIVATE,
                Command::RemoveFromPrivate => REMOVE_FROM_PRIVATE,
                Command::Delete => DELETE,
                Command::Edit => EDIT,
                Command::Get => GET,
                Command::Help => HELP,
                Command::List => LIST,
                Command::Ping => PING,
                Command::Random => RANDOM,
                Command::Remove => REMOVE,
                Command::Sort => SORT,
            }
        )
    }
}

/// A chat message split into command, list name and free text argument.
///
/// `^add MyList some   item` parses into command `add`, list `MyList` and
/// argument `some item`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMessage {
    pub command: String,
    pub list: String,
    pub arg: String,
}

impl ParsedMessage {
    /// Returns `None` for messages without the prefix, or with nothing after it
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let mut tokens = rest.split_whitespace();

        let command = tokens.next()?.to_owned();
        let list = tokens.next().unwrap_or_default().to_owned();
        let arg = tokens.collect::<Vec<_>>().join(" ");

        Some(Self { command, list, arg })
    }

    pub fn command(&self) -> Option<Command> {
        self.command.parse().ok()
    }
}

/// An item addressed either by position or by value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemRef {
    Index(usize),
    Value(String),
}

impl ItemRef {
    /// Anything that isn't a non-negative integer is taken as a value
    pub fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Value(arg.to_owned()),
        }
    }
}

/// Arguments to `edit`, either `0 new value` or `"old value" "new value"`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditArgs {
    ByIndex { index: usize, value: String },
    ByValue { old: String, new: String },
}

impl FromStr for EditArgs {
    type Err = InvalidEditArgs;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let quoted: Vec<&str> = s.split(r#"" ""#).collect();

        match quoted.as_slice() {
            [unquoted] => {
                let mut tokens = unquoted.split_whitespace();
                let index = tokens
                    .next()
                    .and_then(|token| token.parse::<usize>().ok())
                    .ok_or(InvalidEditArgs::NotAnIndex)?;

                let value = tokens.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(InvalidEditArgs::MissingValue);
                }

                Ok(Self::ByIndex { index, value })
            }
            [old, new] => {
                let old = old.strip_prefix('"').unwrap_or(*old);
                let new = new.strip_suffix('"').unwrap_or(*new);
                if old.is_empty() || new.is_empty() {
                    return Err(InvalidEditArgs::MissingValue);
                }

                Ok(Self::ByValue {
                    old: old.to_owned(),
                    new: new.to_owned(),
                })
            }
            _ => Err(InvalidEditArgs::TooManyArguments),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEditArgs {
    NotAnIndex,
    MissingValue,
    TooManyArguments,
}

impl Error for InvalidEditArgs {}

impl Display for InvalidEditArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            InvalidEditArgs::NotAnIndex => {
                "The first argument needs to be a number or existing value!"
            }
            InvalidEditArgs::MissingValue => "I need both the item to edit and its new value!",
            InvalidEditArgs::TooManyArguments => "You can only specify two arguments",
        };

        write!(f, "{}", output)
    }
}

/// Position argument to `get`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidIndex;

impl Error for InvalidIndex {}

impl Display for InvalidIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The searched item needs to be a number!")
    }
}

pub fn parse_index(arg: &str) -> Result<usize, InvalidIndex> {
    arg.trim().parse::<usize>().map_err(|_| InvalidIndex)
}
