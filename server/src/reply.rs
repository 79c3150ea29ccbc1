use contracts::{Embed, ListtoList};
use std::borrow::Cow;

/// Most characters the chat platform accepts in a single embed field
pub const FIELD_LIMIT: usize = 1024;

const ELLIPSIS: &str = "…";

pub fn fail_msg() -> Embed {
    Embed::failure("Oops, I had a problem doing that for you")
}

pub fn no_list(list: &str) -> Embed {
    Embed::warning(format!("I couldn't find a list called {}", list))
}

pub fn no_lists() -> Embed {
    Embed::warning("I couldn't find any lists for you")
}

pub fn no_perms(list: &str) -> Embed {
    Embed::warning(format!("You have not been given permission to use {}", list))
}

pub fn hint(message: impl Into<String>) -> Embed {
    Embed::warning(message)
}

/// Renders every item of a list, one per line, split over as many fields as needed
pub fn render_list(list: &ListtoList) -> Embed {
    let mut embed = Embed::success("Your List");
    let mut values = String::new();

    for item in &list.items {
        let value = truncate(&item.value, FIELD_LIMIT);
        if !values.is_empty() && values.len() + 1 + value.len() > FIELD_LIMIT {
            embed = embed.with_field(&list.name, values);
            values = String::new();
        }
        if !values.is_empty() {
            values.push('\n');
        }
        values.push_str(&value);
    }

    if list.is_empty() {
        values = "This list is empty!".to_string();
    }

    embed
        .with_field(&list.name, values)
        .with_field("List Entries", list.len().to_string())
}

pub fn render_item(index: usize, value: &str) -> Embed {
    Embed::success("Your Item").with_field(
        format!("Item at position {}", index),
        truncate(value, FIELD_LIMIT),
    )
}

pub fn render_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Embed {
    let mut values = String::new();
    for name in names {
        if !values.is_empty() {
            values.push('\n');
        }
        values.push_str(name);
    }

    if values.is_empty() {
        return no_lists();
    }

    Embed::success("I found these lists!").with_field("Your lists", values)
}

/// Cuts `value` to at most `limit` bytes on a char boundary, ending cut values with an ellipsis
fn truncate(value: &str, limit: usize) -> Cow<'_, str> {
    if value.len() <= limit {
        return Cow::Borrowed(value);
    }
    let mut end = limit.saturating_sub(ELLIPSIS.len());
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}{}", &value[..end], ELLIPSIS))
}

pub fn help(prefix: &str, topic: &str) -> Embed {
    let p = prefix;

    match topic.to_lowercase().as_str() {
        "lists" => Embed::info("Here are some commands involving lists:")
            .with_field("clear, cl", format!("Clears a list\n__Example__:\n{}clear MyList", p))
            .with_field(
                "create, c",
                format!(
                    "Creates a new list. Lists cannot contain spaces\n__Example__:\n{}create MyList",
                    p
                ),
            )
            .with_field(
                "createprivate, cp",
                format!(
                    "Creates a new private list. You can specify allowed users and roles after the list name. \
                     Will default to just you if left blank\n__Examples__:\n{}createprivate MyList @UserOne\n{}cp MyList @MyRole",
                    p, p
                ),
            )
            .with_field(
                "createpersonal, cm",
                format!(
                    "Creates a list only you can see, wherever you use it from\n__Example__:\n{}cm MyList",
                    p
                ),
            )
            .with_field(
                "addtoprivate, ap",
                format!(
                    "Adds the specified roles or users to a private list\n__Example__:\n{}addtoprivate MyList @UserOne",
                    p
                ),
            )
            .with_field(
                "removefromprivate, rp",
                format!(
                    "Removes the specified roles or users from a private list\n__Example__:\n{}rp MyList @Role",
                    p
                ),
            )
            .with_field("delete, d", format!("Deletes a list\n__Example__:\n{}delete MyList", p))
            .with_field("get, g", format!("Gets a list\n__Example__:\n{}get MyList", p))
            .with_field(
                "sort, s",
                format!("Sorts a list by either name or time\n__Example__\n{}sort MyList name", p),
            ),
        "items" => Embed::info("Here are some commands involving list items:")
            .with_field(
                "add, a",
                format!(
                    "Adds an item to a list, items can have spaces\n__Example__:\n{}add MyList My Item",
                    p
                ),
            )
            .with_field(
                "edit, e",
                format!(
                    "Edit an item in a list. You can specify the item to edit either by its index, or its value. \
                     If you search by index, then note that 0 is the first item in the list, and the new value should not be surrounded by \"s. \
                     If you search by value, then both values need to be surrounded with \"s\
                     \n__Example__:\n{}edit MyList 0 My new and improved item\n{}e MyList \"My Old Item\" \"My New Item\"",
                    p, p
                ),
            )
            .with_field(
                "get, g",
                format!(
                    "Get an item from a list. You specify the item by using the index as specified above.\n__Example__:\n{}g MyList 0",
                    p
                ),
            )
            .with_field(
                "random, rv",
                format!("Selects a random item from a list\n__Example__:\n{}rv MyList", p),
            )
            .with_field(
                "remove, r",
                format!(
                    "Removes an item from a list. You can either type the item in full, or the item index\
                     \n__Example__:\n{}remove MyList MyItem\n{}r MyList 0",
                    p, p
                ),
            ),
        _ => Embed::info("Listto does some list management things! Here's some generic commands:")
            .with_field(
                "help, h",
                format!(
                    "Displays a help message!\nCan accept arguments of lists and items\n__Examples__:\n{}help\n{}h lists",
                    p, p
                ),
            )
            .with_field("list, l", format!("Lists all lists on the server\n__Example__:\n{}l", p))
            .with_field("ping", format!("Check if I'm alive\n__Example__:\n{}ping", p)),
    }
}
