pub use access::*;
pub use command::*;
pub use list::*;
pub use message::*;

mod access;
mod command;
mod list;
mod message;
