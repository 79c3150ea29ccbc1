use async_trait::async_trait;
use contracts::ListtoList;
use mobc_redis::{mobc, redis::RedisError};
use std::fmt::Display;

#[macro_use]
extern crate log;

mod list;
mod memory;
mod pool;
pub mod record;

pub use memory::*;
pub use pool::*;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Storage for lists, keyed by owner scope (guild or user id) and list name
#[async_trait]
pub trait ListStore: Send + Sync {
    /// ## Error
    /// * `ListNotFound` if there is no list called `name` in `guild`.
    async fn get_list(&self, guild: &str, name: &str) -> DatabaseResult<ListtoList>;

    /// Every list in `guild`, followed by every list in `user`'s personal scope if given.
    ///
    /// Lists are not deduplicated between the two scopes.
    /// ## Error
    /// * `ListsNotFound` if none of the queried scopes have any lists.
    async fn get_all_lists(&self, guild: &str, user: Option<&str>)
        -> DatabaseResult<Vec<ListtoList>>;

    /// Inserts or overwrites the list
    async fn put_list(&self, list: &ListtoList) -> DatabaseResult<()>;

    /// Deleting a list that doesn't exist is not an error
    async fn delete_list(&self, guild: &str, name: &str) -> DatabaseResult<()>;
}

/// Lists stored in Redis
pub struct Database {
    pool: RedisPool,
}

impl Database {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    ListNotFound(String),
    ListsNotFound,
    RedisError(RedisError),
    PoolError(mobc::Error<RedisError>),
    SerdeError(serde_json::Error),
    MissingField(&'static str),
    InvalidField { field: &'static str, value: String },
}

impl DatabaseError {
    /// Whether the error just means nothing was stored under the key
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseError::ListNotFound(_) | DatabaseError::ListsNotFound
        )
    }
}

impl From<RedisError> for DatabaseError {
    fn from(redis_error: RedisError) -> Self {
        DatabaseError::RedisError(redis_error)
    }
}

impl From<mobc::Error<RedisError>> for DatabaseError {
    fn from(pool_error: mobc::Error<RedisError>) -> Self {
        DatabaseError::PoolError(pool_error)
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(serde_error: serde_json::Error) -> Self {
        DatabaseError::SerdeError(serde_error)
    }
}

impl Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            DatabaseError::ListNotFound(name) => format!("no list called '{}'", name),
            DatabaseError::ListsNotFound => "no lists".to_string(),
            DatabaseError::RedisError(e) => e.to_string(),
            DatabaseError::PoolError(e) => format!("{:?}", e),
            DatabaseError::SerdeError(e) => e.to_string(),
            DatabaseError::MissingField(field) => format!("missing field '{}'", field),
            DatabaseError::InvalidField { field, value } => {
                format!("invalid value '{}' for field '{}'", value, field)
            }
        };

        write!(f, "{}", output)
    }
}

impl std::error::Error for DatabaseError {}
