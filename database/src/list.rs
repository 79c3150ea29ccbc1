use crate::{record, Database, DatabaseError, DatabaseResult, ListStore};
use async_trait::async_trait;
use contracts::ListtoList;
use mobc_redis::redis::{self, AsyncCommands};
use std::collections::HashMap;

#[async_trait]
impl ListStore for Database {
    async fn get_list(&self, guild: &str, name: &str) -> DatabaseResult<ListtoList> {
        let mut conn = self.pool.get_connection().await?;

        let fields: HashMap<String, String> = conn.hgetall(record::list_key(guild, name)).await?;
        if fields.is_empty() {
            return Err(DatabaseError::ListNotFound(name.to_owned()));
        }

        record::decode(fields)
    }

    async fn get_all_lists(
        &self,
        guild: &str,
        user: Option<&str>,
    ) -> DatabaseResult<Vec<ListtoList>> {
        let mut conn = self.pool.get_connection().await?;

        let mut lists = Vec::new();
        for scope in std::iter::once(guild).chain(user) {
            let names: Vec<String> = conn.smembers(record::scope_key(scope)).await?;
            let mut records = Vec::with_capacity(names.len());
            for name in names {
                let fields: HashMap<String, String> =
                    conn.hgetall(record::list_key(scope, &name)).await?;
                records.push((name, fields));
            }
            lists.extend(record::decode_indexed(scope, records)?);
        }

        if lists.is_empty() {
            return Err(DatabaseError::ListsNotFound);
        }

        Ok(lists)
    }

    async fn put_list(&self, list: &ListtoList) -> DatabaseResult<()> {
        let fields = record::encode(list)?;
        let key = record::list_key(&list.guild, &list.name);

        let mut conn = self.pool.get_connection().await?;

        redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .hset_multiple(&key, fields.as_slice())
            .ignore()
            .sadd(record::scope_key(&list.guild), &list.name)
            .ignore()
            .query_async::<_, ()>(&mut *conn)
            .await?;

        trace!(
            "stored list '{}' in scope '{}' with {} items",
            list.name,
            list.guild,
            list.len()
        );
        Ok(())
    }

    async fn delete_list(&self, guild: &str, name: &str) -> DatabaseResult<()> {
        let mut conn = self.pool.get_connection().await?;

        redis::pipe()
            .atomic()
            .del(record::list_key(guild, name))
            .ignore()
            .srem(record::scope_key(guild), name)
            .ignore()
            .query_async::<_, ()>(&mut *conn)
            .await?;

        Ok(())
    }
}
