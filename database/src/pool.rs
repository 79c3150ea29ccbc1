use crate::DatabaseResult;
use mobc_redis::{
    mobc::{Connection, Pool},
    redis::Client,
    RedisConnectionManager,
};
use std::time;

const MAX_OPEN_CONNECTIONS: u64 = 20;

pub type RedisConnection = Connection<RedisConnectionManager>;

pub struct RedisPool {
    addr: String,
    pool: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// ## Error
    /// * If `addr` is not a valid Redis connection string.
    pub fn new(addr: String) -> DatabaseResult<Self> {
        let client = Client::open(addr.as_str())?;
        let pool = Pool::builder()
            .max_open(MAX_OPEN_CONNECTIONS)
            .build(RedisConnectionManager::new(client));
        Ok(Self { addr, pool })
    }

    pub async fn get_connection(&self) -> DatabaseResult<RedisConnection> {
        trace!("retrieving connection to Redis at '{}'", self.addr);
        let timer = time::Instant::now();
        let conn = self.pool.get().await?;
        trace!(
            "retrieved connection to Redis at '{}' in {:?}",
            self.addr,
            timer.elapsed()
        );
        Ok(conn)
    }
}
