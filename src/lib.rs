use std::sync::Arc;

use cache::{FriendCacheOperations, KvClient, UserCacheOperations};
use config::Config;
use database::Store;
use infrastructure::TokenAuthority;
use middleware::AccessGate;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod result;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod testing;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserCacheOperations,
    pub friends: FriendCacheOperations,
    pub tokens: TokenAuthority,
    pub gate: AccessGate,
}

impl AppState {
    pub fn new(
        config: Config,
        kv: Arc<dyn KvClient>,
        store: Arc<dyn Store>,
        tokens: TokenAuthority,
    ) -> Self {
        let ttl = config.cache_ttl();
        let users = UserCacheOperations::new(kv.clone(), store.clone(), ttl);
        let friends = FriendCacheOperations::new(kv, store, ttl);
        let gate = AccessGate::new(tokens.clone(), users.clone());
        Self {
            config: Arc::new(config),
            users,
            friends,
            tokens,
            gate,
        }
    }
}
