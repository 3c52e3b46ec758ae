pub mod store;

pub use store::create_redis_client;
pub use store::RedisSessionStore;
pub use store::SessionKey;
