pub mod redis_store;

pub use redis_store::RedisProgressStore;
