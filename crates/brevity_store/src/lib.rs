//! Key-value persistence for the brevity code bot.
//!
//! The remote store is used as a plain dictionary of strings:
//! - [`KeyValueStore`] is the get/set/expire capability, with
//!   [`MemoryStore`] and [`RedisStore`] backends
//! - [`Keys`] owns the key layout
//! - [`GuildRepository`] gives typed, guild-scoped access on top of it

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod keys;
mod memory;
mod redis_store;
mod repository;
mod store;

pub use keys::Keys;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repository::{DEFAULT_RESULTS_RETAINED, GuildRepository};
pub use store::{KeyValueStore, connect};
