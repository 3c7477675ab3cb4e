//! Counter handlers: the like listener, the durable syncer and the max-id cache.

mod listener;
mod max_id_cache;
mod syncer;

pub use listener::CounterListener;
pub use max_id_cache::MaxIdCache;
pub use syncer::{CounterSyncer, CounterSyncerConfig, FlushReport};
