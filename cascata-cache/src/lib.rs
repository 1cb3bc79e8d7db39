//! cascata-cache
//!
//! Time-bounded storage for `FetchResult` payloads, keyed by
//! `(SYMBOL, period-or-kind, kind)`.
//!
//! - `FileCacheStore`: one JSON file per key, atomic replace on write.
//! - `MemoryCacheStore`: bounded in-process store on `moka`.
//!
//! Both implement [`CacheStore`]; typed `get`/`put` live on `dyn CacheStore`.
#![warn(missing_docs)]

mod file;
mod key;
mod memory;
mod store;

pub use file::FileCacheStore;
pub use key::CacheKey;
pub use memory::MemoryCacheStore;
pub use store::{CacheEntry, CacheStore};
