//! List the network endpoints Microsoft publishes for a Microsoft 365 service region.
//!
//! The endpoint web service publishes a small directory of regions (the "instances") and, for
//! each region, a feed of service records carrying URL patterns, IP prefixes, and a `required`
//! flag. This crate retrieves both, caches them on disk, and extracts a deduplicated list of
//! URLs or IP prefixes.
//!
//! ```no_run
//! // Required IP prefixes of the worldwide region
//! let ips = msendpoints::get_items("worldwide", msendpoints::Category::Ips, true, false)?;
//! # Ok::<(), msendpoints::Error>(())
//! ```
//!
//! Use a [ClientBuilder] to change the base URL, the cache directory, or the cache time, and
//! [Client::get_directory] / [Client::get_region_data] to work with the records directly.

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::cache::{CacheEntry, CacheStore, FileCacheStore, MemoryCacheStore};
pub use crate::core::category::Category;
pub use crate::core::client::{get_items, Client, ClientBuilder, Query, DIRECTORY_CACHE_KEY};
pub use crate::core::directory::{DirectoryEntry, EndpointDirectory};
pub use crate::core::errors::{Error, Result};
pub use crate::core::filter::{extract, Filter, FilterBuilder};
pub use crate::core::prefix_type::PrefixType;
pub use crate::core::service_record::ServiceRecord;
pub use crate::core::transport::{HttpTransport, Transport};

/// Writing item lists to files and standard output.
pub mod output {
    pub use crate::core::output::{write_items, write_to_file, write_to_stdout};
}
