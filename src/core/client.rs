use crate::core::cache::{CacheEntry, CacheStore, FileCacheStore};
use crate::core::category::Category;
use crate::core::directory::{DirectoryEntry, EndpointDirectory};
use crate::core::errors::{Error, Result};
use crate::core::filter::{Filter, FilterBuilder};
use crate::core::service_record::{self, ServiceRecord};
use crate::core::transport::{HttpTransport, Transport};
use log::{error, info, warn};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cache key of the endpoint directory.
pub const DIRECTORY_CACHE_KEY: &str = "regions";

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ retrieves the endpoint list of `region` using the default
/// client configuration and returns the URL patterns or IP prefixes of its services.
///
/// ```no_run
/// let urls = msendpoints::get_items("worldwide", msendpoints::Category::Urls, true, false)?;
/// for url in &urls {
///     println!("{url}");
/// }
/// # Ok::<(), msendpoints::Error>(())
/// ```
pub fn get_items(
    region: &str,
    category: Category,
    required_only: bool,
    ignore_cache: bool,
) -> Result<Vec<String>> {
    let mut filter = FilterBuilder::new(category);
    if required_only {
        filter = filter.required_only();
    }

    let query = Query {
        region: region.to_string(),
        filter: filter.build()?,
        ignore_cache,
    };
    ClientBuilder::new().build()?.get_items(&query)
}

/*-------------------------------------------------------------------------------------------------
  Query
-------------------------------------------------------------------------------------------------*/

/// One run of the pipeline: which region, which items, and whether to bypass the region cache.
#[derive(Debug, Clone)]
pub struct Query {
    pub region: String,
    pub filter: Filter,
    pub ignore_cache: bool,
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration.
///
/// ```
/// let client = msendpoints::ClientBuilder::new()
///     .base_url("https://endpoints.office.com")
///     .cache_dir("/tmp/msendpoints")
///     .cache_time(60 * 60) // 1 hour
///     .build()
///     .unwrap();
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [ClientBuilder::default] method to create a new [ClientBuilder] instance.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    cache_dir: PathBuf,
    cache_time: u64,
    client_request_id: String,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let builder = msendpoints::ClientBuilder::default();
    /// let client = builder.build().unwrap();
    ///
    /// assert_eq!(client.base_url(), "https://endpoints.office.com");
    /// assert_eq!(client.cache_time(), 3600);
    /// ```
    fn default() -> Self {
        Self {
            base_url: "https://endpoints.office.com".to_string(),
            cache_dir: default_cache_dir(), // ${XDG_CACHE_HOME}/msendpoints
            cache_time: 60 * 60,            // 1 hour
            client_request_id: new_client_request_id(),
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `MSENDPOINTS_BASE_URL`
    /// - `MSENDPOINTS_CACHE_DIR`
    /// - `MSENDPOINTS_CACHE_TIME`
    /// - `MSENDPOINTS_CLIENT_REQUEST_ID`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            base_url: get_env_var("MSENDPOINTS_BASE_URL", default.base_url),
            cache_dir: get_env_var("MSENDPOINTS_CACHE_DIR", default.cache_dir),
            cache_time: get_env_var("MSENDPOINTS_CACHE_TIME", default.cache_time),
            client_request_id: get_env_var(
                "MSENDPOINTS_CLIENT_REQUEST_ID",
                default.client_request_id,
            ),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the base URL of the endpoint web service; defaults to
    /// `https://endpoints.office.com`.
    pub fn base_url(&mut self, base_url: &str) -> &mut Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the directory holding the cache files; defaults to
    /// `msendpoints` under the user's cache directory.
    pub fn cache_dir<P: AsRef<Path>>(&mut self, cache_dir: P) -> &mut Self {
        self.cache_dir = cache_dir.as_ref().to_path_buf();
        self
    }

    /// Set the amount of time (in seconds) cached region data is considered
    /// fresh; defaults to 1 hour (`3600` seconds). The endpoint directory is
    /// not subject to this window.
    pub fn cache_time(&mut self, cache_time: u64) -> &mut Self {
        self.cache_time = cache_time;
        self
    }

    /// Set the GUID sent as `clientrequestid` with every request; defaults
    /// to a random (version 4) GUID per process.
    pub fn client_request_id(&mut self, client_request_id: &str) -> &mut Self {
        self.client_request_id = client_request_id.to_string();
        self
    }

    /*-------------------------------------------------------------------------
      Build Methods
    -------------------------------------------------------------------------*/

    /// Build a [Client] backed by the file cache and the HTTP transport.
    pub fn build(&self) -> Result<Client> {
        let store = FileCacheStore::new(&self.cache_dir);
        let transport = HttpTransport::new()?;
        self.build_with(store, transport)
    }

    /// Build a [Client] using the provided cache store and transport.
    pub fn build_with<S: CacheStore, T: Transport>(
        &self,
        store: S,
        transport: T,
    ) -> Result<Client<S, T>> {
        let base_url = reqwest::Url::parse(&self.base_url)
            .map_err(|error| Error::Config(format!("base URL {:?}: {error}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL {:?} cannot be a base",
                self.base_url
            )));
        }

        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            cache_time: self.cache_time,
            client_request_id: self.client_request_id.clone(),
            store,
            transport,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A client for retrieving the endpoint directory and region feeds from the cache, when
/// available and fresh, or from the endpoint web service.
///
/// ```no_run
/// let client = msendpoints::ClientBuilder::new().build()?;
/// let directory = client.get_directory()?;
/// let records = client.get_region_data(&directory, "worldwide", false)?;
/// # Ok::<(), msendpoints::Error>(())
/// ```
#[derive(Debug)]
pub struct Client<S = FileCacheStore, T = HttpTransport> {
    base_url: String,
    cache_time: u64,
    client_request_id: String,
    store: S,
    transport: T,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl<S: CacheStore, T: Transport> Client<S, T> {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache_time(&self) -> u64 {
        self.cache_time
    }

    pub fn client_request_id(&self) -> &str {
        &self.client_request_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /*-------------------------------------------------------------------------
      Endpoint Directory
    -------------------------------------------------------------------------*/

    /// Get the endpoint directory. A parsable cached copy is always used, however old; it is
    /// only refreshed when the cache entry is missing or corrupted.
    pub fn get_directory(&self) -> Result<EndpointDirectory> {
        if let Some(entry) = self.store.read(DIRECTORY_CACHE_KEY) {
            match EndpointDirectory::from_json(&entry.payload, &self.base_url) {
                Ok(directory) => {
                    info!("Using cache {DIRECTORY_CACHE_KEY}");
                    return Ok(directory);
                }
                Err(error) => warn!("Cache corrupted ({DIRECTORY_CACHE_KEY}): {error}"),
            }
        }

        let json = self.fetch(&format!("{}/version", self.base_url))?;
        let directory = EndpointDirectory::from_json(&json, &self.base_url)?;
        self.cache(DIRECTORY_CACHE_KEY, &json);

        Ok(directory)
    }

    /*-------------------------------------------------------------------------
      Region Data
    -------------------------------------------------------------------------*/

    /// Get the service records of `region`. Cached data is used while younger than the cache
    /// time, unless `ignore_cache` is set. When refreshing fails, stale cached data is used
    /// instead, except when `ignore_cache` is set.
    pub fn get_region_data(
        &self,
        directory: &EndpointDirectory,
        region: &str,
        ignore_cache: bool,
    ) -> Result<Vec<ServiceRecord>> {
        let entry = directory.lookup(region)?;
        self.get_feed(entry, ignore_cache)
    }

    fn get_feed(&self, entry: &DirectoryEntry, ignore_cache: bool) -> Result<Vec<ServiceRecord>> {
        let key = entry.cache_key();
        let window = Duration::from_secs(self.cache_time);

        let cached: Option<(CacheEntry, Vec<ServiceRecord>)> = if ignore_cache {
            info!("Ignoring cache");
            None
        } else {
            self.store
                .read(&key)
                .and_then(|cached| match service_record::from_json(&cached.payload) {
                    Ok(records) => Some((cached, records)),
                    Err(error) => {
                        warn!("Cache corrupted ({key}): {error}");
                        None
                    }
                })
        };

        let stale = match cached {
            Some((cached, records)) if cached.is_fresh(window) => {
                info!("Using cache {key}");
                return Ok(records);
            }
            Some((cached, records)) => {
                info!(
                    "Cache {key} is stale ({} minutes old); refresh cache",
                    cached.age().num_minutes()
                );
                Some(records)
            }
            None => None,
        };

        let fetched = self
            .fetch(&entry.feed_url)
            .and_then(|json| service_record::from_json(&json).map(|records| (json, records)));

        match (fetched, stale) {
            (Ok((json, records)), _) => {
                self.cache(&key, &json);
                Ok(records)
            }
            (Err(error), Some(records)) => {
                warn!("Unable to refresh {key} ({error}); using stale cache");
                Ok(records)
            }
            (Err(error), None) => Err(error),
        }
    }

    /*-------------------------------------------------------------------------
      Pipeline
    -------------------------------------------------------------------------*/

    /// Resolve the region, retrieve its records, and extract the requested items. An unknown
    /// region fails before any region data is fetched.
    pub fn get_items(&self, query: &Query) -> Result<Vec<String>> {
        let directory = self.get_directory()?;
        let records = self.get_region_data(&directory, &query.region, query.ignore_cache)?;
        query.filter.apply(&records)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// GET `url` with the `clientrequestid` and `format` query parameters.
    fn fetch(&self, url: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            url,
            [
                ("clientrequestid", self.client_request_id.as_str()),
                ("format", "json"),
            ],
        )
        .map_err(|error| Error::Config(format!("URL {url:?}: {error}")))?;

        self.transport.get(url.as_str())
    }

    /// Write a payload to the cache; failures are logged and otherwise ignored.
    fn cache(&self, key: &str, payload: &str) {
        match self.store.write(key, payload) {
            Ok(()) => info!("Cached {key}"),
            Err(error) => error!("Failed to cache {key}: {error}"),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(env::temp_dir)
        .join("msendpoints")
}

/// Random version 4 GUID.
fn new_client_request_id() -> String {
    let mut bytes = [0u8; 16];
    if let Err(error) = getrandom::fill(&mut bytes) {
        warn!("Unable to generate a random client request id: {error}");
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        bytes[..8].copy_from_slice(&nanos.to_be_bytes());
        bytes[8..].copy_from_slice(&u64::from(std::process::id()).to_be_bytes());
    }

    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCacheStore;
    use crate::core::errors::log_error;
    use chrono::{TimeDelta, Utc};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use test_log::test;

    const BASE_URL: &str = "https://endpoints.example.com";
    const REQUEST_ID: &str = "b10c5ed1-bad1-445f-b386-b919946339a7";

    const DIRECTORY_JSON: &str = r#"[{"instance": "Worldwide", "latest": "2024093000"}]"#;
    const FEED_JSON: &str = r#"[
      {"id": 1, "required": true, "urls": ["outlook.office.com"], "ips": ["13.107.6.152/31"]},
      {"id": 2, "required": false, "urls": ["*.msocdn.com", "outlook.office.com"]}
    ]"#;
    const OLD_FEED_JSON: &str = r#"[{"id": 1, "required": true, "urls": ["old.office.com"]}]"#;

    const DIRECTORY_URL: &str =
        "https://endpoints.example.com/version?clientrequestid=b10c5ed1-bad1-445f-b386-b919946339a7&format=json";
    const FEED_URL: &str =
        "https://endpoints.example.com/endpoints/Worldwide?clientrequestid=b10c5ed1-bad1-445f-b386-b919946339a7&format=json";

    /*----------------------------------------------------------------------------------
      Test Doubles
    ----------------------------------------------------------------------------------*/

    /// Serves canned bodies and records every requested URL.
    #[derive(Debug, Default)]
    struct FakeTransport {
        bodies: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.bodies.get(url).cloned().ok_or_else(|| Error::Fetch {
                url: url.to_string(),
                reason: "503 Service Unavailable".to_string(),
            })
        }
    }

    fn test_client(
        store: MemoryCacheStore,
        transport: FakeTransport,
    ) -> Client<MemoryCacheStore, FakeTransport> {
        ClientBuilder::default()
            .base_url(BASE_URL)
            .client_request_id(REQUEST_ID)
            .build_with(store, transport)
            .unwrap()
    }

    fn minutes_ago(minutes: i64, payload: &str) -> CacheEntry {
        CacheEntry::with_timestamp(payload, Utc::now() - TimeDelta::minutes(minutes))
    }

    fn query(region: &str, category: Category, ignore_cache: bool) -> Query {
        Query {
            region: region.to_string(),
            filter: FilterBuilder::new(category).build().unwrap(),
            ignore_cache,
        }
    }

    /*----------------------------------------------------------------------------------
      Configuration
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_getter_and_setter_methods() {
        let client = ClientBuilder::default()
            .base_url("https://my-endpoints.example.com/")
            .cache_dir("./scratch/test_getter_and_setter_methods")
            .cache_time(60)
            .client_request_id(REQUEST_ID)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://my-endpoints.example.com");
        assert_eq!(
            client.store().cache_dir(),
            Path::new("./scratch/test_getter_and_setter_methods")
        );
        assert_eq!(client.cache_time(), 60);
        assert_eq!(client.client_request_id(), REQUEST_ID);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ClientBuilder::default()
            .base_url("not a url")
            .build_with(MemoryCacheStore::new(), FakeTransport::default());

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_client_request_id_is_a_v4_guid() {
        let id = new_client_request_id();

        assert_eq!(id.len(), 36);
        assert_eq!(
            id.split('-').map(str::len).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"));
        assert_ne!(id, new_client_request_id());
    }

    /*----------------------------------------------------------------------------------
      Endpoint Directory
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_get_directory_fetches_and_caches_on_miss() {
        let transport = FakeTransport::default().with(DIRECTORY_URL, DIRECTORY_JSON);
        let client = test_client(MemoryCacheStore::new(), transport);

        let directory = client.get_directory().inspect_err(log_error).unwrap();

        assert_eq!(directory.regions().collect::<Vec<_>>(), vec!["worldwide"]);
        assert_eq!(client.transport().requests(), vec![DIRECTORY_URL]);
        assert_eq!(
            client.store().get(DIRECTORY_CACHE_KEY).unwrap().payload,
            DIRECTORY_JSON
        );
    }

    #[test]
    fn test_get_directory_never_expires() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(60 * 24 * 30, DIRECTORY_JSON));
        let client = test_client(store, FakeTransport::default());

        let directory = client.get_directory().unwrap();

        assert_eq!(directory.len(), 1);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_get_directory_corrupted_cache_refetches() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, CacheEntry::new("{truncated"));
        let transport = FakeTransport::default().with(DIRECTORY_URL, DIRECTORY_JSON);
        let client = test_client(store, transport);

        client.get_directory().unwrap();

        assert_eq!(client.transport().requests(), vec![DIRECTORY_URL]);
        assert_eq!(
            client.store().get(DIRECTORY_CACHE_KEY).unwrap().payload,
            DIRECTORY_JSON
        );
    }

    #[test]
    fn test_get_directory_empty_response_is_not_cached() {
        let transport = FakeTransport::default().with(DIRECTORY_URL, "[]");
        let client = test_client(MemoryCacheStore::new(), transport);

        assert!(matches!(client.get_directory(), Err(Error::Parse { .. })));
        assert!(matches!(client.get_directory(), Err(Error::Parse { .. })));

        assert_eq!(
            client.transport().requests(),
            vec![DIRECTORY_URL, DIRECTORY_URL]
        );
        assert!(client.store().get(DIRECTORY_CACHE_KEY).is_none());
    }

    #[test]
    fn test_get_directory_empty_cache_refetches() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(60 * 24, "[]"));
        let transport = FakeTransport::default()
            .with(DIRECTORY_URL, DIRECTORY_JSON)
            .with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        let directory = client.get_directory().unwrap();
        let records = client
            .get_region_data(&directory, "worldwide", true)
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(client.transport().requests(), vec![DIRECTORY_URL, FEED_URL]);
        assert_eq!(
            client.store().get(DIRECTORY_CACHE_KEY).unwrap().payload,
            DIRECTORY_JSON
        );
    }

    #[test]
    fn test_get_directory_fetch_error() {
        let client = test_client(MemoryCacheStore::new(), FakeTransport::default());

        let result = client.get_directory();

        assert!(matches!(result, Err(Error::Fetch { .. })));
        assert!(client.store().is_empty());
    }

    #[test]
    fn test_get_directory_parse_error_is_not_cached() {
        let transport = FakeTransport::default().with(DIRECTORY_URL, "<html></html>");
        let client = test_client(MemoryCacheStore::new(), transport);

        assert!(matches!(client.get_directory(), Err(Error::Parse { .. })));
        assert!(client.store().is_empty());
    }

    /*----------------------------------------------------------------------------------
      Region Data
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_fresh_region_cache_is_used_without_fetching() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(30, FEED_JSON));
        let client = test_client(store, FakeTransport::default());

        let urls = client
            .get_items(&query("worldwide", Category::Urls, false))
            .unwrap();

        assert_eq!(urls, vec!["outlook.office.com", "*.msocdn.com"]);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_stale_region_cache_is_refreshed() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(90, OLD_FEED_JSON));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        let urls = client
            .get_items(&query("worldwide", Category::Urls, false))
            .unwrap();

        assert_eq!(urls, vec!["outlook.office.com", "*.msocdn.com"]);
        assert_eq!(client.transport().requests(), vec![FEED_URL]);

        let refreshed = client.store().get("worldwide-2024093000").unwrap();
        assert_eq!(refreshed.payload, FEED_JSON);
        assert!(refreshed.age() < TimeDelta::minutes(1));
    }

    #[test]
    fn test_ignore_cache_bypasses_fresh_region_cache() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(1, OLD_FEED_JSON));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        let ips = client
            .get_items(&query("worldwide", Category::Ips, true))
            .unwrap();

        assert_eq!(ips, vec!["13.107.6.152/31"]);
        assert_eq!(client.transport().requests(), vec![FEED_URL]);
        assert_eq!(
            client.store().get("worldwide-2024093000").unwrap().payload,
            FEED_JSON
        );
    }

    #[test]
    fn test_ignore_cache_still_uses_cached_directory() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(60 * 24, DIRECTORY_JSON));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        client
            .get_items(&query("worldwide", Category::Urls, true))
            .unwrap();

        assert_eq!(client.transport().requests(), vec![FEED_URL]);
    }

    #[test]
    fn test_new_version_invalidates_region_cache() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024080100", minutes_ago(1, OLD_FEED_JSON));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        let urls = client
            .get_items(&query("worldwide", Category::Urls, false))
            .unwrap();

        assert_eq!(urls, vec!["outlook.office.com", "*.msocdn.com"]);
        assert_eq!(client.transport().requests(), vec![FEED_URL]);
    }

    #[test]
    fn test_stale_region_cache_is_used_when_refresh_fails() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(90, OLD_FEED_JSON));
        let client = test_client(store, FakeTransport::default());

        let urls = client
            .get_items(&query("worldwide", Category::Urls, false))
            .unwrap();

        assert_eq!(urls, vec!["old.office.com"]);
        assert_eq!(client.transport().requests(), vec![FEED_URL]);
    }

    #[test]
    fn test_ignore_cache_fetch_error() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(1, OLD_FEED_JSON));
        let client = test_client(store, FakeTransport::default());

        let result = client.get_items(&query("worldwide", Category::Urls, true));

        assert!(matches!(result, Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_corrupted_region_cache_refetches() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        store.insert("worldwide-2024093000", minutes_ago(1, "[{\"id\": 1"));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        client
            .get_items(&query("worldwide", Category::Urls, false))
            .unwrap();

        assert_eq!(client.transport().requests(), vec![FEED_URL]);
    }

    #[test]
    fn test_malformed_feed_fails_fast() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        let feed = r#"[{"id": 1, "required": true}, {"id": 2, "urls": ["a.example.com"]}]"#;
        let transport = FakeTransport::default().with(FEED_URL, feed);
        let client = test_client(store, transport);

        let result = client.get_items(&query("worldwide", Category::Urls, false));

        assert!(matches!(result, Err(Error::Parse { .. })));
        assert!(client.store().get("worldwide-2024093000").is_none());
    }

    #[test]
    fn test_unknown_region_does_not_fetch_region_data() {
        let store = MemoryCacheStore::new();
        store.insert(DIRECTORY_CACHE_KEY, minutes_ago(5, DIRECTORY_JSON));
        let transport = FakeTransport::default().with(FEED_URL, FEED_JSON);
        let client = test_client(store, transport);

        let result = client.get_items(&query("atlantis", Category::Urls, false));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_full_pipeline_from_empty_cache() {
        let transport = FakeTransport::default()
            .with(DIRECTORY_URL, DIRECTORY_JSON)
            .with(FEED_URL, FEED_JSON);
        let client = test_client(MemoryCacheStore::new(), transport);

        let query = Query {
            region: "Worldwide".to_string(),
            filter: FilterBuilder::new(Category::Urls)
                .required_only()
                .build()
                .unwrap(),
            ignore_cache: false,
        };
        let urls = client.get_items(&query).unwrap();

        assert_eq!(urls, vec!["outlook.office.com"]);
        assert_eq!(client.transport().requests(), vec![DIRECTORY_URL, FEED_URL]);
        assert_eq!(client.store().len(), 2);
    }
}
