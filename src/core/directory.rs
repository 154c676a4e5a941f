use crate::core::errors::{Error, Result};
use crate::core::json;
use log::warn;
use std::collections::BTreeMap;

/*-------------------------------------------------------------------------------------------------
  Directory Entry
-------------------------------------------------------------------------------------------------*/

/// Where a region's feed lives and which version of it is current.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectoryEntry {
    /// Lower-cased region identifier, e.g. `worldwide`.
    pub region: String,

    /// Region name as published upstream, e.g. `Worldwide`.
    pub instance: String,

    pub feed_url: String,
    pub version: String,
}

impl DirectoryEntry {
    /// Key under which this region's data is cached; a new upstream version gets a new key.
    pub fn cache_key(&self) -> String {
        format!("{}-{}", self.region, self.version)
    }
}

/*-------------------------------------------------------------------------------------------------
  Endpoint Directory
-------------------------------------------------------------------------------------------------*/

/// Mapping of region identifiers to their feed URL and version.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EndpointDirectory {
    entries: BTreeMap<String, DirectoryEntry>,
}

impl EndpointDirectory {
    /// Build the directory from the upstream `/version` document. Feed URLs are resolved
    /// against `base_url`.
    pub fn from_json(json: &str, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let mut entries = BTreeMap::new();

        for json_entry in json::parse_directory(json)? {
            let region = json_entry.instance.to_lowercase();
            if entries.contains_key(&region) {
                warn!("Duplicate region {:?} in endpoint directory; keeping the first", region);
                continue;
            }

            let entry = DirectoryEntry {
                feed_url: format!("{base_url}/endpoints/{}", json_entry.instance),
                region: region.clone(),
                instance: json_entry.instance,
                version: json_entry.latest,
            };
            entries.insert(region, entry);
        }

        Ok(Self { entries })
    }

    /// Region identifiers, sorted.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, region: &str) -> Option<&DirectoryEntry> {
        self.entries.get(&region.to_lowercase())
    }

    /// Look up a region, failing with [Error::Validation] listing the valid choices.
    pub fn lookup(&self, region: &str) -> Result<&DirectoryEntry> {
        self.get(region).ok_or_else(|| {
            Error::Validation(format!(
                "Unknown region {:?}; choose one of: {}",
                region,
                self.regions().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
