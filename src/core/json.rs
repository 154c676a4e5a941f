use crate::core::errors::{Error, Result};
use serde::{de, Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse the endpoint directory (`/version`) document. A directory without any region is
/// rejected; it could never resolve a region and would otherwise be cached for good.
pub fn parse_directory(json: &str) -> Result<Vec<JsonDirectoryEntry>> {
    let parse_error = |source| Error::Parse {
        what: "endpoint directory".to_string(),
        source,
    };

    let entries: Vec<JsonDirectoryEntry> = serde_json::from_str(json).map_err(parse_error)?;
    if entries.is_empty() {
        return Err(parse_error(<serde_json::Error as de::Error>::invalid_length(
            0,
            &"at least one region",
        )));
    }

    Ok(entries)
}

/// Parse a region feed (`/endpoints/{instance}`) document. Unknown fields are ignored; a record
/// missing `id` or `required`, or carrying a field of the wrong type, fails the whole feed.
pub fn parse_feed(json: &str) -> Result<Vec<JsonServiceRecord>> {
    serde_json::from_str(json).map_err(|source| Error::Parse {
        what: "region feed".to_string(),
        source,
    })
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  JSON Directory Entry
--------------------------------------------------------------------------------------*/

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonDirectoryEntry {
    pub instance: String,
    pub latest: String,
}

/*--------------------------------------------------------------------------------------
  JSON Service Record
--------------------------------------------------------------------------------------*/

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonServiceRecord {
    pub id: u64,
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<String>>,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
