use crate::core::errors::Result;
use crate::core::json::{self, JsonServiceRecord};

/*-------------------------------------------------------------------------------------------------
  Service Record
-------------------------------------------------------------------------------------------------*/

/// One entry of a region feed: a logical service's URL patterns and IP prefixes, and whether
/// allowing its traffic is required.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServiceRecord {
    pub id: u64,

    /// Marks the service as mandatory to allow, as opposed to optional.
    pub required: bool,

    /// URL patterns, verbatim from the feed (may contain wildcards).
    pub urls: Vec<String>,

    /// IPv4 and IPv6 network prefixes, verbatim and in feed order.
    pub ips: Vec<String>,
}

impl From<JsonServiceRecord> for ServiceRecord {
    fn from(value: JsonServiceRecord) -> Self {
        Self {
            id: value.id,
            required: value.required,
            urls: value.urls.unwrap_or_default(),
            ips: value.ips.unwrap_or_default(),
        }
    }
}

/// Parse a region feed into service records, preserving feed order.
pub fn from_json(json: &str) -> Result<Vec<ServiceRecord>> {
    Ok(json::parse_feed(json)?
        .into_iter()
        .map(ServiceRecord::from)
        .collect())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
