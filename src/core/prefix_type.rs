use crate::core::errors::{Error, Result};
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Prefix Type
-------------------------------------------------------------------------------------------------*/

/// IP prefix type (IPv4 or IPv6) used to restrict the extracted IP prefixes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PrefixType {
    IPv4,
    IPv6,
}

impl PrefixType {
    pub fn is_ipv4(&self) -> bool {
        match self {
            PrefixType::IPv4 => true,
            PrefixType::IPv6 => false,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            PrefixType::IPv4 => false,
            PrefixType::IPv6 => true,
        }
    }

    /// Check whether a feed prefix belongs to this family. The prefix is only parsed to find
    /// its family; callers keep emitting the original text.
    pub fn matches(&self, prefix: &str) -> Result<bool> {
        let network: IpNetwork = prefix.parse().map_err(|error: ipnetwork::IpNetworkError| {
            Error::Prefix {
                prefix: prefix.to_string(),
                reason: error.to_string(),
            }
        })?;

        Ok(if network.is_ipv4() {
            self.is_ipv4()
        } else {
            self.is_ipv6()
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
