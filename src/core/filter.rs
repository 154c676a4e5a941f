use crate::core::category::Category;
use crate::core::errors::{Error, Result};
use crate::core::prefix_type::PrefixType;
use crate::core::service_record::ServiceRecord;
use log::trace;
use std::collections::HashSet;

/*-------------------------------------------------------------------------------------------------
  Extract
-------------------------------------------------------------------------------------------------*/

/// Collect the URL patterns or IP prefixes of `records`, in feed order, skipping records that
/// are not required when `required_only` is set. Each item is emitted once, at its first
/// occurrence; items are otherwise passed through untouched.
pub fn extract(records: &[ServiceRecord], category: Category, required_only: bool) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();

    for record in records {
        if required_only && !record.required {
            trace!("Skipping optional service record {}", record.id);
            continue;
        }

        let values = match category {
            Category::Urls => &record.urls,
            Category::Ips => &record.ips,
        };

        for value in values {
            if seen.insert(value.as_str()) {
                items.push(value.clone());
            }
        }
    }

    items
}

/*-------------------------------------------------------------------------------------------------
  FilterBuilder
-------------------------------------------------------------------------------------------------*/

/// Builder used to construct a [Filter] object with the desired filter parameters.
#[derive(Debug)]
pub struct FilterBuilder {
    category: Category,
    required_only: bool,
    prefix_type: Option<PrefixType>,
}

/*--------------------------------------------------------------------------------------
  Filter Builder Implementation
--------------------------------------------------------------------------------------*/

impl FilterBuilder {
    /// Create a new [FilterBuilder] extracting `category`. By default every record is
    /// included and IP prefixes of both families are kept.
    ///
    /// ```rust
    /// # fn main() -> msendpoints::Result<()> {
    /// let filter = msendpoints::FilterBuilder::new(msendpoints::Category::Ips)
    ///     .required_only()
    ///     .ipv4()
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(category: Category) -> Self {
        Self {
            category,
            required_only: false,
            prefix_type: None,
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Only include items from records marked as required.
    pub fn required_only(mut self) -> Self {
        self.required_only = true;
        self
    }

    /// Include IPv4 prefixes.
    pub fn ipv4(mut self) -> Self {
        self.prefix_type = match self.prefix_type {
            None => Some(PrefixType::IPv4),
            Some(PrefixType::IPv4) => Some(PrefixType::IPv4),

            // Include both IPv4 and IPv6 by removing the filter
            Some(PrefixType::IPv6) => None,
        };
        self
    }

    /// Include IPv6 prefixes.
    pub fn ipv6(mut self) -> Self {
        self.prefix_type = match self.prefix_type {
            None => Some(PrefixType::IPv6),
            Some(PrefixType::IPv6) => Some(PrefixType::IPv6),

            // Include both IPv4 and IPv6 by removing the filter
            Some(PrefixType::IPv4) => None,
        };
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [Filter]. An IP family restriction only makes sense for the `ips` category.
    pub fn build(self) -> Result<Filter> {
        if self.category == Category::Urls && self.prefix_type.is_some() {
            return Err(Error::Validation(
                "--ipv4/--ipv6 only apply to the `ips` category".to_string(),
            ));
        }

        Ok(Filter {
            category: self.category,
            required_only: self.required_only,
            prefix_type: self.prefix_type,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Filter
-------------------------------------------------------------------------------------------------*/

/// Selects which items of a region feed are emitted. Use the [FilterBuilder] to construct a
/// [Filter] object with the desired filter parameters.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Filter {
    category: Category,
    required_only: bool,
    prefix_type: Option<PrefixType>,
}

/*--------------------------------------------------------------------------------------
  Filter Implementation
--------------------------------------------------------------------------------------*/

impl Filter {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn required_only(&self) -> bool {
        self.required_only
    }

    pub fn prefix_type(&self) -> Option<PrefixType> {
        self.prefix_type
    }

    /*-------------------------------------------------------------------------
      Filter Functions
    -------------------------------------------------------------------------*/

    /// Extract the matching items from `records`.
    pub fn apply(&self, records: &[ServiceRecord]) -> Result<Vec<String>> {
        let items = extract(records, self.category, self.required_only);

        match self.prefix_type {
            None => Ok(items),
            Some(prefix_type) => {
                let mut matching = Vec::with_capacity(items.len());
                for item in items {
                    if prefix_type.matches(&item)? {
                        matching.push(item);
                    }
                }
                Ok(matching)
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
