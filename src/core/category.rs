use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Category
-------------------------------------------------------------------------------------------------*/

/// Which list to extract from each service record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Category {
    Urls,
    Ips,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Urls => write!(f, "urls"),
            Category::Ips => write!(f, "ips"),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
