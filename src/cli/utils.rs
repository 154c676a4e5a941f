/*-------------------------------------------------------------------------------------------------
  Utility Functions
-------------------------------------------------------------------------------------------------*/

/// Region identifiers are matched case-insensitively.
pub fn normalize_region(value: &str) -> String {
    value.trim().to_lowercase()
}
