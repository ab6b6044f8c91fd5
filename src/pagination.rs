//! This modules defines the common functionality for paging data.

use serde::Serialize;

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of records to return when a request does not set a limit.
    pub default_limit: u64,
    /// The most records a single request may ask for.
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve the requested `limit` and `offset`, applying defaults.
    ///
    /// # Errors
    /// Returns [Error::BadRequest] if `limit` is zero or larger than
    /// [PaginationConfig::max_limit].
    pub fn resolve(&self, limit: Option<u64>, offset: Option<u64>) -> Result<(u64, u64), Error> {
        let limit = limit.unwrap_or(self.default_limit);

        if limit == 0 || limit > self.max_limit {
            return Err(Error::BadRequest(format!(
                "limit must be between 1 and {}",
                self.max_limit
            )));
        }

        Ok((limit, offset.unwrap_or(0)))
    }
}

/// Describes the page of records in a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// The most records the page may contain.
    pub limit: u64,
    /// The number of records skipped before the page.
    pub offset: u64,
    /// The number of records matching the filters across all pages.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::PaginationConfig;

    #[test]
    fn defaults_apply_when_unset() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve(None, None), Ok((50, 0)));
    }

    #[test]
    fn explicit_values_are_kept() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve(Some(100), Some(20)), Ok((100, 20)));
    }

    #[test]
    fn limit_out_of_range_is_rejected() {
        let config = PaginationConfig::default();

        for limit in [0, 101] {
            assert!(matches!(
                config.resolve(Some(limit), None),
                Err(Error::BadRequest(_))
            ));
        }
    }
}
