//! Offset/limit windowing over ordered collections, plus the advisory
//! `x-next` locator every list response carries.

use serde::Deserialize;
use validator::Validate;

use crate::errors::ApiError;

pub const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for list operations. Out-of-range values fail before
/// any query executes.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ListArgs {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListArgs {
    /// Validate ranges, returning the args unchanged when in bounds.
    pub fn checked(self) -> Result<Self, ApiError> {
        self.validate()?;
        Ok(self)
    }

    pub fn limit(&self) -> u64 {
        self.limit as u64
    }

    pub fn offset(&self) -> u64 {
        self.offset as u64
    }

    /// Locator for the next page: same endpoint, offset advanced by limit.
    /// Advisory only; emitted even on the last page.
    pub fn next_locator(&self, path: &str) -> String {
        format!(
            "{}?offset={}&limit={}",
            path,
            self.offset + self.limit,
            self.limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_limit_100_offset_0() {
        let args: ListArgs = serde_json::from_str("{}").unwrap();
        assert_eq!(args.limit, 100);
        assert_eq!(args.offset, 0);
        assert!(args.checked().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let args = ListArgs {
            limit: 0,
            offset: 0,
        };
        assert!(args.checked().is_err());

        let args = ListArgs {
            limit: 101,
            offset: 0,
        };
        assert!(args.checked().is_err());

        let args = ListArgs {
            limit: 10,
            offset: -1,
        };
        assert!(args.checked().is_err());
    }

    #[test]
    fn next_locator_advances_offset_and_keeps_limit() {
        let args = ListArgs {
            limit: 3,
            offset: 1,
        };
        assert_eq!(
            args.next_locator("/api/categories"),
            "/api/categories?offset=4&limit=3"
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn validity_matches_the_documented_ranges(
                limit in -5i64..210,
                offset in -5i64..210,
            ) {
                let ok = ListArgs { limit, offset }.checked().is_ok();
                prop_assert_eq!(ok, (1..=100).contains(&limit) && offset >= 0);
            }

            #[test]
            fn locator_always_advances_by_exactly_one_window(
                limit in 1i64..=100,
                offset in 0i64..10_000,
            ) {
                let args = ListArgs { limit, offset };
                prop_assert_eq!(
                    args.next_locator("/api/products"),
                    format!("/api/products?offset={}&limit={}", offset + limit, limit)
                );
            }
        }
    }
}
