use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

impl PageQuery {
    /// Checks bounds and returns the row offset. The offset is computed
    /// with checked arithmetic so extreme but parseable parameters fail as
    /// validation errors instead of overflowing.
    pub fn validate(&self) -> Result<i64, ApiError> {
        if self.page < 1 || self.limit < 1 {
            return Err(ApiError::Validation(
                "page and limit must be positive".into(),
            ));
        }
        (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| ApiError::Validation("page out of range".into()))
    }
}

/// Ceiling of `count / limit`, written without an addition so it cannot
/// overflow for any positive `limit`.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    count / limit + (count % limit != 0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_the_ceiling_of_count_over_limit() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(9, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 5), 5);
    }

    #[test]
    fn validate_yields_the_row_offset() {
        let q = PageQuery { page: 1, limit: 10 };
        assert_eq!(q.validate().unwrap(), 0);
        let q = PageQuery { page: 3, limit: 10 };
        assert_eq!(q.validate().unwrap(), 20);
    }

    #[test]
    fn validate_rejects_non_positive_parameters() {
        let q = PageQuery { page: 0, limit: 10 };
        assert!(q.validate().is_err());
        let q = PageQuery { page: 1, limit: 0 };
        assert!(q.validate().is_err());
        let q = PageQuery { page: -1, limit: -5 };
        assert!(q.validate().is_err());
    }

    #[test]
    fn extreme_parameters_fail_as_validation_not_overflow() {
        assert_eq!(total_pages(2, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);

        let q = PageQuery {
            page: i64::MAX,
            limit: 10,
        };
        assert!(matches!(q.validate(), Err(ApiError::Validation(_))));

        let q = PageQuery {
            page: 1,
            limit: i64::MAX,
        };
        assert_eq!(q.validate().unwrap(), 0);
    }
}
