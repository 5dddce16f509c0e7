//! Pagination and ordering primitives shared by every record store.

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 50;

/// Normalized pagination and ordering for a list request.
///
/// Page numbers below 1 clamp to 1; per-page falls back to
/// [`DEFAULT_PER_PAGE`] and caps at [`MAX_PER_PAGE`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPagination {
    pub page: i64,
    pub per_page: i64,
    pub keyword: Option<String>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl SearchPagination {
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        keyword: Option<String>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let keyword = keyword.filter(|k| !k.trim().is_empty());

        Self {
            page,
            per_page,
            keyword,
            sort_key: SortKey::parse(sort_by),
            direction: SortDirection::parse(order),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// `ORDER BY` fragment built only from the entity's whitelisted
    /// column names.
    pub fn order_by(&self, columns: SortColumns) -> String {
        format!("{} {}", columns.resolve(self.sort_key), self.direction.as_sql())
    }
}

impl Default for SearchPagination {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

/// Logical sort keys accepted from clients, mapped to physical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Price,
    Rating,
    Amount,
}

impl SortKey {
    /// Unknown or absent keys fall back to the creation-date column.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("date") => SortKey::Date,
            Some("price") => SortKey::Price,
            Some("rate") | Some("rating") => SortKey::Rating,
            Some("amount") => SortKey::Amount,
            _ => SortKey::Date,
        }
    }
}

/// Physical sort columns of one entity. A sort key the entity has no
/// column for falls back to the creation-date column.
#[derive(Debug, Clone, Copy)]
pub struct SortColumns {
    pub date: &'static str,
    pub price: Option<&'static str>,
    pub rating: Option<&'static str>,
    pub amount: Option<&'static str>,
}

impl SortColumns {
    pub fn resolve(&self, key: SortKey) -> &'static str {
        match key {
            SortKey::Date => self.date,
            SortKey::Price => self.price.unwrap_or(self.date),
            SortKey::Rating => self.rating.unwrap_or(self.date),
            SortKey::Amount => self.amount.unwrap_or(self.date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Anything other than an exact "DESC" sorts ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("DESC") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// One page of rows plus the counts the response envelope needs.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        total_pages(self.total_count, self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// `ceil(total_count / per_page)`, zero when there are no records.
pub fn total_pages(total_count: i64, per_page: i64) -> i64 {
    if total_count <= 0 || per_page <= 0 {
        return 0;
    }
    (total_count + per_page - 1) / per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_below_one_clamps_to_one() {
        let p = SearchPagination::new(Some(0), None, None, None, None);
        assert_eq!(p.page, 1);
        let p = SearchPagination::new(Some(-3), None, None, None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn per_page_defaults_and_caps() {
        let p = SearchPagination::new(None, None, None, None, None);
        assert_eq!(p.per_page, DEFAULT_PER_PAGE);
        let p = SearchPagination::new(None, Some(500), None, None, None);
        assert_eq!(p.per_page, MAX_PER_PAGE);
        let p = SearchPagination::new(None, Some(0), None, None, None);
        assert_eq!(p.per_page, 1);
    }

    #[test]
    fn offset_is_zero_based() {
        let p = SearchPagination::new(Some(3), Some(10), None, None, None);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn page_flags_follow_counts() {
        let page: Page<i32> = Page {
            rows: vec![],
            total_count: 23,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(!page.has_previous());

        let last: Page<i32> = Page {
            rows: vec![],
            total_count: 23,
            page: 3,
            per_page: 10,
        };
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn sort_key_whitelist() {
        assert_eq!(SortKey::parse(Some("date")), SortKey::Date);
        assert_eq!(SortKey::parse(Some("price")), SortKey::Price);
        assert_eq!(SortKey::parse(Some("rate")), SortKey::Rating);
        assert_eq!(SortKey::parse(Some("amount")), SortKey::Amount);
        assert_eq!(SortKey::parse(Some("'); DROP TABLE payment;--")), SortKey::Date);
        assert_eq!(SortKey::parse(None), SortKey::Date);
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Descending);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Ascending);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Ascending);
        assert_eq!(SortDirection::parse(None), SortDirection::Ascending);
    }

    #[test]
    fn blank_keyword_is_dropped() {
        let p = SearchPagination::new(None, None, Some("   ".to_string()), None, None);
        assert_eq!(p.keyword, None);
        let p = SearchPagination::new(None, None, Some("great".to_string()), None, None);
        assert_eq!(p.keyword.as_deref(), Some("great"));
    }

    #[test]
    fn order_by_uses_physical_columns() {
        let revenue = SortColumns {
            date: "created_at",
            price: None,
            rating: None,
            amount: Some("total_amount"),
        };
        let p = SearchPagination::new(None, None, None, Some("amount"), Some("DESC"));
        assert_eq!(p.order_by(revenue), "total_amount DESC");
        let p = SearchPagination::default();
        assert_eq!(p.order_by(revenue), "created_at ASC");
    }

    #[test]
    fn inapplicable_sort_key_falls_back_to_date_column() {
        let feedback = SortColumns {
            date: "created_at",
            price: None,
            rating: Some("rating"),
            amount: None,
        };
        // "amount" is whitelisted globally but the feedback table has no
        // such column, so it must not reach the ORDER BY clause.
        let p = SearchPagination::new(None, None, None, Some("amount"), None);
        assert_eq!(p.order_by(feedback), "created_at ASC");
        let p = SearchPagination::new(None, None, None, Some("rating"), None);
        assert_eq!(p.order_by(feedback), "rating ASC");
    }
}
