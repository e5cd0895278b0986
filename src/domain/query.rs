//! Filtering, sorting and pagination for carrier listings.
//!
//! [`QueryParser`] turns raw query-string parameters into a [`CarrierQuery`]
//! that repositories execute. Only whitelisted [`CarrierField`]s can be
//! referenced, so the result is safe to translate into SQL.
//!
//! # Syntax
//!
//! ```text
//! ?page=2&page_size=20&filter=name:like:ups,transit_days:lte:3&sort=-base_fee_cents,name
//! ```
//!
//! - `filter` - comma-separated `field:op:value` conditions, all of which must hold
//! - `sort` - comma-separated fields, `-` prefix for descending
//!
//! Every problem is collected before failing, so a single response reports all
//! malformed parameters.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::FieldErrors;

/// Carrier attributes that can be filtered and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierField {
    Id,
    Name,
    Code,
    BaseFeeCents,
    PerKgCents,
    DimDivisor,
    Currency,
    TransitDays,
    CreatedAt,
    UpdatedAt,
}

/// Value type of a [`CarrierField`], used to parse filter operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Timestamp,
}

impl CarrierField {
    pub const ALL: [CarrierField; 10] = [
        CarrierField::Id,
        CarrierField::Name,
        CarrierField::Code,
        CarrierField::BaseFeeCents,
        CarrierField::PerKgCents,
        CarrierField::DimDivisor,
        CarrierField::Currency,
        CarrierField::TransitDays,
        CarrierField::CreatedAt,
        CarrierField::UpdatedAt,
    ];

    /// Column name, identical to the wire name of the field.
    pub fn column(self) -> &'static str {
        match self {
            CarrierField::Id => "id",
            CarrierField::Name => "name",
            CarrierField::Code => "code",
            CarrierField::BaseFeeCents => "base_fee_cents",
            CarrierField::PerKgCents => "per_kg_cents",
            CarrierField::DimDivisor => "dim_divisor",
            CarrierField::Currency => "currency",
            CarrierField::TransitDays => "transit_days",
            CarrierField::CreatedAt => "created_at",
            CarrierField::UpdatedAt => "updated_at",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            CarrierField::Id
            | CarrierField::BaseFeeCents
            | CarrierField::PerKgCents
            | CarrierField::DimDivisor
            | CarrierField::TransitDays => FieldKind::Integer,
            CarrierField::Name | CarrierField::Code | CarrierField::Currency => FieldKind::Text,
            CarrierField::CreatedAt | CarrierField::UpdatedAt => FieldKind::Timestamp,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Case-insensitive substring match. Text fields only.
    Like,
}

impl FilterOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "like" => Some(FilterOp::Like),
            _ => None,
        }
    }

    /// SQL operator. `Like` maps to `ILIKE`.
    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Like => "ILIKE",
        }
    }
}

/// Typed filter operand.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: CarrierField,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: CarrierField,
    pub direction: SortDirection,
}

/// A parsed listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierQuery {
    pub filters: Vec<Filter>,
    /// Requested ordering. Repositories append `id ASC` as a tiebreak.
    pub sort: Vec<Sort>,
    pub page: u32,
    pub page_size: u32,
}

impl CarrierQuery {
    /// Unfiltered first page with default ordering.
    pub fn first_page(page_size: u32) -> Self {
        Self {
            filters: Vec::new(),
            sort: Vec::new(),
            page: 1,
            page_size,
        }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 || self.total <= 0 {
            return 0;
        }
        let total = u64::try_from(self.total).unwrap_or(0);
        u32::try_from(total.div_ceil(u64::from(self.page_size))).unwrap_or(u32::MAX)
    }
}

/// Malformed listing parameters, with the offending parameters listed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct QueryParseError {
    pub message: String,
    pub fields: FieldErrors,
}

/// Parser for listing parameters with configurable page sizes.
#[derive(Debug, Clone, Copy)]
pub struct QueryParser {
    default_page_size: u32,
    max_page_size: u32,
}

impl QueryParser {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Parses raw query parameters. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`QueryParseError`] listing every malformed parameter.
    pub fn parse(&self, params: &HashMap<String, String>) -> Result<CarrierQuery, QueryParseError> {
        let mut fields = FieldErrors::new();

        let page = match params.get("page") {
            None => 1,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(page) if page > 0 => page,
                _ => {
                    push(&mut fields, "page", "Page must be a positive integer");
                    1
                }
            },
        };

        let page_size = match params.get("page_size") {
            None => self.default_page_size,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if (1..=self.max_page_size).contains(&size) => size,
                _ => {
                    push(
                        &mut fields,
                        "page_size",
                        &format!("Page size must be between 1 and {}", self.max_page_size),
                    );
                    self.default_page_size
                }
            },
        };

        let filters = params
            .get("filter")
            .map(|raw| parse_filters(raw, &mut fields))
            .unwrap_or_default();

        let sort = params
            .get("sort")
            .map(|raw| parse_sort(raw, &mut fields))
            .unwrap_or_default();

        if !fields.is_empty() {
            return Err(QueryParseError {
                message: "Invalid query parameters".to_string(),
                fields,
            });
        }

        Ok(CarrierQuery {
            filters,
            sort,
            page,
            page_size,
        })
    }
}

fn push(fields: &mut FieldErrors, key: &str, message: &str) {
    fields
        .entry(key.to_string())
        .or_default()
        .push(message.to_string());
}

fn parse_filters(raw: &str, fields: &mut FieldErrors) -> Vec<Filter> {
    let mut filters = Vec::new();

    for condition in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let mut parts = condition.splitn(3, ':');
        let (Some(name), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
            push(
                fields,
                "filter",
                &format!("`{condition}` must have the form field:op:value"),
            );
            continue;
        };

        let Some(field) = CarrierField::parse(name) else {
            push(fields, "filter", &format!("Unknown field `{name}`"));
            continue;
        };

        let Some(op) = FilterOp::parse(op) else {
            push(fields, "filter", &format!("Unknown operator `{op}`"));
            continue;
        };

        if op == FilterOp::Like && field.kind() != FieldKind::Text {
            push(
                fields,
                "filter",
                &format!("Operator `like` is not supported for `{name}`"),
            );
            continue;
        }

        let parsed = match field.kind() {
            FieldKind::Integer => value.parse::<i64>().ok().map(FilterValue::Integer),
            FieldKind::Text => Some(FilterValue::Text(value.to_string())),
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| FilterValue::Timestamp(dt.with_timezone(&Utc))),
        };

        match parsed {
            Some(value) => filters.push(Filter { field, op, value }),
            None => push(
                fields,
                "filter",
                &format!("Invalid value `{value}` for `{name}`"),
            ),
        }
    }

    filters
}

fn parse_sort(raw: &str, fields: &mut FieldErrors) -> Vec<Sort> {
    let mut sort = Vec::new();

    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, direction) = match item.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (item, SortDirection::Asc),
        };

        match CarrierField::parse(name) {
            Some(field) => sort.push(Sort { field, direction }),
            None => push(fields, "sort", &format!("Unknown field `{name}`")),
        }
    }

    sort
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> QueryParser {
        QueryParser::new(10, 100)
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let query = parser().parse(&HashMap::new()).unwrap();

        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert!(query.filters.is_empty());
        assert!(query.sort.is_empty());
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_page_and_size() {
        let query = parser()
            .parse(&params(&[("page", "3"), ("page_size", "25")]))
            .unwrap();

        assert_eq!(query.offset(), 50);
        assert_eq!(query.limit(), 25);
    }

    #[test]
    fn test_page_zero_is_error() {
        let err = parser().parse(&params(&[("page", "0")])).unwrap_err();
        assert!(err.fields.contains_key("page"));
    }

    #[test]
    fn test_page_size_above_max_is_error() {
        let err = parser().parse(&params(&[("page_size", "101")])).unwrap_err();
        assert!(err.fields.contains_key("page_size"));
    }

    #[test]
    fn test_filters_are_typed() {
        let query = parser()
            .parse(&params(&[(
                "filter",
                "name:like:ups, transit_days:lte:3,created_at:gte:2026-01-01T00:00:00Z",
            )]))
            .unwrap();

        assert_eq!(query.filters.len(), 3);
        assert_eq!(
            query.filters[0],
            Filter {
                field: CarrierField::Name,
                op: FilterOp::Like,
                value: FilterValue::Text("ups".to_string()),
            }
        );
        assert_eq!(query.filters[1].value, FilterValue::Integer(3));
        assert!(matches!(query.filters[2].value, FilterValue::Timestamp(_)));
    }

    #[test]
    fn test_filter_value_may_contain_colons() {
        let query = parser()
            .parse(&params(&[("filter", "name:eq:a:b")]))
            .unwrap();

        assert_eq!(query.filters[0].value, FilterValue::Text("a:b".to_string()));
    }

    #[test]
    fn test_malformed_filter_reports_field() {
        let err = parser()
            .parse(&params(&[("filter", "name=ups")]))
            .unwrap_err();

        assert_eq!(err.message, "Invalid query parameters");
        assert_eq!(err.fields["filter"].len(), 1);
    }

    #[test]
    fn test_unknown_field_and_operator() {
        let err = parser()
            .parse(&params(&[("filter", "color:eq:red,name:approx:ups")]))
            .unwrap_err();

        assert_eq!(err.fields["filter"].len(), 2);
    }

    #[test]
    fn test_like_on_integer_is_error() {
        let err = parser()
            .parse(&params(&[("filter", "transit_days:like:3")]))
            .unwrap_err();
        assert!(err.fields.contains_key("filter"));
    }

    #[test]
    fn test_non_numeric_integer_value_is_error() {
        let err = parser()
            .parse(&params(&[("filter", "base_fee_cents:gt:cheap")]))
            .unwrap_err();
        assert!(err.fields["filter"][0].contains("cheap"));
    }

    #[test]
    fn test_sort_directions() {
        let query = parser()
            .parse(&params(&[("sort", "-base_fee_cents,name")]))
            .unwrap();

        assert_eq!(
            query.sort,
            vec![
                Sort {
                    field: CarrierField::BaseFeeCents,
                    direction: SortDirection::Desc,
                },
                Sort {
                    field: CarrierField::Name,
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn test_all_errors_collected() {
        let err = parser()
            .parse(&params(&[
                ("page", "abc"),
                ("filter", "bogus"),
                ("sort", "-nope"),
            ]))
            .unwrap_err();

        assert!(err.fields.contains_key("page"));
        assert!(err.fields.contains_key("filter"));
        assert!(err.fields.contains_key("sort"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        assert!(parser().parse(&params(&[("utm_source", "x")])).is_ok());
    }

    #[test]
    fn test_total_pages() {
        let page: Page<i32> = Page {
            items: vec![],
            total: 21,
            page: 1,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let empty: Page<i32> = Page {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(empty.total_pages(), 0);
    }
}
