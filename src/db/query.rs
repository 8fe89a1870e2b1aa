// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Declarative aggregate queries over the `visits` table.
//!
//! Every report endpoint is expressed as an [`AggregateQuery`]: a date range,
//! optional extra filters, an optional grouping key, one or more measures,
//! ordering and a limit. Rendering produces SQL text that only ever contains
//! fixed column names and positional placeholders; all caller-supplied values
//! travel as bind parameters.

use crate::db::VISITS_TABLE;
use crate::models::DateRange;
use crate::time_utils::DATE_FORMAT;
use rusqlite::types::Value;

/// Columns of `visits` that queries may filter, group or aggregate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    Date,
    Location,
    MemberId,
    MembershipTier,
    ActivityType,
    ClassName,
    EquipmentUsed,
    DurationMin,
    SpendCad,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Date => "date",
            Column::Location => "location",
            Column::MemberId => "member_id",
            Column::MembershipTier => "membership_tier",
            Column::ActivityType => "activity_type",
            Column::ClassName => "class_name",
            Column::EquipmentUsed => "equipment_used",
            Column::DurationMin => "duration_min",
            Column::SpendCad => "spend_cad",
        }
    }
}

/// What rows are grouped by. The rendered key is aliased `bucket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Column(Column),
    /// Hour of day (0-23) taken from `timestamp`
    HourOfDay,
    /// `YYYY-Www` from `date`, week-of-year as SQLite's `%W` numbers it
    /// (weeks start on Monday, days before the first Monday are week 00)
    WeekOfYear,
}

impl GroupKey {
    fn expr(self) -> String {
        match self {
            GroupKey::Column(col) => col.name().to_string(),
            GroupKey::HourOfDay => "CAST(strftime('%H', timestamp) AS INTEGER)".to_string(),
            GroupKey::WeekOfYear => "strftime('%Y-W%W', date)".to_string(),
        }
    }
}

/// Aggregate computed per group (or over the whole range when ungrouped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Count,
    CountDistinct(Column),
    /// NULL over zero rows
    Avg(Column),
    /// NULL over zero rows
    Sum(Column),
}

impl Measure {
    fn expr(self) -> String {
        match self {
            Measure::Count => "COUNT(*)".to_string(),
            Measure::CountDistinct(col) => format!("COUNT(DISTINCT {})", col.name()),
            Measure::Avg(col) => format!("AVG({})", col.name()),
            Measure::Sum(col) => format!("SUM({})", col.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    Equals(Column, String),
    NotEmpty(Column),
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending by group key
    KeyAsc,
    /// Descending by the measure at this index; ties keep store order
    MeasureDesc(usize),
}

/// A single parameterized aggregate query against `visits`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    range: DateRange,
    filters: Vec<Filter>,
    group_by: Option<GroupKey>,
    measures: Vec<Measure>,
    order: Option<Order>,
    limit: Option<u32>,
}

/// Rendered SQL plus its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl AggregateQuery {
    /// Start a query restricted to `date BETWEEN start AND end`.
    pub fn over(range: DateRange) -> Self {
        Self {
            range,
            filters: Vec::new(),
            group_by: None,
            measures: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn group_by(mut self, key: GroupKey) -> Self {
        self.group_by = Some(key);
        self
    }

    pub fn where_eq(mut self, column: Column, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Equals(column, value.into()));
        self
    }

    pub fn where_not_empty(mut self, column: Column) -> Self {
        self.filters.push(Filter::NotEmpty(column));
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_grouped(&self) -> bool {
        self.group_by.is_some()
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    /// Render to SQL with `?N` placeholders.
    pub fn to_sql(&self) -> SqlStatement {
        let mut params: Vec<Value> = vec![
            Value::Text(self.range.start.format(DATE_FORMAT).to_string()),
            Value::Text(self.range.end.format(DATE_FORMAT).to_string()),
        ];

        let mut select = Vec::with_capacity(self.measures.len() + 1);
        if let Some(key) = self.group_by {
            select.push(format!("{} AS bucket", key.expr()));
        }
        for (i, measure) in self.measures.iter().enumerate() {
            select.push(format!("{} AS m{}", measure.expr(), i));
        }

        let mut conditions = vec![format!("{} BETWEEN ?1 AND ?2", Column::Date.name())];
        for filter in &self.filters {
            match filter {
                Filter::Equals(col, value) => {
                    params.push(Value::Text(value.clone()));
                    conditions.push(format!("{} = ?{}", col.name(), params.len()));
                }
                Filter::NotEmpty(col) => {
                    conditions.push(format!("{} != ''", col.name()));
                }
            }
        }

        let mut sql = format!(
            "SELECT {} FROM {} WHERE {}",
            select.join(", "),
            VISITS_TABLE,
            conditions.join(" AND ")
        );

        if self.group_by.is_some() {
            sql.push_str(" GROUP BY bucket");
        }

        match self.order {
            Some(Order::KeyAsc) if self.group_by.is_some() => sql.push_str(" ORDER BY bucket ASC"),
            Some(Order::MeasureDesc(i)) if i < self.measures.len() => {
                sql.push_str(&format!(" ORDER BY m{} DESC", i));
            }
            _ => {}
        }

        if let Some(limit) = self.limit {
            params.push(Value::Integer(i64::from(limit)));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        SqlStatement { sql, params }
    }
}

/// One result row: the group key (if grouped) and one value per measure.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: Option<Value>,
    pub measures: Vec<Value>,
}

impl AggregateRow {
    /// Integer measure, 0 when NULL or absent.
    pub fn count(&self, index: usize) -> i64 {
        match self.measures.get(index) {
            Some(Value::Integer(n)) => *n,
            Some(Value::Real(r)) => *r as i64,
            _ => 0,
        }
    }

    /// Numeric measure, `None` when NULL (e.g. AVG over zero rows).
    pub fn real(&self, index: usize) -> Option<f64> {
        match self.measures.get(index) {
            Some(Value::Real(r)) => Some(*r),
            Some(Value::Integer(n)) => Some(*n as f64),
            _ => None,
        }
    }

    /// Group key rendered as text.
    pub fn key_text(&self) -> Option<String> {
        match &self.key {
            Some(Value::Text(s)) => Some(s.clone()),
            Some(Value::Integer(n)) => Some(n.to_string()),
            Some(Value::Real(r)) => Some(r.to_string()),
            _ => None,
        }
    }

    /// Group key as an integer.
    pub fn key_int(&self) -> Option<i64> {
        match &self.key {
            Some(Value::Integer(n)) => Some(*n),
            Some(Value::Text(s)) => s.parse().ok(),
            _ => None,
        }
    }
}
