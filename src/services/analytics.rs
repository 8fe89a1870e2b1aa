// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! KPI, trend and top-N reports over a date range.
//!
//! Each report is one or two [`AggregateQuery`]s run on a blocking worker
//! thread against the shared store, then shaped into a response model.

use crate::db::{AggregateQuery, AggregateRow, Column, GroupKey, Measure, Order, VisitStore};
use crate::error::{AppError, Result};
use crate::models::visit::{ACTIVITY_CLASS, ACTIVITY_GYM_VISIT};
use crate::models::{
    ClassCount, DateRange, EquipmentCount, Freq, Kpis, TopClassesResponse, TopEquipmentResponse,
    TrendPoint, TrendResponse,
};
use crate::time_utils::round_to;
use std::sync::Arc;

/// Read-only reporting over a [`VisitStore`].
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn VisitStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    /// Run blocking store work off the async executor.
    async fn with_store<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn VisitStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || work(store.as_ref()))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Query task failed: {}", e)))?
    }

    /// Visit count, unique members, average duration, spend and busiest hour.
    pub async fn kpis(&self, range: DateRange) -> Result<Kpis> {
        let results = self
            .with_store(move |store| store.aggregate_many(&kpi_queries(range)))
            .await?;
        Ok(kpis_from_rows(range, &results))
    }

    /// Check-ins per day or per week, oldest bucket first.
    pub async fn checkin_trend(&self, range: DateRange, freq: Freq) -> Result<TrendResponse> {
        let rows = self
            .with_store(move |store| store.aggregate(&trend_query(range, freq)))
            .await?;

        let data = rows
            .iter()
            .filter_map(|row| {
                row.key_text().map(|bucket| TrendPoint {
                    bucket,
                    checkins: row.count(0),
                })
            })
            .collect();

        Ok(TrendResponse {
            start: range.start,
            end: range.end,
            freq,
            data,
        })
    }

    /// Most attended classes.
    pub async fn top_classes(&self, range: DateRange, limit: u32) -> Result<TopClassesResponse> {
        let rows = self
            .with_store(move |store| {
                store.aggregate(&top_query(range, ACTIVITY_CLASS, Column::ClassName, limit))
            })
            .await?;

        let data = rows
            .iter()
            .filter_map(|row| {
                row.key_text().map(|class_name| ClassCount {
                    class_name,
                    sessions: row.count(0),
                })
            })
            .collect();

        Ok(TopClassesResponse {
            start: range.start,
            end: range.end,
            data,
        })
    }

    /// Most used equipment during open gym visits.
    pub async fn top_equipment(
        &self,
        range: DateRange,
        limit: u32,
    ) -> Result<TopEquipmentResponse> {
        let rows = self
            .with_store(move |store| {
                store.aggregate(&top_query(
                    range,
                    ACTIVITY_GYM_VISIT,
                    Column::EquipmentUsed,
                    limit,
                ))
            })
            .await?;

        let data = rows
            .iter()
            .filter_map(|row| {
                row.key_text().map(|equipment| EquipmentCount {
                    equipment,
                    uses: row.count(0),
                })
            })
            .collect();

        Ok(TopEquipmentResponse {
            start: range.start,
            end: range.end,
            data,
        })
    }
}

/// Scalar totals, then the single busiest hour.
fn kpi_queries(range: DateRange) -> [AggregateQuery; 2] {
    [
        AggregateQuery::over(range)
            .measure(Measure::Count)
            .measure(Measure::CountDistinct(Column::MemberId))
            .measure(Measure::Avg(Column::DurationMin))
            .measure(Measure::Sum(Column::SpendCad)),
        AggregateQuery::over(range)
            .group_by(GroupKey::HourOfDay)
            .measure(Measure::Count)
            .order_by(Order::MeasureDesc(0))
            .limit(1),
    ]
}

fn kpis_from_rows(range: DateRange, results: &[Vec<AggregateRow>]) -> Kpis {
    let totals = results.first().and_then(|rows| rows.first());
    let busiest_hour = results
        .get(1)
        .and_then(|rows| rows.first())
        .and_then(AggregateRow::key_int)
        .and_then(|hour| u8::try_from(hour).ok());

    Kpis {
        start: range.start,
        end: range.end,
        total_visits: totals.map_or(0, |row| row.count(0)),
        unique_members: totals.map_or(0, |row| row.count(1)),
        avg_duration_min: round_to(totals.and_then(|row| row.real(2)).unwrap_or(0.0), 1),
        total_spend_cad: round_to(totals.and_then(|row| row.real(3)).unwrap_or(0.0), 2),
        busiest_hour,
    }
}

fn trend_query(range: DateRange, freq: Freq) -> AggregateQuery {
    let key = match freq {
        Freq::Day => GroupKey::Column(Column::Date),
        Freq::Week => GroupKey::WeekOfYear,
    };
    AggregateQuery::over(range)
        .group_by(key)
        .measure(Measure::Count)
        .order_by(Order::KeyAsc)
}

/// Count per non-empty `column` value among visits of `activity_type`.
fn top_query(range: DateRange, activity_type: &str, column: Column, limit: u32) -> AggregateQuery {
    AggregateQuery::over(range)
        .where_eq(Column::ActivityType, activity_type)
        .where_not_empty(column)
        .group_by(GroupKey::Column(column))
        .measure(Measure::Count)
        .order_by(Order::MeasureDesc(0))
        .limit(limit)
}
