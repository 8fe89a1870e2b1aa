// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod report;
pub mod visit;

pub use report::{
    ClassCount, DateRange, EquipmentCount, Freq, Kpis, TopClassesResponse, TopEquipmentResponse,
    TrendPoint, TrendResponse,
};
pub use visit::{RawVisit, Visit, VISIT_COLUMNS};
