//! Dashboard summaries and their read cache.
//!
//! This module provides:
//! - Daily position roll-up across an agent set
//! - Scoped and global summary types
//! - Weekly and monthly activity windows and the agent performance report
//! - A time-expiring cache keyed by scope

pub mod cache;
pub mod types;

pub use cache::{DashboardCache, DashboardKey};
pub use types::{
    AgentCommissionTotal, AgentPerformance, DailyPosition, DayRecord, GlobalSummary,
    PerformanceReport, PeriodStats, RecentTransaction, ScopeSummary, StatsWindow,
};
