// Time-bucketed KPI aggregation engine and its HTTP service
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
