// Application layer - Aggregation engine and the use cases built on it
pub mod bucketizer;
pub mod clock;
pub mod derived_metrics;
pub mod heatmap;
pub mod period_generator;
pub mod report_service;
pub mod rollup;
pub mod run_rate;
pub mod sample_repository;
