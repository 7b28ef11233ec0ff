// Domain layer - Plain data types shared by the engine and its adapters
pub mod bucket;
pub mod error;
pub mod metric;
pub mod period;
pub mod sample;
