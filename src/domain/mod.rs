// Domain layer - Core data models
pub mod period;
pub mod saved_chart;
pub mod series;
pub mod station;
