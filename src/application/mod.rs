// Application layer - Use cases and ports
pub mod aggregation;
pub mod assembler;
pub mod chart_service;
pub mod chart_session;
pub mod chart_store;
pub mod correlation;
pub mod observatory_api;
pub mod saved_charts;
pub mod station_service;
pub mod statistics;
