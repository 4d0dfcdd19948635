// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod explanation_client;
pub mod firebase_store;
pub mod legacy_file;
pub mod memory_store;
pub mod record_mapper;
pub mod rest_api;
