// Application layer - use-case services
pub mod dashboard_service;
pub mod mapping_service;
pub mod telemetry_repository;
