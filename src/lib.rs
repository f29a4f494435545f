//! JobScraps Backend Discovery Library
//!
//! Read-only inventory of the job-scraping backend: the PostgreSQL schema and
//! data, plus the PostgREST gateway that exposes it. The report is written to
//! stdout and ends with a recommended frontend configuration.
//!
//! # Modules
//!
//! - `catalog`: `information_schema` introspection.
//! - `config`: Configuration management.
//! - `db`: The single database connection used per run.
//! - `discovery`: Runs the inspections in order and writes the report.
//! - `endpoints`: Gateway endpoint and query-capability probes.
//! - `errors`: Error handling types.
//! - `frontend_config`: The recommended frontend configuration.
//! - `gateway_client`: PostgREST client.
//! - `inspections`: Database-side inspection routines.
//! - `models`: Catalog entries, domain rows and inspection outcomes.
//! - `report`: Renders outcomes into report lines.

pub mod catalog;
pub mod config;
pub mod db;
pub mod discovery;
pub mod endpoints;
pub mod errors;
pub mod frontend_config;
pub mod gateway_client;
pub mod inspections;
pub mod models;
pub mod report;
