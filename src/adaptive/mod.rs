pub mod config;
pub mod decision;
pub mod engine;
pub mod features;
pub mod insights;
pub mod ledger;
pub mod monitoring;
pub mod types;
