//! Service layer orchestrating configuration resolution and output.

mod adapter;
mod report_service;

pub use report_service::ReportService;
