pub mod check;
pub mod report;
pub mod serve;

// Re-export handler functions for convenience
pub use check::handle_check_command;
pub use report::handle_report_command;
pub use serve::handle_serve_command;
