pub mod log_entry;
pub mod stored_issue_log;
