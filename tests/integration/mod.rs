//! Integration test modules.

mod batch_test;
mod ftp_history_test;
