//! Integration tests for scriptlog

mod helpers;

mod cli_test;
mod convert_test;
