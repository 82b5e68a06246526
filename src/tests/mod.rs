pub mod support;
pub mod config_tests;
pub mod client_tests;
