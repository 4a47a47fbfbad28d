mod utils;

mod config_tests;
mod errors_tests;
