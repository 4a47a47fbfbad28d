pub mod coordinator;
pub mod evaluator;
pub mod fares;
pub mod selector;
pub mod watch;
