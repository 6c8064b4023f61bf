//! Balance race - measuring a check-then-act race on a shared balance
//!
//! Two withdrawal implementations run concurrently against one balance: a
//! naive one whose check and subtract are separate atomic operations, and a
//! locked one that performs both inside a mutex. The trial harness runs each
//! many times and counts how often the balance ends up negative.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod harness;
pub mod infrastructure;
pub mod report;
pub mod scenario;

pub use application::Application;
pub use domain::{invariant_ok, Balance, Parameters, TrialStatistics};
pub use error::{Error, Result};
pub use harness::run_stats;
pub use scenario::{run_once_locked, run_once_naive};
