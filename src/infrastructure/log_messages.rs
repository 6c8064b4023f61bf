//! Log message constants for the experiment runner
//!
//! Message text lives here so call sites carry only structured fields.

/// Application lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting balance race experiment";
    pub const SCENARIO_STARTED: &str = "Running scenario";
    pub const SCENARIO_FINISHED: &str = "Scenario finished";
    pub const SELF_CHECK_PASSED: &str = "Locked scenario preserved the invariant";
    pub const SELF_CHECK_FAILED: &str = "Locked scenario broke the balance invariant";
}

/// Trial harness messages
pub mod harness {
    pub const STARTING: &str = "Starting trials";
    pub const COMPLETED: &str = "Trials completed";
}

/// Configuration loading messages
pub mod configuration {
    pub const LOADING_CONFIG: &str = "Loading configuration";
    pub const CONFIG_LOADED: &str = "Configuration loaded successfully";
    pub const CONFIG_OVERRIDE: &str = "Command-line override applied";
}
