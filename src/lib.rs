pub mod audit;
pub mod claimcheck_config;
pub mod config;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod reasoning;
pub mod search;
pub mod server;
pub mod stages;
pub mod store;
pub mod ui;
pub mod util;
