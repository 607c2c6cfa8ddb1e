//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `verify`        | `Verify`, `Interactive`                            |
//! | `serve`         | `Serve`                                            |
//! | `results`       | `Results`                                          |
//! | `config`        | `Config`                                           |

pub mod config;
pub mod results;
pub mod serve;
pub mod verify;

pub use config::cmd_config;
pub use results::cmd_results;
pub use serve::cmd_serve;
pub use verify::{cmd_interactive, cmd_verify};
