pub mod icons;
pub mod panel;
pub mod progress;

pub use panel::{render_response, render_results_table, render_stage_evaluation};
pub use progress::VerifyUI;
