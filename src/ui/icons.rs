//! Shared UI icons and emojis.

use console::Emoji;

use crate::model::Verdict;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static QUESTION: Emoji<'_, '_> = Emoji("❓ ", "[?]");

// Workflow indicators
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[>]");
pub static SAVED: Emoji<'_, '_> = Emoji("💾 ", "[saved]");
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Icon shown next to a verdict.
pub fn verdict_icon(verdict: Verdict) -> &'static Emoji<'static, 'static> {
    match verdict {
        Verdict::True => &CHECK,
        Verdict::False | Verdict::Unsupported => &CROSS,
        Verdict::PartiallyTrue | Verdict::Misleading => &WARNING,
        Verdict::Unverified => &QUESTION,
    }
}
