//! CLI progress display utilities
//!
//! Step indicators with emojis and a progress bar for batch runs.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Cube - for 3D model operations
pub static CUBE: Emoji<'_, '_> = Emoji("📐 ", "");

/// Print a step indicator: `[1/2] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s (3 ok, 1 failed)`
pub fn print_done(elapsed: Duration, succeeded: usize, failed: usize) {
    let summary = if failed == 0 {
        style(format!("{succeeded} ok")).green()
    } else {
        style(format!("{succeeded} ok, {failed} failed")).red()
    };
    println!("{} Done in {} ({})", SPARKLE, HumanDuration(elapsed), summary);
}

/// Progress bar style for determinate progress
///
/// Format: `Decoding [████████░░░░░░░░] 50/100`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
        .progress_chars("█▓░")
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}
