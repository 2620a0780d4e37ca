//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `moodlog_core` linkage.
//! - Print the default reminder plan as a quick sanity check.

use moodlog_core::{plan_reminders, WakingWindow, DEFAULT_REMINDER_COUNT};

fn main() {
    println!("moodlog_core ping={}", moodlog_core::ping());
    println!("moodlog_core version={}", moodlog_core::core_version());

    let window = WakingWindow::default();
    match plan_reminders(&window, DEFAULT_REMINDER_COUNT) {
        Ok(times) => {
            let labels: Vec<String> = times.iter().map(ToString::to_string).collect();
            println!(
                "default_window={}-{} reminders={}",
                window.wake_time(),
                window.bed_time(),
                labels.join(",")
            );
        }
        Err(err) => eprintln!("reminder plan failed: {err}"),
    }
}
