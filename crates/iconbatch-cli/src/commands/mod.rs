mod check;
mod convert;
mod plan;
mod reset;
mod status;

pub use check::cmd_check;
pub use convert::cmd_convert;
pub use plan::cmd_plan;
pub use reset::cmd_reset;
pub use status::cmd_status;

use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use iconbatch_state::ProgressRecord;

const KEY_WIDTH: usize = 60;

/// Shorten long collection URLs so table columns stay aligned.
fn display_key(key: &str) -> String {
    if key.chars().count() <= KEY_WIDTH {
        return key.to_string();
    }
    let tail: String = key
        .chars()
        .rev()
        .take(KEY_WIDTH - 3)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}

fn display_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn display_state(record: &ProgressRecord) -> ColoredString {
    if !record.is_consistent() {
        "invalid".red()
    } else if record.is_complete() {
        "done".green()
    } else if record.success {
        "partial".yellow()
    } else {
        "failed".red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_key_truncates_from_the_left() {
        let long = format!("https://icons.test/collections/{}", "x".repeat(80));
        let shown = display_key(&long);
        assert_eq!(shown.chars().count(), KEY_WIDTH);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with("xxxx"));

        assert_eq!(display_key("https://a.test/1"), "https://a.test/1");
    }

    #[test]
    fn test_display_state() {
        colored::control::set_override(false);
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let done = ProgressRecord::new(5, 5, true, at);
        let partial = ProgressRecord::new(2, 5, true, at);
        let failed = ProgressRecord::new(2, 5, false, at);
        let invalid = ProgressRecord::new(7, 5, true, at);

        assert_eq!(display_state(&done).to_string(), "done");
        assert_eq!(display_state(&partial).to_string(), "partial");
        assert_eq!(display_state(&failed).to_string(), "failed");
        assert_eq!(display_state(&invalid).to_string(), "invalid");
    }
}
