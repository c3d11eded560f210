//! Duration rendering for log lines.

/// Render a span of seconds as the two largest units, e.g. `"16m 40s"`.
///
/// The voting power facade logs its configured epoch length this way at
/// startup, so a 1000-second epoch reads as `16m 40s` rather than a raw count.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}
