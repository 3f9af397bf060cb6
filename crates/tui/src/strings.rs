// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const APP_TITLE: &str = " HealthAI ";

pub fn subtitle(model: &str) -> String {
    format!("AI-powered health assistant using OpenRouter ({})", model)
}

// Block titles keep surrounding spaces for visual padding
pub const TITLE_TABS: &str = " Sections ";
pub const TITLE_RESPONSE: &str = " Response ";
pub const TITLE_CSV_PATH: &str = " CSV file path ";
pub const TITLE_METRICS: &str = " Select metric to plot ";

pub const ANALYTICS_HEADING: &str = "Upload Health Report (CSV)";
pub const CSV_HINT: &str = "Path to a .csv file, Enter to load";

pub const PENDING_NOTICE: &str = "Waiting for the assistant...";
pub const STILL_WAITING_NOTICE: &str = "Still waiting for the previous answer.";
pub const WORKER_GONE_NOTICE: &str = "The request ended without a reply.";
pub const ANALYTICS_IDLE_NOTICE: &str = "Load a CSV file to view your health analytics.";
pub const EMPTY_PATH_NOTICE: &str = "Please enter the path of a CSV file.";
pub const UPLOAD_OK_NOTICE: &str = "File uploaded successfully!";
pub const NO_NUMERIC_NOTICE: &str = "No numeric columns found for plotting.";

pub fn read_error_notice(cause: &str) -> String {
    format!("Error reading file: {}", cause)
}

pub fn input_title(label: &str, action: &str) -> String {
    format!(" {} (Enter: {}) ", label, action)
}

pub fn preview_title(path: &str, shown: usize, total: usize) -> String {
    format!(" {} ({} of {} rows) ", path, shown, total)
}

// Build the status bar line with width-aware compaction.
// - section: active tab title
// - line_disp/col_disp: caret location (1-based display)
// - pending: number of requests in flight
// - max_width: available width for the status text
pub fn build_status_line(
    model: &str,
    section: &str,
    line_disp: u16,
    col_disp: u16,
    pending: usize,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[OpenRouter][{}]", model));
    segments.push(format!("[{}] L{} C{}", section, line_disp, col_disp));
    if pending > 0 {
        segments.push(format!("Waiting:{}", pending));
    }
    // Hints ordered by importance; appended while space allows.
    let hints: [&str; 5] = [
        "Enter: submit",
        "Tab/F1-F4: section",
        "Shift+Enter: newline",
        "PgUp/PgDn: scroll",
        "Esc: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}
