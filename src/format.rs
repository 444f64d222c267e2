use chrono::DateTime;
use ratatui::style::Color;

/// Format an RFC 3339 timestamp as "Jan 15, 2024 10:30".
/// Falls back to the raw input when the timestamp does not parse.
pub fn format_timestamp(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(date) => date.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

/// Shorter variant without the year, for list rows: "Jan 15 10:30".
pub fn format_time_short(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(date) => date.format("%b %-d %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

pub fn file_icon(kind: &str) -> &'static str {
    match kind {
        "pdf" => "📄",
        "image" => "🖼",
        "archive" => "🗜",
        "spreadsheet" => "📊",
        _ => "📎",
    }
}

pub fn file_color(kind: &str) -> Color {
    match kind {
        "pdf" => Color::Red,
        "spreadsheet" => Color::Green,
        "image" => Color::Blue,
        "archive" => Color::Magenta,
        _ => Color::Gray,
    }
}

pub fn priority_color(priority: &str) -> Color {
    match priority {
        "high" => Color::Red,
        "medium" => Color::Yellow,
        "low" => Color::Green,
        _ => Color::Gray,
    }
}

pub fn service_status_icon(status: &str) -> &'static str {
    match status {
        "connected" => "✔",
        "warning" | "error" => "!",
        _ => "⏳",
    }
}

pub fn service_status_color(status: &str) -> Color {
    match status {
        "connected" => Color::Green,
        "warning" => Color::Yellow,
        "error" => Color::Red,
        _ => Color::Gray,
    }
}

/// Accent color for a dashboard stat card's gradient tag.
pub fn gradient_color(gradient: &str) -> Color {
    match gradient {
        "blue-cyan" => Color::Cyan,
        "purple-pink" => Color::Magenta,
        "green-emerald" => Color::Green,
        "orange-red" => Color::Red,
        _ => Color::Blue,
    }
}

pub fn stat_icon(icon: &str) -> &'static str {
    match icon {
        "emails" => "✉",
        "attachments" => "📄",
        "threads" => "👥",
        "storage" => "🗄",
        _ => "▪",
    }
}

pub fn activity_icon(kind: &str) -> &'static str {
    match kind {
        "email" => "✉",
        "attachment" => "📎",
        "thread" => "🧵",
        "oauth" => "🔑",
        _ => "•",
    }
}

/// Strip the Google auth prefix so scope lists stay readable in narrow panels.
pub fn short_scope(scope: &str) -> &str {
    scope
        .strip_prefix("https://www.googleapis.com/auth/")
        .unwrap_or(scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_deterministic() {
        let ts = "2024-01-15T10:30:00Z";
        let first = format_timestamp(ts);
        let second = format_timestamp(ts);
        assert_eq!(first, second);
        assert_eq!(first, "Jan 15, 2024 10:30");
    }

    #[test]
    fn test_format_time_short() {
        assert_eq!(format_time_short("2024-01-14T16:45:00Z"), "Jan 14 16:45");
    }

    #[test]
    fn test_format_timestamp_falls_back_on_garbage() {
        assert_eq!(format_timestamp("not a date"), "not a date");
        assert_eq!(format_time_short(""), "");
    }

    #[test]
    fn test_color_maps_cover_mock_tags() {
        // Every tag that appears in the literal datasets must map to a style.
        for kind in ["pdf", "spreadsheet", "image", "archive"] {
            assert_ne!(file_color(kind), Color::Gray);
            assert!(!file_icon(kind).is_empty());
        }
        for priority in ["high", "medium", "low"] {
            assert_ne!(priority_color(priority), Color::Gray);
        }
        for icon in ["emails", "attachments", "threads", "storage"] {
            assert_ne!(stat_icon(icon), "▪");
        }
        assert_eq!(service_status_color("connected"), Color::Green);
    }

    #[test]
    fn test_color_maps_have_defaults() {
        assert_eq!(file_color("hologram"), Color::Gray);
        assert_eq!(file_icon("hologram"), "📎");
        assert_eq!(priority_color("urgent-ish"), Color::Gray);
        assert_eq!(service_status_color("unknown"), Color::Gray);
        assert_eq!(service_status_icon("unknown"), "⏳");
        assert_eq!(gradient_color("teal-lime"), Color::Blue);
        assert_eq!(stat_icon("mystery"), "▪");
        assert_eq!(activity_icon("mystery"), "•");
    }

    #[test]
    fn test_short_scope() {
        assert_eq!(
            short_scope("https://www.googleapis.com/auth/gmail.readonly"),
            "gmail.readonly"
        );
        assert_eq!(short_scope("custom://scope"), "custom://scope");
    }
}
