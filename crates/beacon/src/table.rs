use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use beacon_core::{CanonicalStatus, UnifiedDeployment};

use crate::color;

const HEADERS: [&str; 7] = ["Status", "Name", "Provider", "Branch", "Commit", "Age", "Account"];
const COMMIT_MAX: usize = 48;
const BRANCH_MAX: usize = 32;

/// One pre-rendered row; cells are plain text, color is applied after padding.
struct Row {
    status: CanonicalStatus,
    cells: [String; 7],
}

pub struct DeploymentTable {
    widths: [usize; 7],
    rows: Vec<Row>,
}

impl DeploymentTable {
    pub fn new(deployments: &[UnifiedDeployment], now: DateTime<Utc>) -> Self {
        let mut widths = HEADERS.map(display_width);

        let rows: Vec<Row> = deployments
            .iter()
            .map(|d| {
                let cells = [
                    d.canonical_status.as_str().to_string(),
                    d.name.clone(),
                    d.provider.display_name().to_string(),
                    truncate(d.branch.as_deref().unwrap_or("-"), BRANCH_MAX),
                    truncate(
                        d.commit_message
                            .as_deref()
                            .and_then(|m| m.lines().next())
                            .unwrap_or("-"),
                        COMMIT_MAX,
                    ),
                    format_age(d.created_at, now),
                    d.account_id.clone(),
                ];
                for (width, cell) in widths.iter_mut().zip(cells.iter()) {
                    *width = (*width).max(display_width(cell));
                }
                Row {
                    status: d.canonical_status,
                    cells,
                }
            })
            .collect();

        Self { widths, rows }
    }

    pub fn render(&self) -> String {
        let mut out = Vec::with_capacity(self.rows.len() + 4);
        out.push(self.border('┌', '┬', '┐'));
        out.push(self.header_row());
        out.push(self.border('├', '┼', '┤'));
        for row in &self.rows {
            out.push(self.row(row));
        }
        out.push(self.border('└', '┴', '┘'));
        out.join("\n")
    }

    pub fn print_table(&self) {
        println!("{}", self.render());
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        color::muted(&format!("{left}{}{right}", segments.join(&mid.to_string())))
    }

    fn header_row(&self) -> String {
        let cells: Vec<String> = HEADERS
            .iter()
            .zip(self.widths.iter())
            .map(|(h, w)| color::bold(&pad(h, *w)))
            .collect();
        self.join_cells(&cells)
    }

    fn row(&self, row: &Row) -> String {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(self.widths.iter())
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad(cell, *w);
                match i {
                    0 => color::status(row.status, &padded),
                    1 => color::accent(&padded),
                    5 => color::muted(&padded),
                    _ => padded,
                }
            })
            .collect();
        self.join_cells(&cells)
    }

    fn join_cells(&self, cells: &[String]) -> String {
        let sep = color::muted("│");
        let inner: Vec<String> = cells.iter().map(|c| format!(" {c} ")).collect();
        format!("{sep}{}{sep}", inner.join(&sep))
    }
}

/// Relative age of a millisecond timestamp ("42s ago", "3h ago").
pub(crate) fn format_age(created_at: Option<i64>, now: DateTime<Utc>) -> String {
    let Some(created) = created_at.and_then(DateTime::<Utc>::from_timestamp_millis) else {
        return "-".to_string();
    };
    let secs = (now - created).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Shorten to `max_len` characters, ending with "..." when cut.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{truncated}...")
}

/// Terminal display width; wide characters count as 2 columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad to a minimum display width without truncating.
pub(crate) fn pad(s: &str, min_width: usize) -> String {
    let width = display_width(s);
    if width >= min_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(min_width - width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::ProviderKind;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn deployment(name: &str, status: CanonicalStatus) -> UnifiedDeployment {
        UnifiedDeployment {
            id: format!("dpl_{name}"),
            provider: ProviderKind::Vercel,
            name: name.to_string(),
            url: None,
            status: status.as_str().to_string(),
            canonical_status: status,
            created_at: Some(now().timestamp_millis() - 90_000),
            commit_message: Some("Fix login redirect\n\nLonger body".to_string()),
            branch: Some("main".to_string()),
            project_id: None,
            service_id: None,
            team_slug: None,
            account_id: "personal".to_string(),
        }
    }

    #[test]
    fn test_pad_shorter_than_width() {
        assert_eq!(pad("hi", 5), "hi   ");
    }

    #[test]
    fn test_pad_longer_than_width() {
        assert_eq!(pad("hello world", 5), "hello world");
    }

    #[test]
    fn test_display_width_cjk() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(pad("日本", 6), "日本  ");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("café crème", 10), "café crème");
        assert_eq!(truncate("abcdefghij", 7), "abcd...");
    }

    #[test]
    fn test_format_age_buckets() {
        let base = now().timestamp_millis();
        assert_eq!(format_age(Some(base - 5_000), now()), "5s ago");
        assert_eq!(format_age(Some(base - 90_000), now()), "1m ago");
        assert_eq!(format_age(Some(base - 7_200_000), now()), "2h ago");
        assert_eq!(format_age(Some(base - 3 * 86_400_000), now()), "3d ago");
        assert_eq!(format_age(None, now()), "-");
    }

    #[test]
    fn test_format_age_future_timestamp_clamps_to_zero() {
        let base = now().timestamp_millis();
        assert_eq!(format_age(Some(base + 60_000), now()), "0s ago");
    }

    #[test]
    fn test_render_uses_first_commit_line_and_aligns_rows() {
        crate::color::set_no_color();
        let table = DeploymentTable::new(
            &[
                deployment("web", CanonicalStatus::Ready),
                deployment("api-gateway", CanonicalStatus::Building),
            ],
            now(),
        );
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(rendered.contains("Fix login redirect"));
        assert!(!rendered.contains("Longer body"));
        assert!(lines[3].contains("READY"));
        assert!(lines[4].contains("BUILDING"));
        let width = display_width(lines[0]);
        assert!(lines.iter().all(|l| display_width(l) == width));
    }

    #[test]
    fn test_render_empty_snapshot_has_only_frame() {
        crate::color::set_no_color();
        let rendered = DeploymentTable::new(&[], now()).render();
        assert_eq!(rendered.lines().count(), 4);
    }
}
