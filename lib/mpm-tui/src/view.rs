//! Rendering for the list, form and detail screens

use mpm_health::{ci_severity, count_severity, dependency_severity, git_severity};
use mpm_types::{CheckStatus, Severity};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::Path;

use crate::{App, DetailState, ListMode, Screen};

pub const ACCENT: Color = Color::Rgb(0x7D, 0x56, 0xF4);
const HEALTHY: Color = Color::Rgb(0xA8, 0xCC, 0x8C);
const WARNING: Color = Color::Rgb(0xFF, 0xB8, 0x6C);
const CRITICAL: Color = Color::Rgb(0xFF, 0x55, 0x55);
const NEUTRAL: Color = Color::Rgb(0xB2, 0xB2, 0xB2);
const HELP: Color = Color::Rgb(0x62, 0x62, 0x62);

/// Rows of the detail screen not available to the scrolled body
pub const DETAIL_CHROME: u16 = 6;

/// Body height when the terminal size is not known yet
pub const DEFAULT_DETAIL_HEIGHT: usize = 30;

const SEPARATOR_WIDTH: usize = 41;

pub fn extension_color(extension: &str) -> Color {
    let rgb = match extension {
        ".go" => 0x00ADD8,
        ".js" => 0xF7DF1E,
        ".ts" => 0x3178C6,
        ".jsx" | ".tsx" => 0x61DAFB,
        ".py" => 0x3776AB,
        ".java" => 0xED8B00,
        ".html" => 0xE34F26,
        ".css" => 0x1572B6,
        ".scss" => 0xCD6799,
        ".json" => 0x000000,
        ".yml" | ".yaml" => 0xCB171E,
        ".md" => 0x083FA1,
        ".php" => 0x777BB4,
        ".rb" => 0xCC342D,
        ".c" => 0x555555,
        ".cpp" => 0x004482,
        ".cs" => 0x239120,
        ".rs" => 0xDEA584,
        ".swift" => 0xF05138,
        ".kt" => 0xA97BFF,
        ".sh" => 0x89E051,
        _ => 0xAAAAAA,
    };
    rgb_color(rgb)
}

fn rgb_color(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Healthy => HEALTHY,
        Severity::Warning => WARNING,
        Severity::Critical => CRITICAL,
    }
}

fn blank() -> Spans<'static> {
    Spans::from(String::new())
}

fn text(content: impl Into<String>) -> Spans<'static> {
    Spans::from(Span::raw(content.into()))
}

fn section(title: &str) -> Spans<'static> {
    Spans::from(Span::styled(
        format!("  {}", title),
        Style::default().fg(WARNING).add_modifier(Modifier::BOLD),
    ))
}

fn indicator(severity: Severity, label: String) -> Spans<'static> {
    Spans::from(vec![
        Span::raw("    "),
        Span::styled(
            "⬤",
            Style::default()
                .fg(severity_color(severity))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}", label)),
    ])
}

fn metric(key: &str, value: Span<'static>) -> Spans<'static> {
    Spans::from(vec![
        Span::styled(format!("       {}: ", key), Style::default().fg(ACCENT)),
        value,
    ])
}

fn count(value: usize) -> Span<'static> {
    Span::styled(
        value.to_string(),
        Style::default().fg(severity_color(count_severity(value))),
    )
}

fn placeholder_count(value: usize) -> Vec<Span<'static>> {
    vec![count(value), Span::styled(" (placeholder)", Style::default().fg(NEUTRAL))]
}

fn check_status(status: CheckStatus) -> Span<'static> {
    let color = match status {
        CheckStatus::Success => HEALTHY,
        CheckStatus::Unknown => NEUTRAL,
    };
    Span::styled(status.to_string(), Style::default().fg(color))
}

const ACTION_KEYS: &[(&str, &str)] = &[
    ("g", "Go to directory"),
    ("v", "Open in VS Code"),
    ("z", "Open in Zed"),
    ("c", "Open in Cursor"),
    ("n", "Open in Neovim"),
    ("f", "Open in Finder/File Explorer"),
    ("s", "Open in Sublime Text"),
    ("t", "Open in Trae"),
    ("m", "Open in TextMate"),
    ("d", "Delete project"),
];

/// Full, unscrolled content of the detail screen
pub fn detail_lines(detail: &DetailState, home: &Path) -> Vec<Spans<'static>> {
    let project = &detail.project;
    let mut lines = vec![
        blank(),
        Spans::from(vec![
            Span::raw("  "),
            Span::styled(
                project.name.clone(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", project.display_category()),
                Style::default().fg(HEALTHY),
            ),
        ]),
        Spans::from(Span::styled(
            format!("  {}", mpm_utils::format_path_display(&project.path, home)),
            Style::default().fg(NEUTRAL),
        )),
        blank(),
    ];

    git_lines(detail, &mut lines);
    lines.push(blank());
    file_chart_lines(detail, &mut lines);
    lines.push(blank());

    for (key, action) in ACTION_KEYS {
        lines.push(text(format!("  [{}] {}", key, action)));
    }
    lines.push(blank());
    lines.push(text("  [ESC/q] Back to list"));
    lines.push(Spans::from(Span::styled(
        "─".repeat(SEPARATOR_WIDTH),
        Style::default().fg(ACCENT),
    )));

    health_lines(detail, &mut lines);
    lines
}

fn git_lines(detail: &DetailState, lines: &mut Vec<Spans<'static>>) {
    let (mark, color) = if detail.git.has_repo {
        ("✅", HEALTHY)
    } else {
        ("❌", CRITICAL)
    };
    lines.push(Spans::from(vec![
        Span::raw("  Git: "),
        Span::styled(mark, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]));

    if detail.git.has_repo && !detail.git.remotes.is_empty() {
        lines.push(text("  Remotes:"));
        for remote in &detail.git.remotes {
            lines.push(Spans::from(vec![
                Span::raw("    "),
                Span::styled(remote.name.clone(), Style::default().fg(ACCENT)),
                Span::raw(format!(": {}", remote.url)),
            ]));
        }
    }
}

fn file_chart_lines(detail: &DetailState, lines: &mut Vec<Spans<'static>>) {
    if !detail.exists {
        lines.push(Spans::from(Span::styled(
            "  Project path does not exist.",
            Style::default().fg(CRITICAL),
        )));
        return;
    }

    let total = mpm_scanner::total_files(&detail.files);
    if total == 0 {
        lines.push(text("  No files found in project directory."));
        return;
    }

    lines.push(text(format!("  Top File Extensions (Total files: {})", total)));
    for (i, ext) in detail.extensions.iter().enumerate() {
        let percentage = ext.count as f64 / total as f64 * 100.0;
        lines.push(Spans::from(vec![
            Span::raw(format!("  {:2}. ", i + 1)),
            Span::styled(
                ext.extension.clone(),
                Style::default()
                    .fg(extension_color(&ext.extension))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(": {} ({:.1}%)", ext.count, percentage)),
        ]));
    }
    lines.push(Spans::from(Span::styled(
        format!(
            "  Total size: {}",
            mpm_utils::format_file_size(mpm_scanner::total_size(&detail.files))
        ),
        Style::default().fg(NEUTRAL),
    )));
}

fn health_lines(detail: &DetailState, lines: &mut Vec<Spans<'static>>) {
    lines.push(Spans::from(Span::styled(
        "  Project Health Dashboard",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    lines.push(Spans::from(Span::styled(
        "  (Use ↑ and ↓ to scroll)",
        Style::default().fg(NEUTRAL),
    )));
    lines.push(blank());

    let Some(health) = &detail.health else {
        lines.push(text("  Health data unavailable for a missing directory."));
        return;
    };

    let deps = &health.dependencies;
    lines.push(section("Dependencies"));
    let manager = deps
        .package_manager
        .map(|pm| pm.to_string())
        .unwrap_or_else(|| "No package manager detected".to_string());
    lines.push(indicator(dependency_severity(deps), manager));
    if deps.placeholder_counts {
        let mut total = vec![Span::styled("       Total: ", Style::default().fg(ACCENT))];
        total.extend(placeholder_count(deps.total));
        lines.push(Spans::from(total));
        let mut outdated = vec![Span::styled("       Outdated: ", Style::default().fg(ACCENT))];
        outdated.extend(placeholder_count(deps.outdated));
        lines.push(Spans::from(outdated));
    } else {
        lines.push(metric("Total", count(deps.total)));
        lines.push(metric("Outdated", count(deps.outdated)));
    }
    lines.push(metric("Vulnerabilities", count(deps.vulnerabilities)));
    lines.push(metric(
        "Lock File",
        Span::raw(if deps.has_lock_file { "yes" } else { "no" }),
    ));
    lines.push(blank());

    let git = &health.git;
    lines.push(section("Git Status"));
    lines.push(indicator(git_severity(git), "Git Integration".to_string()));
    let last_commit = git
        .last_commit
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(metric("Last Commit", Span::raw(last_commit)));
    if let Some(hosted) = &git.hosted {
        lines.push(metric(
            "Repository",
            Span::raw(format!("{}/{}", hosted.owner, hosted.repo)),
        ));
        for (key, value) in [
            ("Open PRs", hosted.open_prs),
            ("Open Issues", hosted.open_issues),
            ("Branches", hosted.branches),
        ] {
            let mut spans = vec![Span::styled(
                format!("       {}: ", key),
                Style::default().fg(ACCENT),
            )];
            spans.extend(placeholder_count(value));
            lines.push(Spans::from(spans));
        }
    }
    lines.push(blank());

    let ci = &health.ci;
    lines.push(section("CI/CD Status"));
    let provider = ci
        .provider
        .map(|p| p.to_string())
        .unwrap_or_else(|| "No CI configured".to_string());
    lines.push(indicator(ci_severity(ci), provider));
    lines.push(metric("Build Status", check_status(ci.build)));
    lines.push(metric("Test Status", check_status(ci.test)));
    lines.push(blank());
}

impl App {
    pub fn draw<B: Backend>(&self, f: &mut Frame<B>) {
        let size = f.size();
        match self.screen {
            Screen::List => self.draw_list(f, size),
            Screen::Form => self.draw_form(f, size),
            Screen::Detail => self.draw_detail(f, size),
        }
    }

    fn list_title(&self) -> String {
        match (self.mode, &self.category_scope) {
            (ListMode::Categories, _) => "(MPM) - Categories".to_string(),
            (ListMode::Projects, Some(category)) => format!("(MPM) - {}", category),
            (ListMode::Projects, None) => "(MPM) - Projects".to_string(),
        }
    }

    fn footer_text(&self) -> Spans<'static> {
        let help = Style::default().fg(HELP);
        match self.mode {
            ListMode::Categories => Spans::from(Span::styled(
                "Press 'q' to quit, 'tab' to switch to projects view, '/' to filter, 'enter' to view projects in category",
                help,
            )),
            ListMode::Projects => {
                let highlight = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
                Spans::from(vec![
                    Span::styled("Press 'q' to quit, 'a' to add, 'd' to delete, ", help),
                    Span::styled("'s'", highlight),
                    Span::styled(" to sort ", help),
                    Span::styled(self.sort.label(), highlight),
                    Span::styled(", '/' to filter, 'tab' to switch to categories view", help),
                ])
            }
        }
    }

    fn draw_list<B: Backend>(&self, f: &mut Frame<B>, size: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(1), // Header
                    Constraint::Min(1),    // List
                    Constraint::Length(1), // Filter / status
                    Constraint::Length(1), // Help
                ]
                .as_ref(),
            )
            .split(size);

        let header = Paragraph::new(Span::styled(
            " My Project Manager (MPM) ",
            Style::default()
                .fg(Color::Rgb(0xFA, 0xFA, 0xFA))
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Spans::from(Span::styled(
                        entry.title().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Spans::from(Span::styled(
                        entry.description(self.store.home_dir()),
                        Style::default().fg(NEUTRAL),
                    )),
                ])
            })
            .collect();

        let title = if self.entries.is_empty() {
            format!("{} (empty)", self.list_title())
        } else {
            self.list_title()
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .highlight_symbol("│ ");
        let mut state = ListState::default();
        if !self.entries.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, chunks[1], &mut state);

        let status_line = if self.filter.editing || !self.filter.query.is_empty() {
            let cursor = if self.filter.editing { "█" } else { "" };
            Spans::from(Span::styled(
                format!("Filter: {}{}", self.filter.query, cursor),
                Style::default().fg(Color::Rgb(0xFF, 0xA0, 0x7A)),
            ))
        } else if let Some(status) = &self.status {
            Spans::from(Span::styled(status.clone(), Style::default().fg(WARNING)))
        } else {
            blank()
        };
        f.render_widget(Paragraph::new(status_line), chunks[2]);
        f.render_widget(Paragraph::new(self.footer_text()), chunks[3]);
    }

    fn draw_form<B: Backend>(&self, f: &mut Frame<B>, size: Rect) {
        let mut lines = vec![
            blank(),
            Spans::from(Span::styled(
                "  Add New Project",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            blank(),
        ];

        for (i, field) in self.form.fields.iter().enumerate() {
            let focused = i == self.form.focused;
            let prompt = if focused { "> " } else { "  " };
            let prompt_style = if focused {
                Style::default().fg(ACCENT)
            } else {
                Style::default()
            };
            let value = if field.value.is_empty() {
                Span::styled(field.placeholder, Style::default().fg(HELP))
            } else {
                Span::raw(field.value.clone())
            };
            lines.push(Spans::from(vec![
                Span::styled(format!("{}{}: ", prompt, field.label), prompt_style),
                value,
            ]));
        }

        lines.push(blank());
        lines.push(Spans::from(Span::styled(
            "Press Enter to submit each field • ESC to cancel",
            Style::default().fg(HELP),
        )));

        f.render_widget(Paragraph::new(lines), size);
    }

    fn draw_detail<B: Backend>(&self, f: &mut Frame<B>, size: Rect) {
        let Some(detail) = &self.detail else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
            .split(size);

        let all_lines = detail_lines(detail, self.store.home_dir());
        let scroll = &detail.scroll;
        let indicator_style = Style::default().fg(ACCENT);

        let mut visible: Vec<Spans<'static>> = Vec::new();
        if scroll.has_more_above() {
            visible.push(Spans::from(Span::styled(
                format!(
                    "▲ Scroll Up with ↑ ▲ ({} of {} lines, {}%)",
                    scroll.offset() + 1,
                    scroll.total(),
                    scroll.percent()
                ),
                indicator_style,
            )));
        }
        let window = scroll.window();
        let end = window.end.min(all_lines.len());
        visible.extend(all_lines[window.start.min(end)..end].iter().cloned());
        if scroll.has_more_below() {
            visible.push(Spans::from(Span::styled("▼ Scroll Down with ↓ ▼", indicator_style)));
        }
        f.render_widget(Paragraph::new(visible), chunks[0]);

        if let Some(status) = &self.status {
            let status = Paragraph::new(Span::styled(status.clone(), Style::default().fg(CRITICAL)))
                .alignment(Alignment::Left);
            f.render_widget(status, chunks[1]);
        }
    }
}
