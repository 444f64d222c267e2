use crate::format::{
    activity_icon, file_color, file_icon, format_time_short, format_timestamp, gradient_color,
    priority_color, service_status_color, service_status_icon, short_scope, stat_icon,
};
use crate::models::{
    self, ActivityEntry, Attachment, EmailSummary, OauthService, StatCard, SummaryStat,
    SystemStatus,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tui_textarea::TextArea;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Emails,
    Attachments,
    Oauth,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Emails, Tab::Attachments, Tab::Oauth];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Emails => "Email Archive",
            Tab::Attachments => "Attachments",
            Tab::Oauth => "OAuth Status",
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Emails,
            Tab::Emails => Tab::Attachments,
            Tab::Attachments => Tab::Oauth,
            Tab::Oauth => Tab::Dashboard,
        }
    }

    pub fn prev(self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Oauth,
            Tab::Emails => Tab::Dashboard,
            Tab::Attachments => Tab::Emails,
            Tab::Oauth => Tab::Attachments,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum UiMode {
    #[default]
    Browsing,
    Searching,
}

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub destructive: bool,
    pub created: Instant,
}

/// Transient notifications, newest last. The queue is the only user-facing
/// signal for success and failure outcomes of simulated actions.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_toast(title, description, false);
    }

    pub fn push_destructive(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_toast(title, description, true);
    }

    fn push_toast(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        destructive: bool,
    ) {
        self.toasts.push(Toast {
            title: title.into(),
            description: description.into(),
            destructive,
            created: Instant::now(),
        });
    }

    /// Drop toasts older than their display window.
    pub fn prune(&mut self) {
        let now = Instant::now();
        self.toasts
            .retain(|t| now.duration_since(t.created) < TOAST_TTL);
    }

    pub fn visible(&self) -> &[Toast] {
        let start = self.toasts.len().saturating_sub(MAX_VISIBLE_TOASTS);
        &self.toasts[start..]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[cfg(test)]
    pub fn push_aged(&mut self, title: &str, age: Duration) {
        self.toasts.push(Toast {
            title: title.to_string(),
            description: String::new(),
            destructive: false,
            created: Instant::now() - age,
        });
    }
}

pub struct DashboardState {
    pub stats: Vec<StatCard>,
    pub activity: Vec<ActivityEntry>,
    pub system_status: Vec<SystemStatus>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            stats: models::mock_stats(),
            activity: models::mock_activity(),
            system_status: models::mock_system_status(),
        }
    }
}

pub struct EmailArchiveState<'a> {
    pub emails: Vec<EmailSummary>,
    pub search: TextArea<'a>,
    pub selected: usize,
    pub list_state: ListState,
}

impl<'a> EmailArchiveState<'a> {
    pub fn new(emails: Vec<EmailSummary>) -> Self {
        let mut search = TextArea::default();
        search.set_cursor_line_style(Style::default());
        search.set_placeholder_text("Search emails by subject, sender, or content...");
        Self {
            emails,
            search,
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub fn search_text(&self) -> String {
        self.search.lines().join(" ")
    }

    /// Emails matching the current search text, case-insensitively, by
    /// subject, sender or preview content. An empty search matches everything.
    pub fn filtered(&self) -> Vec<&EmailSummary> {
        let needle = self.search_text().trim().to_lowercase();
        self.emails
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.subject.to_lowercase().contains(&needle)
                    || e.sender.to_lowercase().contains(&needle)
                    || e.preview.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Keep the cursor inside the (possibly shrunken) filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

pub struct AttachmentState {
    pub attachments: Vec<Attachment>,
    pub summary: Vec<SummaryStat>,
    pub downloading: HashSet<u32>,
    pub selected: usize,
    pub list_state: ListState,
}

impl AttachmentState {
    pub fn new(attachments: Vec<Attachment>) -> Self {
        Self {
            attachments,
            summary: models::mock_attachment_summary(),
            downloading: HashSet::new(),
            selected: 0,
            list_state: ListState::default(),
        }
    }

    /// Mark an attachment as mid-download. Returns false when a download for
    /// this id is already in flight.
    pub fn begin_download(&mut self, id: u32) -> bool {
        self.downloading.insert(id)
    }

    pub fn finish_download(&mut self, id: u32) {
        self.downloading.remove(&id);
    }

    pub fn is_downloading(&self, id: u32) -> bool {
        self.downloading.contains(&id)
    }

    pub fn selected_attachment(&self) -> Option<&Attachment> {
        self.attachments.get(self.selected)
    }
}

pub struct OauthState {
    pub services: Vec<OauthService>,
    pub refreshing: Vec<String>,
    pub refresh_all_in_flight: bool,
    pub selected: usize,
}

impl OauthState {
    pub fn new(services: Vec<OauthService>) -> Self {
        Self {
            services,
            refreshing: Vec::new(),
            refresh_all_in_flight: false,
            selected: 0,
        }
    }

    /// Mark one service as mid-refresh. Refuses while that service is already
    /// refreshing or a refresh-all holds every service busy.
    pub fn begin_refresh(&mut self, service_id: &str) -> bool {
        if self.refresh_all_in_flight || self.is_refreshing(service_id) {
            return false;
        }
        self.refreshing.push(service_id.to_string());
        true
    }

    pub fn finish_refresh(&mut self, service_id: &str) {
        self.refreshing.retain(|id| id != service_id);
    }

    /// Mark every service busy at once for an aggregate refresh.
    pub fn begin_refresh_all(&mut self) -> bool {
        if self.refresh_all_in_flight {
            return false;
        }
        self.refresh_all_in_flight = true;
        self.refreshing = self.services.iter().map(|s| s.id.clone()).collect();
        true
    }

    pub fn finish_refresh_all(&mut self) {
        self.refresh_all_in_flight = false;
        self.refreshing.clear();
    }

    pub fn is_refreshing(&self, service_id: &str) -> bool {
        self.refreshing.iter().any(|id| id == service_id)
    }

    pub fn selected_service(&self) -> Option<&OauthService> {
        self.services.get(self.selected)
    }
}

pub struct UiState<'a> {
    pub active_tab: Tab,
    pub mode: UiMode,
    pub dashboard: DashboardState,
    pub emails: EmailArchiveState<'a>,
    pub attachments: AttachmentState,
    pub oauth: OauthState,
    pub toasts: ToastQueue,
}

impl<'a> Default for UiState<'a> {
    fn default() -> Self {
        Self {
            active_tab: Tab::Dashboard,
            mode: UiMode::Browsing,
            dashboard: DashboardState::new(),
            emails: EmailArchiveState::new(models::mock_emails()),
            attachments: AttachmentState::new(models::mock_attachments()),
            oauth: OauthState::new(models::mock_oauth_services()),
            toasts: ToastQueue::default(),
        }
    }
}

pub fn render(f: &mut Frame, state: &mut UiState<'_>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_header(f, outer[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Navigation sidebar
            Constraint::Min(0),     // Active view
        ])
        .split(outer[1]);

    render_navigation(f, body[0], state.active_tab);

    match state.active_tab {
        Tab::Dashboard => render_dashboard(f, body[1], state),
        Tab::Emails => render_emails(f, body[1], state),
        Tab::Attachments => render_attachments(f, body[1], state),
        Tab::Oauth => render_oauth(f, body[1], state),
    }

    render_hints(f, outer[2], state);
    render_toasts(f, f.area(), &state.toasts);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "BidManager — Email Archive System",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  G-Suite integration for automated email archiving"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(Span::styled(
                " ● System Active ",
                Style::default().fg(Color::Green),
            )))
            .title_alignment(Alignment::Right),
    );
    f.render_widget(header, area);
}

fn render_navigation(f: &mut Frame, area: Rect, active_tab: Tab) {
    let items: Vec<ListItem> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if *tab == active_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {}", i + 1, tab.title())).style(style)
        })
        .collect();

    let nav = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("BidManager")
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(nav, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, state: &UiState<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Min(8),    // Chart placeholder + activity
            Constraint::Length(4), // System status
        ])
        .split(area);

    let stat_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    for (stat, cell) in state.dashboard.stats.iter().zip(stat_cells.iter()) {
        let card = Paragraph::new(Line::from(vec![
            Span::raw(format!("{} ", stat_icon(&stat.icon))),
            Span::styled(
                stat.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("{} {}", if stat.trend_up { "▲" } else { "▼" }, stat.change),
                Style::default().fg(Color::Green),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(stat.title.clone())
                .border_style(Style::default().fg(gradient_color(&stat.gradient))),
        );
        f.render_widget(card, *cell);
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    // The volume chart is an unimplemented placeholder, kept so the overview
    // keeps its three-region composition.
    let chart = Paragraph::new("\nChart visualization will be implemented\nwith a charting widget")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Email Volume Trends"),
        );
    f.render_widget(chart, middle[0]);

    let activity_items: Vec<ListItem> = state
        .dashboard
        .activity
        .iter()
        .map(|a| {
            ListItem::new(Text::from(vec![
                Line::from(format!("{} {}", activity_icon(&a.kind), a.content)),
                Line::from(Span::styled(
                    format!("   {}", a.time),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();
    let activity = List::new(activity_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent Activity"),
    );
    f.render_widget(activity, middle[1]);

    let status_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[2]);

    for (status, cell) in state.dashboard.system_status.iter().zip(status_cells.iter()) {
        let panel = Paragraph::new(Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(
                status.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", status.detail),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("System Status"));
        f.render_widget(panel, *cell);
    }
}

fn render_emails(f: &mut Frame, area: Rect, state: &mut UiState<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Email list
            Constraint::Length(1), // Load more placeholder
        ])
        .split(area);

    let search_style = if state.mode == UiMode::Searching {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    state.emails.search.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Email Archive — search · Filters (none) ")
            .border_style(search_style),
    );
    f.render_widget(&state.emails.search, rows[0]);

    state.emails.clamp_selection();
    let selected = state.emails.selected;
    let filtered = state.emails.filtered();

    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .map(|(i, email)| {
            let mut title_style = if i == selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            if email.is_unread() {
                title_style = title_style.add_modifier(Modifier::BOLD);
            }

            let marker = if email.is_unread() { "●" } else { "○" };
            let mut meta = format!(
                "  From: {}  {}",
                email.sender,
                format_time_short(&email.timestamp)
            );
            if email.has_attachments {
                meta.push_str("  📎");
            }
            if email.thread_count > 1 {
                meta.push_str(&format!("  [{} messages]", email.thread_count));
            }

            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(format!("{} {} ", marker, email.subject), title_style),
                    Span::styled(
                        format!("[{}]", email.priority),
                        Style::default().fg(priority_color(&email.priority)),
                    ),
                ]),
                Line::from(Span::styled(meta, Style::default().fg(Color::Gray))),
                Line::from(Span::styled(
                    format!("  {}", email.preview),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    format!("  To: {}", email.recipients.join(", ")),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    let title = format!("Emails ({})", filtered.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    state.emails.list_state.select(Some(selected));
    f.render_stateful_widget(list, rows[1], &mut state.emails.list_state);

    let load_more = Paragraph::new("[ Load More Emails ]")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(load_more, rows[2]);
}

fn render_attachments(f: &mut Frame, area: Rect, state: &mut UiState<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary stats
            Constraint::Min(0),    // Attachment list
        ])
        .split(area);

    let stat_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);

    for (stat, cell) in state.attachments.summary.iter().zip(stat_cells.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            stat.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(stat.label.clone())
                .border_style(Style::default().fg(gradient_color(&stat.accent))),
        );
        f.render_widget(card, *cell);
    }

    let selected = state.attachments.selected;
    let items: Vec<ListItem> = state
        .attachments
        .attachments
        .iter()
        .enumerate()
        .map(|(i, att)| {
            let row_style = if i == selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let mut name_line = vec![
                Span::styled(
                    format!("{} {} ", file_icon(&att.kind), att.name),
                    row_style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{}]", att.kind.to_uppercase()),
                    Style::default().fg(file_color(&att.kind)),
                ),
            ];
            if state.attachments.is_downloading(att.id) {
                name_line.push(Span::styled(
                    "  ⏳ downloading…",
                    Style::default().fg(Color::Yellow),
                ));
            }

            ListItem::new(Text::from(vec![
                Line::from(name_line),
                Line::from(Span::styled(
                    format!("  From: {}", att.email_subject),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!(
                        "  {}  {}  {} downloads",
                        att.size,
                        format_timestamp(&att.upload_date),
                        att.download_count
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent Attachments"),
    );
    state.attachments.list_state.select(Some(selected));
    f.render_stateful_widget(list, rows[1], &mut state.attachments.list_state);
}

fn render_oauth(f: &mut Frame, area: Rect, state: &UiState<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Overview
            Constraint::Min(0),    // Service cards
            Constraint::Length(4), // Configuration actions
        ])
        .split(area);

    let overview = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("✔ ", Style::default().fg(Color::Green)),
            Span::raw("All Systems Connected — OAuth authentication active"),
        ]),
        Line::from(vec![
            Span::styled("⟳ ", Style::default().fg(Color::Cyan)),
            Span::raw("Auto-Refresh Enabled — tokens refresh automatically"),
        ]),
        Line::from(vec![
            Span::styled("⚙ ", Style::default().fg(Color::Magenta)),
            Span::raw("Secure Configuration — encrypted token storage"),
        ]),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("OAuth Integration Status"),
    );
    f.render_widget(overview, rows[0]);

    let service_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, state.oauth.services.len().max(1) as u32);
            state.oauth.services.len().max(1)
        ])
        .split(rows[1]);

    for (i, (service, cell)) in state
        .oauth
        .services
        .iter()
        .zip(service_cells.iter())
        .enumerate()
    {
        let border = if i == state.oauth.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{} ", service_status_icon(&service.status)),
                    Style::default().fg(service_status_color(&service.status)),
                ),
                Span::styled(
                    service.status.clone(),
                    Style::default().fg(service_status_color(&service.status)),
                ),
            ]),
            Line::from(format!(
                "Last Refresh: {}",
                format_time_short(&service.last_refresh)
            )),
            Line::from(format!("Expires In: {}", service.expires_in)),
            Line::from(vec![
                Span::raw("Token Health: "),
                Span::styled(
                    service.token_health.clone(),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(Span::styled(
                "Granted Scopes:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        for scope in &service.scopes {
            lines.push(Line::from(Span::styled(
                format!("  {}", short_scope(scope)),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
        if state.oauth.is_refreshing(&service.id) {
            lines.push(Line::from(Span::styled(
                "⟳ refreshing…",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "[r] Refresh Token",
                Style::default().fg(Color::Cyan),
            )));
        }

        let card = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(service.name.clone())
                    .border_style(border),
            );
        f.render_widget(card, *cell);
    }

    let refresh_all_line = if state.oauth.refresh_all_in_flight {
        Line::from(Span::styled(
            "⟳ Refreshing all tokens…",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("[R] Refresh All Tokens — manually refresh all OAuth tokens")
    };
    let actions = Paragraph::new(Text::from(vec![
        refresh_all_line,
        Line::from("[s] Update Scopes — modify API access permissions"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Configuration Actions"),
    );
    f.render_widget(actions, rows[2]);
}

fn render_hints(f: &mut Frame, area: Rect, state: &UiState<'_>) {
    let hints = match (state.active_tab, state.mode) {
        (_, UiMode::Searching) => "type to search · Enter/Esc done",
        (Tab::Dashboard, _) => "Tab next view · 1-4 jump · q quit",
        (Tab::Emails, _) => "/ search · j/k move · Tab next view · q quit",
        (Tab::Attachments, _) => "d download · o view in Drive · j/k move · q quit",
        (Tab::Oauth, _) => "r refresh token · R refresh all · s update scopes · q quit",
    };
    let line = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(line, area);
}

fn render_toasts(f: &mut Frame, area: Rect, toasts: &ToastQueue) {
    const TOAST_WIDTH: u16 = 44;
    const TOAST_HEIGHT: u16 = 4;

    let width = TOAST_WIDTH.min(area.width);
    let mut bottom = area.bottom().saturating_sub(1);

    for toast in toasts.visible().iter().rev() {
        if bottom < area.y + TOAST_HEIGHT {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y: bottom - TOAST_HEIGHT,
            width,
            height: TOAST_HEIGHT,
        };
        let border = if toast.destructive {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        f.render_widget(Clear, rect);
        let body = Paragraph::new(toast.description.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(toast.title.clone())
                    .border_style(border),
            );
        f.render_widget(body, rect);
        bottom -= TOAST_HEIGHT;
    }
}
