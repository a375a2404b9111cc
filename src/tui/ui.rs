use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph, Tabs, Wrap};

use crate::calendar::Activity;
use crate::contributions::{Avatar, ContributionStatus, Fallback, GroupEntry, PrLocator, Resolution};
use crate::experience::tenure_label;
use crate::tui::app::{App, InputMode, ListRow, View};
use crate::tui::theme::ThemeColors;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Overview => render_overview(frame, chunks[2], app),
        View::Contributions => render_contributions(frame, chunks[2], app),
        View::Blog => render_blog(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.colors);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let name = app.config.personal.name.clone();
    let mut clock = Local::now().format("%H:%M:%S").to_string();
    if !app.config.personal.timezone.is_empty() {
        clock = format!("{} {}", clock, app.config.personal.timezone);
    }
    let right = format!("{}  {}", clock, app.theme_store.get());
    let padding = (area.width as usize).saturating_sub(name.chars().count() + right.len());

    let title = Line::from(vec![
        Span::styled(name, Style::default().fg(colors.title_color).bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = View::ALL.iter().position(|v| *v == app.current_view).unwrap_or(0);
    let tabs = Tabs::new(View::ALL.iter().map(|v| v.title()))
        .select(selected)
        .style(Style::default().fg(app.colors.muted))
        .highlight_style(Style::default().fg(app.colors.title_color).bold().reversed())
        .divider(" | ");
    frame.render_widget(tabs, area);
}

fn section(title: &str, colors: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), colors.header_style.fg(colors.accent)))
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let config = &app.config;
    let today = Local::now().date_naive();

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).split(area);

    let mut lines = Vec::new();
    if !config.personal.surname.is_empty() {
        lines.push(Line::from(Span::styled(
            config.personal.surname.clone(),
            Style::default().fg(colors.text).bold(),
        )));
    }
    let mut meta = vec![config.personal.location.clone(), config.personal.availability.clone()];
    meta.retain(|m| !m.is_empty());
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(meta.join("  |  "), Style::default().fg(colors.muted))));
    }
    if !config.personal.bio.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(config.personal.bio.clone()));
    }
    if !config.skills.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Skills", colors));
        lines.push(Line::from(config.skills.join(" · ")));
    }

    if !config.experience.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Experience", colors));
        for (idx, exp) in config.experience.iter().enumerate() {
            let mut spans = vec![
                Span::styled(exp.role.clone(), Style::default().bold()),
                Span::raw(" @ "),
                Span::styled(exp.company.clone(), Style::default().fg(colors.title_color)),
                Span::raw("  "),
                Span::styled(exp.period.clone(), Style::default().fg(colors.muted)),
            ];
            // Only the current role counts up
            if idx == 0 {
                if let Some(tenure) = tenure_label(exp, today) {
                    spans.push(Span::styled(format!("  {}", tenure), Style::default().fg(colors.accent)));
                }
            }
            lines.push(Line::from(spans));
        }
    }

    if !config.projects.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Projects", colors));
        for project in &config.projects {
            let marker = if project.featured { "★ " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(colors.accent)),
                Span::styled(project.title.clone(), Style::default().bold()),
            ];
            if !project.desc.is_empty() {
                spans.push(Span::styled(format!("  {}", project.desc), Style::default().fg(colors.muted)));
            }
            lines.push(Line::from(spans));
        }
    }

    let profile = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default());
    frame.render_widget(profile, chunks[0]);

    render_activity(frame, chunks[1], app.page.activity.as_ref(), app);
}

/// Heat strip: one column per week, one row per weekday, newest on the right
fn render_activity(frame: &mut Frame, area: Rect, activity: Option<&Activity>, app: &App) {
    let colors = &app.colors;
    let Some(activity) = activity else {
        let text = if app.is_loading {
            format!("{} Loading activity...", SPINNER[app.spinner_frame % SPINNER.len()])
        } else {
            "Contribution activity unavailable".to_string()
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(colors.muted)),
            area,
        );
        return;
    };

    let weeks = activity.weeks();
    let max_weeks = (area.width as usize / 2).max(1);
    let shown = &weeks[weeks.len().saturating_sub(max_weeks)..];

    let mut lines = vec![Line::from(Span::styled(
        format!("{} contributions in the last year", activity.total),
        Style::default().fg(colors.muted),
    ))];
    for weekday in 0..7 {
        let spans: Vec<Span> = shown
            .iter()
            .map(|week| match week[weekday] {
                Some(day) => Span::styled("■ ", Style::default().fg(colors.heat_color(day.level))),
                None => Span::raw("  "),
            })
            .collect();
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn status_span(status: ContributionStatus, colors: &ThemeColors) -> Span<'static> {
    Span::styled(
        format!("{:<8}", status.label()),
        Style::default().fg(colors.status_color(status)),
    )
}

fn entry_line(entry: &GroupEntry, app: &App) -> Line<'static> {
    let colors = &app.colors;
    let index = Span::styled(format!("    {:>3}. ", entry.id.0 + 1), Style::default().fg(colors.index_color));
    let locator = PrLocator::parse(&entry.reference.pr_url).ok();
    let short = locator.as_ref().map(|l| format!("#{}", l.number)).unwrap_or_default();

    let mut spans = vec![index];
    let record = app
        .tracker
        .state(entry.id)
        .into_record(locator.as_ref().map(PrLocator::repo_key));
    match record {
        None => spans.push(Span::styled(short, Style::default().fg(colors.muted))),
        Some(enriched) if enriched.is_loading => {
            let frame = SPINNER[app.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(format!("{} loading {}", frame, short), Style::default().fg(colors.muted)));
        }
        Some(enriched) => {
            spans.push(status_span(enriched.status, colors));
            spans.push(Span::raw(enriched.display_title));
            spans.push(Span::styled(format!("  {}", short), Style::default().fg(colors.muted)));
            match enriched.source {
                Resolution::Private => {
                    spans.push(Span::styled("  private", Style::default().fg(colors.accent)));
                }
                Resolution::Fallback(Fallback::NotFound) => {
                    spans.push(Span::styled("  not found", Style::default().fg(colors.status_closed)));
                }
                _ => {}
            }
        }
    }
    Line::from(spans)
}

fn render_contributions(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.grouping.groups.is_empty() {
        let empty = Paragraph::new("No contributions configured").alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);

    let items: Vec<ListItem> = app
        .visible_rows()
        .into_iter()
        .filter_map(|row| match row {
            ListRow::Header(g) => {
                let group = app.group_at(g)?;
                let arrow = if app.is_expanded(group) { "▾" } else { "▸" };
                Some(ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", arrow), Style::default().fg(app.colors.muted)),
                    Span::styled(group.repo_key.to_string(), Style::default().fg(app.colors.title_color).bold()),
                    Span::styled(format!(" ({})", group.count()), Style::default().fg(app.colors.muted)),
                ])))
            }
            ListRow::Entry(g, e) => app.entry_at(g, e).map(|entry| ListItem::new(entry_line(entry, app))),
        })
        .collect();

    let list = List::new(items).highlight_style(app.colors.row_selected);
    frame.render_stateful_widget(list, chunks[0], &mut app.list_state);

    // Detail line for the selected entry: link target and owner avatar
    if let Some(entry) = app.selected_entry() {
        let avatar = match Avatar::for_reference(&entry.reference) {
            Avatar::Image(url) => url,
            Avatar::Placeholder => "no avatar".to_string(),
        };
        let detail = format!("{}  ·  {}", entry.reference.link(), avatar);
        frame.render_widget(
            Paragraph::new(detail).style(Style::default().fg(app.colors.muted)),
            chunks[1],
        );
    }
}

fn render_blog(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    if app.page.posts.is_empty() {
        let text = if app.is_loading {
            format!("{} Loading posts...", SPINNER[app.spinner_frame % SPINNER.len()])
        } else {
            "No blog posts".to_string()
        };
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
        return;
    }

    let items: Vec<ListItem> = app
        .page
        .posts
        .iter()
        .map(|post| {
            let mut meta = post.display_date();
            for category in post.top_categories() {
                meta.push_str(&format!("  #{}", category));
            }
            let mut lines = vec![
                Line::from(Span::styled(post.title.clone(), Style::default().bold())),
                Line::from(Span::styled(meta, Style::default().fg(colors.accent))),
                Line::from(Span::styled(post.clean_description(), Style::default().fg(colors.muted))),
            ];
            if let Some(thumbnail) = post.display_thumbnail() {
                lines.push(Line::from(Span::styled(
                    format!("image: {}", thumbnail),
                    Style::default().fg(colors.index_color),
                )));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).highlight_style(colors.row_selected);
    frame.render_stateful_widget(list, area, &mut app.blog_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let pending = app.tracker.pending_count();
        let mut spans = vec![Span::styled(
            format!("{} contributions in {} repos", app.grouping.total(), app.grouping.groups.len()),
            Style::default().fg(colors.muted),
        )];
        if pending > 0 {
            spans.push(Span::styled(format!(" ({} loading)", pending), Style::default().fg(colors.muted)));
        }
        spans.push(Span::raw("  "));

        let hints = [
            ("j/k", ":nav "),
            ("Tab", ":view "),
            ("Enter", ":expand "),
            ("o", ":open "),
            ("t", ":theme "),
            ("?", ":help "),
            ("q", ":quit"),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 13, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Tab           ", "Next view"),
        ("Enter         ", "Expand repository / open"),
        ("o             ", "Open in browser"),
        ("t             ", "Toggle dark/light theme"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
