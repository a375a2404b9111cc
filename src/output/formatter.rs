use chrono::NaiveDate;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::blog::BlogPost;
use crate::calendar::Activity;
use crate::config::{Config, Experience, Project};
use crate::contributions::{
    ContributionId, ContributionReference, ContributionStatus, EnrichedContribution, Fallback,
    Grouping, PrLocator, Resolution,
};
use crate::experience::{current_role, tenure_label};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit `title` into whatever is left of the terminal after `fixed_width`
fn fit_title(title: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_title(title, width - fixed_width),
        Some(_) => truncate_title(title, 20),
        None => title.to_string(),
    }
}

/// "owner/repo#58" for a parseable reference, the raw URL otherwise
fn short_ref(reference: &ContributionReference) -> String {
    PrLocator::parse(&reference.pr_url)
        .map(|locator| locator.short_ref())
        .unwrap_or_else(|_| reference.pr_url.clone())
}

/// Fixed-width status badge, e.g. "[merged ]"
pub fn format_status(status: ContributionStatus, use_colors: bool) -> String {
    let badge = format!("[{:<7}]", status.label());
    if !use_colors {
        return badge;
    }
    match status {
        ContributionStatus::Merged => badge.magenta().to_string(),
        ContributionStatus::Open => badge.green().to_string(),
        ContributionStatus::Closed => badge.red().to_string(),
        ContributionStatus::Unknown => badge.dimmed().to_string(),
    }
}

/// Header block: name, tagline, location and the current role with tenure
pub fn format_profile(config: &Config, today: NaiveDate, use_colors: bool) -> String {
    let personal = &config.personal;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(personal.name.bold().to_string());
    } else {
        lines.push(personal.name.clone());
    }
    if !personal.surname.is_empty() {
        lines.push(personal.surname.clone());
    }

    let mut meta = Vec::new();
    if !personal.location.is_empty() {
        meta.push(personal.location.clone());
    }
    if !personal.availability.is_empty() {
        meta.push(personal.availability.clone());
    }
    if let Some(role) = current_role(&config.experience) {
        let mut current = format!("{} @ {}", role.role, role.company);
        if let Some(tenure) = tenure_label(role, today) {
            current = format!("{} ({})", current, tenure);
        }
        meta.push(current);
    }
    if !meta.is_empty() {
        let joined = meta.join("  |  ");
        lines.push(if use_colors { joined.dimmed().to_string() } else { joined });
    }

    if !personal.bio.is_empty() {
        lines.push(String::new());
        lines.push(personal.bio.clone());
    }
    if !config.skills.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skills: {}", config.skills.join(", ")));
    }
    lines.join("\n")
}

/// Experience entries, newest first as configured. Only the current role
/// carries a tenure counter.
pub fn format_experience(experience: &[Experience], today: NaiveDate, use_colors: bool) -> String {
    if experience.is_empty() {
        return "No experience listed.".to_string();
    }

    experience
        .iter()
        .enumerate()
        .map(|(idx, exp)| {
            let tenure = if idx == 0 { tenure_label(exp, today) } else { None };
            let period = match tenure {
                Some(t) if exp.period.is_empty() => t,
                Some(t) => format!("{} · {}", exp.period, t),
                None => exp.period.clone(),
            };
            let heading = if use_colors {
                format!("{} @ {}  {}", exp.role.bold(), exp.company.cyan(), period.dimmed())
            } else {
                format!("{} @ {}  {}", exp.role, exp.company, period)
            };
            if exp.description.is_empty() {
                heading
            } else {
                format!("{}\n  {}", heading, exp.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Projects, featured ones first, configured order otherwise
pub fn format_projects(projects: &[Project], use_colors: bool) -> String {
    if projects.is_empty() {
        return "No projects listed.".to_string();
    }

    let mut ordered: Vec<&Project> = projects.iter().collect();
    ordered.sort_by_key(|p| !p.featured);

    ordered
        .iter()
        .map(|p| {
            let mut title = p.title.clone();
            if p.collaborative {
                title.push_str(" (collab)");
            }
            let title = if use_colors { title.bold().to_string() } else { title };
            let mut lines = vec![title];
            if !p.desc.is_empty() {
                lines.push(format!("  {}", p.desc));
            }
            if !p.tags.is_empty() {
                lines.push(format!("  {}", p.tags.join(" · ")));
            }
            if !p.href.is_empty() {
                let href = if use_colors { p.href.underline().to_string() } else { p.href.clone() };
                lines.push(format!("  {}", href));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapsed group view: one header per repository, then the 1-based index
/// and short reference of each entry
pub fn format_groups(grouping: &Grouping, use_colors: bool) -> String {
    if grouping.groups.is_empty() {
        return "No contributions found.".to_string();
    }

    grouping
        .groups
        .iter()
        .map(|group| {
            let header = format!("{} ({})", group.repo_key, group.count());
            let header = if use_colors { header.bold().to_string() } else { header };
            let mut lines = vec![header];
            for entry in &group.entries {
                let index = format!("{:>3}.", entry.id.0 + 1);
                let reference = short_ref(&entry.reference);
                if use_colors {
                    lines.push(format!("  {} {}", index.dimmed(), reference.underline()));
                } else {
                    lines.push(format!("  {} {}", index, reference));
                }
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A resolved contribution ready for display
pub struct EnrichedRow<'a> {
    pub id: ContributionId,
    pub reference: &'a ContributionReference,
    pub enriched: &'a EnrichedContribution,
}

/// Format enriched rows with columns: Index, Status, Title, Reference
/// Index column: 4 chars ("999."), right-aligned, matching `folio open`
pub fn format_enriched_table(rows: &[EnrichedRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No contributions found.".to_string();
    }

    let index_width = 4;
    let status_width = 9;
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let index_str = format!("{:>3}.", row.id.0 + 1);
            let status = format_status(row.enriched.status, use_colors);
            let reference = short_ref(row.reference);
            let mut marker = "";
            if row.reference.is_private {
                marker = " (private)";
            } else if row.enriched.source == Resolution::Fallback(Fallback::NotFound) {
                marker = " (not found)";
            }

            let fixed_width = index_width + 1 + status_width + separator.len() * 2 + reference.len() + marker.len();
            let title = fit_title(&row.enriched.display_title, fixed_width);

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str.dimmed(),
                    status,
                    separator,
                    title,
                    separator,
                    reference.underline(),
                    marker.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str, status, separator, title, separator, reference, marker
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blog posts as small cards: title, date and categories, teaser, link
pub fn format_blog_cards(posts: &[BlogPost], use_colors: bool) -> String {
    if posts.is_empty() {
        return "No blog posts found.".to_string();
    }

    posts
        .iter()
        .map(|post| {
            let title = fit_title(&post.title, 2);
            let mut meta = post.display_date();
            if !post.top_categories().is_empty() {
                meta = format!("{}  #{}", meta, post.top_categories().join(" #"));
            }
            if use_colors {
                format!(
                    "{}\n  {}\n  {}\n  {}",
                    title.bold(),
                    meta.dimmed(),
                    post.clean_description(),
                    post.link.underline()
                )
            } else {
                format!(
                    "{}\n  {}\n  {}\n  {}",
                    title,
                    meta,
                    post.clean_description(),
                    post.link
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One-line activity summary
pub fn format_activity(activity: Option<&Activity>) -> String {
    match activity {
        Some(a) => format!("{} contributions in the last year", a.total),
        None => "Contribution activity unavailable.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::contributions::{group, PrState, RepoKey};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn sample_config() -> Config {
        parse_config(
            r#"
personal:
  name: Paras
  surname: A Full Stack web developer.
  location: India
skills: [Rust, Go]
experience:
  - company: Jspark AI
    role: SDE Intern
    period: Nov 2025 - Present
    start_date: "2025-11-01"
  - company: Earlier Co
    role: Intern
    period: "2024"
    start_date: "2024-01-01"
projects:
  - title: Plain
    desc: A plain project
  - title: Star
    featured: true
    collaborative: true
    tags: [Rust]
"#,
        )
        .unwrap()
    }

    fn remote(title: &str, status: ContributionStatus) -> EnrichedContribution {
        EnrichedContribution {
            repo_key: Some(RepoKey::new("owner", "repo")),
            display_title: title.to_string(),
            status,
            is_loading: false,
            source: Resolution::Remote,
        }
    }

    #[test]
    fn test_format_status_plain() {
        assert_eq!(format_status(ContributionStatus::Merged, false), "[merged ]");
        assert_eq!(format_status(ContributionStatus::Unknown, false), "[unknown]");
    }

    #[test]
    fn test_format_profile_shows_current_tenure() {
        let result = format_profile(&sample_config(), today(), false);
        assert!(result.starts_with("Paras\nA Full Stack web developer."));
        assert!(result.contains("SDE Intern @ Jspark AI (3 mos)"));
        assert!(result.contains("Skills: Rust, Go"));
    }

    #[test]
    fn test_format_experience_tenure_only_on_current_role() {
        let config = sample_config();
        let result = format_experience(&config.experience, today(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "SDE Intern @ Jspark AI  Nov 2025 - Present · 3 mos");
        assert_eq!(lines[1], "Intern @ Earlier Co  2024");
    }

    #[test]
    fn test_format_projects_featured_first() {
        let result = format_projects(&sample_config().projects, false);
        assert!(result.starts_with("Star (collab)"));
        assert!(result.contains("Plain\n  A plain project"));
    }

    #[test]
    fn test_format_groups_collapsed() {
        let refs = vec![
            ContributionReference::public("https://github.com/a/x/pull/1"),
            ContributionReference::public("https://github.com/b/y/pull/2"),
            ContributionReference::public("https://github.com/a/x/pull/3"),
        ];
        let result = format_groups(&group(&refs), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "a/x (2)");
        assert_eq!(lines[1], "    1. a/x#1");
        assert_eq!(lines[2], "    3. a/x#3");
        assert_eq!(lines[3], "b/y (1)");
    }

    #[test]
    fn test_format_groups_empty() {
        assert_eq!(format_groups(&group(&[]), false), "No contributions found.");
    }

    #[test]
    fn test_format_enriched_table() {
        let public = ContributionReference::public("https://github.com/owner/repo/pull/58");
        let private = ContributionReference::private(
            "https://github.com/owner/repo/pull/17",
            Some("Smart alerts"),
            Some(PrState::Merged),
        );
        let merged = remote("Add hover icons", ContributionStatus::Merged);
        let settled = EnrichedContribution {
            source: Resolution::Private,
            ..remote("Smart alerts", ContributionStatus::Merged)
        };
        let rows = vec![
            EnrichedRow { id: ContributionId(0), reference: &public, enriched: &merged },
            EnrichedRow { id: ContributionId(1), reference: &private, enriched: &settled },
        ];

        let result = format_enriched_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. [merged ]"));
        assert!(lines[0].contains("Add hover icons"));
        assert!(lines[0].ends_with("owner/repo#58"));
        assert!(lines[1].ends_with("owner/repo#17 (private)"));
    }

    #[test]
    fn test_format_enriched_table_marks_not_found() {
        let reference = ContributionReference::public("https://github.com/owner/repo/pull/9");
        let missing = EnrichedContribution {
            source: Resolution::Fallback(Fallback::NotFound),
            ..remote("Pull Request #9", ContributionStatus::Unknown)
        };
        let rows = vec![EnrichedRow { id: ContributionId(4), reference: &reference, enriched: &missing }];
        let result = format_enriched_table(&rows, false);
        assert!(result.starts_with("  5. [unknown]"));
        assert!(result.ends_with("(not found)"));
    }

    #[test]
    fn test_format_blog_cards() {
        let post = BlogPost {
            title: "Hello".to_string(),
            pub_date: "2025-01-05 10:00:00".to_string(),
            link: "https://medium.com/@someone/hello".to_string(),
            guid: String::new(),
            author: String::new(),
            thumbnail: String::new(),
            description: "<p>Short</p>".to_string(),
            content: String::new(),
            categories: vec!["rust".to_string()],
        };
        let result = format_blog_cards(&[post], false);
        assert!(result.contains("Jan 5, 2025  #rust"));
        assert!(result.contains("Short..."));
        assert!(result.ends_with("https://medium.com/@someone/hello"));
        assert_eq!(format_blog_cards(&[], false), "No blog posts found.");
    }

    #[test]
    fn test_format_activity() {
        let activity = Activity { total: 42, days: Vec::new() };
        assert_eq!(format_activity(Some(&activity)), "42 contributions in the last year");
        assert_eq!(format_activity(None), "Contribution activity unavailable.");
    }

    #[test]
    fn test_truncate_title_long() {
        assert_eq!(truncate_title("This is a very long title", 15), "This is a ve...");
    }

    #[test]
    fn test_truncate_title_very_narrow() {
        assert_eq!(truncate_title("Hello world", 3), "Hel");
    }
}
