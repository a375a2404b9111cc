//! Contribution activity calendar (last twelve months)

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

use crate::theme::Theme;

/// Contribution intensity buckets, 0 (none) through 4 (most)
pub const LEVELS: usize = 5;

const LIGHT_PALETTE: [(u8, u8, u8); LEVELS] = [
    (0xeb, 0xed, 0xf0),
    (0x9b, 0xe9, 0xa8),
    (0x40, 0xc4, 0x60),
    (0x30, 0xa1, 0x4e),
    (0x21, 0x6e, 0x39),
];

const DARK_PALETTE: [(u8, u8, u8); LEVELS] = [
    (0x1f, 0x23, 0x28),
    (0x0e, 0x44, 0x29),
    (0x40, 0xc4, 0x63),
    (0x26, 0xa6, 0x41),
    (0x39, 0xd3, 0x53),
];

/// RGB colour per level for the given theme
pub fn palette(theme: Theme) -> [(u8, u8, u8); LEVELS] {
    match theme {
        Theme::Light => LIGHT_PALETTE,
        Theme::Dark => DARK_PALETTE,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub total: u32,
    pub days: Vec<ActivityDay>,
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    total: HashMap<String, u32>,
    contributions: Vec<ActivityDay>,
}

/// One calendar column, indexed by weekday with Sunday at 0
pub type Week<'a> = [Option<&'a ActivityDay>; 7];

impl Activity {
    /// Days laid out in Sunday-first week columns, oldest first.
    ///
    /// The first column is padded up to the first day's weekday so every
    /// row lines up with one weekday. Missing dates stay `None`.
    pub fn weeks(&self) -> Vec<Week<'_>> {
        let mut weeks: Vec<(NaiveDate, Week<'_>)> = Vec::new();
        for day in &self.days {
            let slot = day.date.weekday().num_days_from_sunday() as usize;
            let week_start = day.date - Duration::days(slot as i64);
            match weeks.last_mut() {
                Some((start, week)) if *start == week_start => week[slot] = Some(day),
                _ => {
                    let mut week = [None; 7];
                    week[slot] = Some(day);
                    weeks.push((week_start, week));
                }
            }
        }
        weeks.into_iter().map(|(_, week)| week).collect()
    }
}

async fn try_fetch_activity(client: &reqwest::Client, calendar_api: &str, username: &str) -> Result<Activity> {
    let url = format!("{}/v4/{}?y=last", calendar_api.trim_end_matches('/'), username);

    let response: CalendarResponse = client
        .get(&url)
        .send()
        .await
        .context("Failed to reach calendar API")?
        .error_for_status()
        .context("Calendar API returned an error")?
        .json()
        .await
        .context("Failed to parse calendar JSON")?;

    let mut days = response.contributions;
    days.sort_by_key(|d| d.date);
    for day in &mut days {
        day.level = day.level.min((LEVELS - 1) as u8);
    }

    Ok(Activity {
        total: response.total.values().sum(),
        days,
    })
}

/// Fetch the contribution calendar for `username`; `None` on any failure.
pub async fn fetch_activity(client: &reqwest::Client, calendar_api: &str, username: &str) -> Option<Activity> {
    match try_fetch_activity(client, calendar_api, username).await {
        Ok(activity) => Some(activity),
        Err(e) => {
            log::warn!("Error fetching contribution calendar: {:#}", e);
            None
        }
    }
}
