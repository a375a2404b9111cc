use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contributions::ContributionReference;
use crate::github::client::DEFAULT_API_BASE;

/// Full portfolio content as written in portfolio.yaml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub personal: Personal,
    /// GitHub login used for the activity calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(default)]
    pub socials: Vec<Social>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub contributions: Vec<ContributionReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_url: Option<String>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Personal {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Social {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Experience {
    pub company: String,
    #[serde(default)]
    pub company_url: String,
    pub role: String,
    /// Free-form period label, e.g. "Nov 2025 - Present"
    #[serde(default)]
    pub period: String,
    /// ISO date the role started, drives the tenure counter
    pub start_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub linkedin: String,
}

impl Experience {
    pub fn start(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub featured: bool,
}

/// Endpoints and limits for the read-only APIs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api_base: String,
    pub feed_bridge: String,
    pub calendar_api: String,
    pub lookup_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            feed_bridge: "https://api.rss2json.com".to_string(),
            calendar_api: "https://github-contributions-api.jogruber.de".to_string(),
            lookup_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.lookup_timeout_secs.max(1))
    }
}
