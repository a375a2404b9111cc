pub mod blog;
pub mod browser;
pub mod calendar;
pub mod config;
pub mod contributions;
pub mod experience;
pub mod fetch;
pub mod github;
pub mod logging;
pub mod output;
pub mod stderr_buffer;
pub mod theme;
pub mod tui;
