pub mod formatter;

pub use formatter::{
    format_activity, format_blog_cards, format_enriched_table, format_experience, format_groups,
    format_profile, format_projects, format_status, should_use_colors, EnrichedRow,
};
