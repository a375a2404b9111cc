use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use folio::config::Config;
use folio::contributions::Grouping;
use folio::theme::{Theme, ThemeStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
    /// Use the dark theme
    Dark,
    /// Use the light theme
    Light,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive portfolio (default if no subcommand)
    Show,
    /// Print contributions grouped by repository
    List {
        /// Look up every contribution and print titles and statuses
        #[arg(long)]
        expand: bool,
    },
    /// Open a contribution in the browser by its index number
    Open {
        /// Index number of the contribution (1-based, as shown in list)
        index: usize,
    },
    /// Print recent blog posts
    Blog,
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Create a content file interactively
    Init {
        /// Where to write the content file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "A personal portfolio in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to content file (defaults to ~/.config/folio/portfolio.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn load_config_or_exit(path: Option<String>) -> Config {
    let config = match folio::config::load_config(path.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Content problems are reported but never stop the portfolio
    if let Err(errors) = folio::config::validate_config(&config) {
        for error in errors {
            log::warn!("Content problem: {}", error);
        }
    }
    config
}

fn http_client_or_exit(config: &Config) -> reqwest::Client {
    match folio::github::create_http_client(config.settings.lookup_timeout()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    }
}

fn lookup_or_exit(
    config: &Config,
    http: &reqwest::Client,
) -> std::sync::Arc<dyn folio::github::PullRequestLookup> {
    let token = folio::github::get_token_from_env();
    match folio::github::build_lookup(&config.settings, http.clone(), token) {
        Ok(lookup) => lookup,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    }
}

fn run_theme(action: Option<ThemeAction>) {
    let store = ThemeStore::load(
        folio::theme::get_theme_path(),
        folio::theme::detect_system_theme,
    );
    let theme = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => store.get(),
        ThemeAction::Toggle => store.toggle(),
        ThemeAction::Dark => {
            store.set(Theme::Dark);
            store.get()
        }
        ThemeAction::Light => {
            store.set(Theme::Light);
            store.get()
        }
    };
    println!("{}", theme);
}

async fn run_list(config: &Config, grouping: &Grouping, expand: bool, use_colors: bool) {
    if !expand {
        println!("{}", folio::output::format_groups(grouping, use_colors));
        return;
    }

    let http = http_client_or_exit(config);
    let lookup = lookup_or_exit(config, &http);
    let resolved = folio::fetch::resolve_all(
        &config.contributions,
        lookup,
        config.settings.lookup_timeout(),
    )
    .await;

    let rows: Vec<folio::output::EnrichedRow> = resolved
        .iter()
        .map(|(id, enriched)| folio::output::EnrichedRow {
            id: *id,
            reference: &config.contributions[id.0],
            enriched,
        })
        .collect();
    println!("{}", folio::output::format_enriched_table(&rows, use_colors));
}

fn print_portfolio(config: &Config, grouping: &Grouping, page: &folio::fetch::PageData) {
    let today = chrono::Local::now().date_naive();
    let sections = [
        folio::output::format_profile(config, today, false),
        format!("Experience\n{}", folio::output::format_experience(&config.experience, today, false)),
        format!("Projects\n{}", folio::output::format_projects(&config.projects, false)),
        format!("Contributions\n{}", folio::output::format_groups(grouping, false)),
        format!("Activity\n{}", folio::output::format_activity(page.activity.as_ref())),
        format!("Blog\n{}", folio::output::format_blog_cards(&page.posts, false)),
    ];
    println!("{}", sections.join("\n\n"));
}

#[tokio::main]
async fn main() {
    folio::github::install_crypto_provider();

    let cli = Cli::parse();
    folio::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Show);
    let start_time = Instant::now();

    // Commands that do not need the content file
    match command {
        Commands::Init { output } => {
            let output = output.or_else(|| cli.config.clone().map(PathBuf::from));
            if let Err(e) = folio::config::init::run_init_wizard(output) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Theme { action } => {
            run_theme(action);
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    let config = load_config_or_exit(cli.config);
    let grouping = folio::contributions::group_and_report(&config.contributions);
    let use_colors = folio::output::should_use_colors();

    match command {
        Commands::List { expand } => {
            run_list(&config, &grouping, expand, use_colors).await;
            log::debug!(
                "Listed {} contributions in {:?}",
                grouping.total(),
                start_time.elapsed()
            );
        }
        Commands::Open { index } => {
            let count = config.contributions.len();
            if index < 1 || index > count {
                eprintln!("Invalid index {}. Must be between 1 and {}.", index, count);
                std::process::exit(EXIT_CONFIG);
            }

            let reference = &config.contributions[index - 1];
            match folio::browser::open_contribution(reference) {
                Ok(url) => println!("Opening contribution #{} in browser: {}", index, url),
                Err(e) => {
                    eprintln!("Failed to open browser: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
        Commands::Blog => {
            let Some(medium_url) = config.medium_url.as_deref() else {
                eprintln!("No medium_url configured in the content file.");
                std::process::exit(EXIT_CONFIG);
            };
            let http = http_client_or_exit(&config);
            let posts = folio::blog::fetch_posts(&http, &config.settings.feed_bridge, medium_url).await;
            println!("{}", folio::output::format_blog_cards(&posts, use_colors));
        }
        Commands::Show if !use_colors => {
            // Not a terminal: print the portfolio once instead of the TUI
            let http = http_client_or_exit(&config);
            let page = folio::fetch::load_page_data(&http, &config).await;
            print_portfolio(&config, &grouping, &page);
        }
        Commands::Show => {
            let http = http_client_or_exit(&config);
            let lookup = lookup_or_exit(&config, &http);
            let tracker =
                folio::contributions::EnrichmentTracker::new(lookup, config.settings.lookup_timeout());
            let store = ThemeStore::load(
                folio::theme::get_theme_path(),
                folio::theme::detect_system_theme,
            );

            let app = folio::tui::App::new(config, grouping, tracker, store);
            if let Err(e) = folio::tui::run_tui(app, http).await {
                eprintln!("Terminal error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        // Handled before the content file is loaded
        Commands::Init { .. } | Commands::Theme { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
