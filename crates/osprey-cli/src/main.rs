use clap::{Parser, Subcommand};

use osprey_analysis::{AnalysisPipeline, ProfileReport};

#[derive(Debug, Parser)]
#[command(name = "osprey")]
#[command(about = "Profile reconnaissance pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape, analyze and cache one profile, then print the report.
    Analyze {
        /// Profile username to analyze.
        username: String,
        /// Bypass the cache and recompute.
        #[arg(long)]
        refresh: bool,
        /// Print the full report as JSON instead of the summary.
        #[arg(long)]
        json: bool,
    },
    /// Acquire a browser session and print the cookie names (diagnostics).
    Session,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            username,
            refresh,
            json,
        } => analyze(&username, refresh, json).await,
        Commands::Session => session().await,
    }
}

async fn analyze(username: &str, refresh: bool, json: bool) -> anyhow::Result<()> {
    let config = osprey_core::load_app_config()?;
    let pool_config = osprey_db::PoolConfig::from_app_config(&config);
    let pool = osprey_db::connect_pool(&config.database_url, pool_config).await?;
    osprey_db::run_migrations(&pool).await?;

    let pipeline = AnalysisPipeline::from_app_config(&config, pool)?;
    let report = pipeline.analyze(username, refresh).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ProfileReport) {
    let profile = &report.profile;
    let analysis = &report.analysis;

    println!("Profile: {}", profile.username);
    if let Some(full_name) = &profile.full_name {
        println!("Name:    {full_name}");
    }
    if let Some(followers) = profile.followers_count {
        println!("Followers: {followers}");
    }
    if let Some(posts) = &profile.posts {
        println!("Posts:   {}", posts.len());
    }
    println!(
        "Source:  {}",
        if report.served_from_cache {
            "cache"
        } else {
            "fresh"
        }
    );
    println!();
    println!(
        "Analysis ({} / schema {}):",
        analysis.analysis_metadata.model_used, analysis.analysis_metadata.analysis_version
    );
    println!("{}", analysis.initial_profile_analysis.profile_overview);
    if !analysis.initial_profile_analysis.biography_summary.is_empty() {
        println!();
        println!("{}", analysis.initial_profile_analysis.biography_summary);
    }
}

async fn session() -> anyhow::Result<()> {
    let config = osprey_core::load_app_config()?;
    let acquirer = osprey_scraper::SessionAcquirer::new(
        config.session_landing_url.clone(),
        config.session_timeout_secs,
    );
    let credentials = acquirer.acquire().await?;
    println!("acquired {} cookies:", credentials.cookie_names().len());
    for name in credentials.cookie_names() {
        println!("  {name}");
    }
    Ok(())
}
