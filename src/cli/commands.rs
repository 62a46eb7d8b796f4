use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "greader-notify")]
#[command(about = "Forward unread FreshRSS items as apprise notifications")]
#[command(version)]
pub struct Cli {
    /// Dry run - log notifications instead of invoking apprise
    #[arg(long)]
    pub dry_run: bool,

    /// Notify the current unread items once and exit instead of polling
    #[arg(long)]
    pub once: bool,
}
