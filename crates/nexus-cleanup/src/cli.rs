//! CLI argument definitions using clap

use camino::Utf8PathBuf;
use clap::Parser;
use nexus_retention::{CleanupRequest, CleanupSettings};

/// nexus-cleanup - Keep the newest K versions of each component in a Nexus repository
#[derive(Parser, Debug)]
#[command(name = "nexus-cleanup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository to clean (docker or maven2)
    #[arg(short, long)]
    pub repository: String,

    /// Number of versions to keep per component (at most 10)
    #[arg(short, long, allow_hyphen_values = true)]
    pub keep: String,

    /// Only clean this component (default: all components)
    #[arg(short, long)]
    pub component: Option<String>,

    /// Nexus base URL
    #[arg(long)]
    pub host: Option<String>,

    /// Nexus username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Nexus password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Compaction task to run after a docker cleanup
    #[arg(short, long)]
    pub task: Option<String>,

    /// External tool used to un-tag docker images
    #[arg(long)]
    pub untag_tool: Option<String>,

    /// Path to a YAML settings file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Overlay flags given on the command line onto `settings`
    pub fn apply_to(&self, mut settings: CleanupSettings) -> CleanupSettings {
        let flags = [
            (&self.host, &mut settings.host),
            (&self.username, &mut settings.username),
            (&self.password, &mut settings.password),
            (&self.task, &mut settings.task),
            (&self.untag_tool, &mut settings.untag_tool),
        ];
        for (flag, field) in flags {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        settings
    }

    /// Build the run request from the resolved settings
    pub fn to_request(&self, settings: &CleanupSettings) -> CleanupRequest {
        CleanupRequest {
            repository: self.repository.clone(),
            keep: self.keep.clone(),
            component: self.component.clone(),
            host: settings.host.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            task: settings.task.clone(),
            dry_run: self.dry_run,
        }
    }
}
