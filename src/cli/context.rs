//! Shared run context
//!
//! Everything a run needs before the first evaluation starts.

use crate::cli::RunOptions;
use merge_list::auth::get_github_auth;
use merge_list::config::{Config, load_config, split_list};
use merge_list::error::Result;
use merge_list::platform::{GitHubService, PlatformService};
use merge_list::report::Templates;
use tracing::{debug, info};

/// Setup shared by the whole run
///
/// Built up front so that missing credentials, config or templates fail the
/// run before any API work is done.
pub struct CommandContext {
    /// Effective configuration (file plus CLI overrides)
    pub config: Config,
    /// Report templates
    pub templates: Templates,
    /// Platform service, scoped to this run
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(options: &RunOptions) -> Result<Self> {
        let mut config = load_config(options.config_path.as_deref())?;

        if let Some(ref milestones) = options.ignore_milestones {
            config.report.ignore_milestones = split_list(milestones);
        }
        if let Some(ref labels) = options.ignore_labels {
            config.report.ignore_labels = split_list(labels);
        }
        info!(milestones = ?config.report.ignore_milestones, "ignored milestones");
        info!(labels = ?config.report.ignore_labels, "ignored labels");

        let templates = Templates::load(&config.report)?;

        let auth = get_github_auth().await?;
        debug!(source = ?auth.source, "resolved GitHub token");

        let platform = GitHubService::new(
            &auth.token,
            options.owner.clone(),
            options.repo.clone(),
            options.host.clone(),
        )?;

        Ok(Self {
            config,
            templates,
            platform: Box::new(platform),
        })
    }
}
