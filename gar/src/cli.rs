use crate::ui;
use anyhow::{Context, Result};
use clap::Parser;
use gar_lib::config::Config;
use gar_lib::credentials::Credentials;
use gar_lib::http_client::build_client;
use gar_lib::release::RetrievalTarget;
use gar_lib::retrieve::retrieve_assets;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gar")]
#[command(about = "Retrieve every asset attached to a GitHub release")]
#[command(version)]
pub struct Cli {
    /// Owner of the repository (user or organization)
    pub owner: String,

    /// Name of the repository
    pub repository: String,

    /// Tag of the release whose assets are retrieved
    pub tag: String,

    /// Personal access token used to authenticate
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory the assets are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Origin of the GitHub REST API (for GitHub Enterprise hosts)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::setup(self.api_url.as_deref(), Some(self.output_dir.as_path()))?;

        let credentials = Credentials::new(self.token.unwrap_or_default());
        if credentials.is_empty() {
            ui::warning("GITHUB_TOKEN is not set; requests are sent without a usable token");
        }

        let target = RetrievalTarget::new(self.owner, self.repository, self.tag);
        let client = build_client()?;

        let retrieved = retrieve_assets(&client, &config, &target, &credentials)
            .await
            .with_context(|| format!("Failed to retrieve assets of {target}"))?;

        let total: u64 = retrieved.iter().map(|a| a.bytes).sum();
        ui::success(&format!(
            "Retrieved {} assets ({} bytes) into {}",
            retrieved.len(),
            total,
            config.output_dir.display()
        ));
        Ok(())
    }
}
