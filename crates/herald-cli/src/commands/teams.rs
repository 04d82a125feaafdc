/// Linear team listing
use std::path::Path;

use anyhow::Result;
use herald_core::Settings;
use herald_integrations::{IssueTracker, LinearClient};

use super::helpers::env_var;

pub async fn teams_command(config_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config_path)?;
    let client = LinearClient::new(
        Settings::linear_api_key(env_var)?,
        settings.linear.api_url.clone(),
        settings.request_timeout(),
    )?;

    println!("Fetching teams from {}...\n", client.system_name());
    let teams = client.list_teams().await?;

    if teams.is_empty() {
        println!("No teams found.");
        return Ok(());
    }

    println!("{:<8} {:<30} ID", "Key", "Name");
    for team in &teams {
        println!("{:<8} {:<30} {}", team.key, team.name, team.id);
    }
    println!("\nSet LINEAR_TEAM_ID (or [linear] team_id in herald.toml) to one of the IDs above.");

    Ok(())
}
