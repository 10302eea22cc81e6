use std::time::Duration;

use anyhow::Context;
use tpgh_config::TpghConfig;
use tpgh_github::{GitHubClient, ProjectsClient};
use tpgh_source::TargetProcessClient;

pub fn target_process(config: &TpghConfig) -> anyhow::Result<TargetProcessClient> {
    let tp = &config.targetprocess;
    Ok(TargetProcessClient::new(&tp.base_url, &tp.username, &tp.password)
        .context("failed to create TargetProcess client")?
        .with_page_size(tp.page_size))
}

pub fn github(config: &TpghConfig) -> anyhow::Result<GitHubClient> {
    let gh = &config.github;
    GitHubClient::with_timeout(
        &gh.token,
        &gh.repo,
        &gh.api_url,
        Duration::from_secs(gh.http_timeout_secs),
    )
    .context("failed to create GitHub client")
}

pub fn projects(config: &TpghConfig) -> anyhow::Result<ProjectsClient> {
    let gh = &config.github;
    ProjectsClient::with_timeout(
        &gh.token,
        &gh.graphql_url,
        Duration::from_secs(gh.http_timeout_secs),
    )
    .context("failed to create GitHub GraphQL client")
}
