use anyhow::Context;
use tpgh_config::TpghConfig;
use tpgh_migrate::{EntityNormalizer, Html2Md, StoryPreview};

use crate::bootstrap::apply_stories_overrides;
use crate::cli::{OutputFormat, StoriesArgs};
use crate::{clients, output};

/// Handle `tpgh stories`: print the team's user stories as GitHub would
/// receive their descriptions.
pub async fn handle(
    args: &StoriesArgs,
    mut config: TpghConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    apply_stories_overrides(&mut config, args);
    config
        .targetprocess
        .validate()
        .context("invalid configuration for stories")?;

    let source = clients::target_process(&config)?;
    let stories = source
        .user_stories(config.targetprocess.team_id)
        .await
        .context("failed to fetch user stories")?;

    let normalizer = EntityNormalizer::new(Box::new(Html2Md), &config.targetprocess.base_url);
    let previews: Vec<StoryPreview> = stories.iter().map(|s| normalizer.preview(s)).collect();
    output::output(&previews, format)
}
