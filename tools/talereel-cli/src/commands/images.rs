//! Scene image stage.

use talereel_common::StageClock;
use talereel_narrative_ai::{generate_images, OpenAiClient};

use crate::context::StageContext;

pub async fn run(ctx: &StageContext) -> anyhow::Result<()> {
    let layout = &ctx.layout;
    let batch_size = ctx.config.pipeline.batch_size;
    println!("Generating images: {}", layout.images_dir().display());
    println!("  Batch size: {batch_size}");

    let clock = StageClock::start("images");
    let services = &ctx.config.services;
    let client = OpenAiClient::from_config(services)?;
    let report = generate_images(layout, &client, batch_size, &services.retry.images).await?;
    clock.finish();

    println!(
        "  [OK] {} generated, {} already present",
        report.generated.len(),
        report.skipped.len()
    );
    if !report.failed.is_empty() {
        println!(
            "  [WARN] {} failed: scenes {}",
            report.failed.len(),
            join_indices(&report.failed)
        );
        println!("         Rerun `talereel images` to retry them");
    }
    Ok(())
}

pub(crate) fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_indices() {
        assert_eq!(join_indices(&[]), "");
        assert_eq!(join_indices(&[3, 7, 12]), "3, 7, 12");
    }
}
