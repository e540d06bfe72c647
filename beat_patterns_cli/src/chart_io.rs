use std::{fs, path::Path};

use anyhow::Context;
use beatmap_schema::BeatmapData;

pub fn load_chart(path: impl AsRef<Path>) -> anyhow::Result<BeatmapData> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read chart: {}", path.display()))?;
    let chart: BeatmapData = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse chart json: {}", path.display()))?;
    Ok(chart)
}

/// Writes the chart as a single line of JSON.
pub fn save_chart(path: impl AsRef<Path>, chart: &BeatmapData) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = chart.to_compact_json().context("failed to serialize chart")?;
    fs::write(path, json).with_context(|| format!("failed to write: {}", path.display()))?;
    Ok(())
}
