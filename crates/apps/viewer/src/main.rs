//! Headless replay: loads a flow dataset (and optionally a world map), plays
//! it for a fixed wall-clock duration and prints the final scene as SVG.

use std::env;
use std::fs;
use std::time::Duration;

use anyhow::{Context, bail};
use scene::World;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{FlowMap, ViewerConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = match env::var("FLOWMAP_CONFIG") {
        Ok(path) => ViewerConfig::from_path(&path).with_context(|| format!("loading config {path}"))?,
        Err(_) => ViewerConfig::default(),
    };
    config.apply_env();

    let Ok(data_path) = env::var("FLOWMAP_DATA") else {
        bail!("FLOWMAP_DATA must point at a flow records JSON file");
    };
    let run_ms = env_var_u64("FLOWMAP_RUN_MS", 10_000);

    let world = World::new().with_hit_tolerance(config.scene.hit_tolerance);
    let mut map = FlowMap::new(world, &config)?;

    if let Ok(world_path) = env::var("FLOWMAP_WORLD") {
        let payload = fs::read_to_string(&world_path).with_context(|| format!("reading {world_path}"))?;
        let features = map.load_map_json(&payload)?;
        info!(features, "world map loaded");
    }
    if let Ok(name) = env::var("FLOWMAP_PROJECTION") {
        map.set_projection_named(&name)?;
    }

    let payload = fs::read_to_string(&data_path).with_context(|| format!("reading {data_path}"))?;
    map.load_dataset_json(&payload)
        .with_context(|| format!("loading flows from {data_path}"))?;

    let elapsed = map.replay(Duration::from_millis(run_ms))?;

    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        cursor = %map.cursor_label().unwrap_or_default(),
        visible = map.visible_ids().len(),
        "replay finished"
    );
    println!("{}", map.surface().to_svg());
    Ok(())
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
