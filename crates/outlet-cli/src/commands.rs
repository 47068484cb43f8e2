use anyhow::Context;
use outlet_core::{AppConfig, CoreError, Neighbor, Outlet, SelectionController};
use outlet_upstream::UpstreamClient;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct NeighborReport<'a> {
    selected: &'a Outlet,
    radius_km: f64,
    neighbors: Vec<Neighbor>,
}

fn upstream_client(config: &AppConfig) -> anyhow::Result<UpstreamClient> {
    let base_url = config
        .api_url
        .as_deref()
        .context("OUTLET_API_URL is not set")?;
    Ok(UpstreamClient::new(
        base_url,
        config.upstream_timeout_secs,
        &config.upstream_user_agent,
    )?)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn outlets(config: &AppConfig) -> anyhow::Result<()> {
    let client = upstream_client(config)?;
    let payload = client
        .fetch_outlets()
        .await
        .context("failed to fetch outlets")?;
    print_json(&payload)
}

pub(crate) async fn search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("search query must not be blank");
    }
    let client = upstream_client(config)?;
    let payload = client
        .search(query)
        .await
        .with_context(|| format!("search for {query:?} failed"))?;
    let results = outlet_core::normalize_search_results(payload);
    tracing::info!(query, results = results.len(), "search completed");
    print_json(&results)
}

pub(crate) async fn neighbors(config: &AppConfig, id: &str, radius_km: f64) -> anyhow::Result<()> {
    let client = upstream_client(config)?;
    let snapshot = client
        .fetch_snapshot()
        .await
        .context("failed to load outlet snapshot")?;

    let mut controller = SelectionController::new(snapshot, radius_km);
    controller.select_entity(id).map_err(CoreError::from)?;

    let state = controller.state();
    let selected = state
        .selected()
        .context("selection did not focus an outlet")?;
    print_json(&NeighborReport {
        selected,
        radius_km,
        neighbors: controller.nearest(),
    })
}
