use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging comes first so env-file problems are reported; `RUST_LOG` and
    // `LOG_FORMAT` are read from the process environment only.
    folio_observability::init();
    folio_infra::config::load_env_files();

    let config = folio_infra::AppConfig::from_env().context("invalid configuration")?;
    let port = config.port;

    let services = folio_api::app::services::build_services(config)
        .await
        .context("failed to build services")?;
    let app = folio_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
