use std::sync::Arc;

use anyhow::Context;

use invoicedesk_api::app::{build_app, AppServices};
use invoicedesk_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invoicedesk_observability::init();

    let settings = Settings::from_env().context("reading configuration")?;
    let services = Arc::new(AppServices::build(&settings).await?);
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
