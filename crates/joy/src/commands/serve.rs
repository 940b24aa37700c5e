use std::net::Ipv4Addr;

use anyhow::{Context, Result};
use joy_api::AppState;
use tokio::net::TcpListener;

use super::StoreArgs;

pub async fn handle_serve_command(port: u16, store: &StoreArgs) -> Result<()> {
    let state = AppState::new(store.connect()?).with_collection(store.collection.clone());
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    joy_api::serve(listener, state).await?;
    Ok(())
}
