pub mod api;

use crate::agent::TurnHandler;
use crate::cli::Args;
use crate::error::ConfigError;
use self::api::{ router, AppState };
use log::{ info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct Server {
    addr: String,
    handler: Arc<TurnHandler>,
    args: Args,
}

impl Server {
    pub fn new(
        addr: String,
        handler: Arc<TurnHandler>,
        args: Args,
    ) -> Self {
        Self {
            addr,
            handler,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>().map_err(|source| ConfigError::InvalidServerAddr {
            addr: self.addr.clone(),
            source,
        })?;
        let app = router(AppState { handler: self.handler.clone() });

        if let Some((cert_path, key_path)) = self.args.tls_paths() {
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path)
                .await
                .map_err(ConfigError::Tls)?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            info!("HTTPS server listening on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        } else {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("HTTP server listening on http://{}", addr);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Could not listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
