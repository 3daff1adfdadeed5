use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Los eventos van a stderr para no mezclarse con la consola interactiva.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error,exiflens=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
