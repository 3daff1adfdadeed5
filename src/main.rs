use exiflens::config::Settings;
use exiflens::{app, telemetry};
use std::env;

fn main() {
    if env::args().len() > 1 {
        eprintln!(
            "ExifLens es interactivo y no acepta argumentos. Configúralo con `exiflens.toml` o variables `EXIFLENS_*`."
        );
        std::process::exit(1);
    }

    telemetry::init_tracing();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("No se pudo cargar la configuración: {error}");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("No se pudo iniciar el runtime: {error}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(app::run(settings));
    // El lector de stdin puede seguir bloqueado en `read_line`.
    runtime.shutdown_background();

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
