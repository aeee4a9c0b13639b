use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Inicializa o subscriber global. `RUST_LOG` tem prioridade sobre `level`.
///
/// Os logs vão para stderr: o stdout é do protocolo UCI e da saída da CLI.
/// Chamar duas vezes não é erro, a segunda chamada é ignorada.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
