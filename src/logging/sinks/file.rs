use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{config::LoggingConfig, formatter};

/// File layer: ежедневная ротация в `config.file.dir`, запись через
/// non-blocking worker. Guard должен жить, пока нужны логи.
pub fn layer_with_config<S>(
    config: &LoggingConfig
) -> (Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let file_appender = daily(&config.file.dir, &config.file.filename);
    let (non_blocking_writer, guard) = non_blocking(file_appender);

    let layer =
        formatter::build_formatter_from_config(config, config.file.format, false, non_blocking_writer);

    (layer, guard)
}
