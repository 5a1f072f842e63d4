use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use crate::logging::config::{LogFormat, LoggingConfig};

/// Build formatter на основе конфигурации.
/// Возвращаем boxed trait-объект, чтобы стереть конкретный тип формата
/// (json/pretty/compact) и writer-а.
pub fn build_formatter_from_config<S, W>(
    config: &LoggingConfig,
    format: LogFormat,
    with_ansi: bool,
    writer: W,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let with_target = config.console.with_target;
    let with_line_numbers = config.console.with_line_numbers;

    match format {
        LogFormat::Json => Box::new(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(with_target)
                .with_line_number(with_line_numbers),
        ),
        LogFormat::Pretty => Box::new(
            fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(writer)
                .with_ansi(with_ansi)
                .with_target(with_target)
                .with_line_number(with_line_numbers),
        ),
        LogFormat::Compact => Box::new(
            fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(with_ansi)
                .with_target(with_target)
                .with_line_number(with_line_numbers),
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;

    // Мини-буферный writer для тестов
    #[derive(Clone, Default)]
    pub(crate) struct VecMakeWriter(pub Arc<Mutex<Vec<u8>>>);

    pub(crate) struct VecWriterGuard(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for VecMakeWriter {
        type Writer = VecWriterGuard;

        fn make_writer(&'a self) -> Self::Writer {
            VecWriterGuard(self.0.clone())
        }
    }

    impl std::io::Write for VecWriterGuard {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            let mut locked = self.0.lock().unwrap();
            locked.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl VecMakeWriter {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_json_format_emits_json_lines() {
        let writer = VecMakeWriter::default();
        let cfg = LoggingConfig::default();
        let layer = build_formatter_from_config::<Registry, _>(
            &cfg,
            LogFormat::Json,
            false,
            writer.clone(),
        );

        tracing::subscriber::with_default(Registry::default().with(layer), || {
            tracing::info!(value = 42, "json event");
        });

        let out = writer.contents();
        let line = out.lines().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();

        assert_eq!(parsed["fields"]["message"], "json event");
        assert_eq!(parsed["fields"]["value"], 42);
    }

    #[test]
    fn test_compact_and_pretty_formats_write_message() {
        for format in [LogFormat::Compact, LogFormat::Pretty] {
            let writer = VecMakeWriter::default();
            let cfg = LoggingConfig::default();
            let layer =
                build_formatter_from_config::<Registry, _>(&cfg, format, false, writer.clone());

            tracing::subscriber::with_default(Registry::default().with(layer), || {
                tracing::warn!("formatted with {}", format);
            });

            assert!(writer
                .contents()
                .contains(&format!("formatted with {format}")));
        }
    }
}
