use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Crate events at info, eframe/winit/wgpu chatter only from warn up.
/// `RUST_LOG` replaces it entirely.
pub const DEFAULT_FILTER: &str = "warn,facecam=info,encode_gen=info,preview=info";

/// Bunyan JSON subscriber named after the running program (`encode_gen`,
/// `preview`), writing to `sink`.
pub fn get_subscriber<Sink>(
    name: &str,
    env_filter: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter)))
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.into(), sink))
}

/// Installs `subscriber` globally and forwards `log` records (eframe, winit)
/// into it. Call once, first thing in `main`.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> crate::Result<()> {
    LogTracer::init().map_err(crate::Error::as_unknown_error)?;
    set_global_default(subscriber).map_err(crate::Error::as_unknown_error)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

    use super::{get_subscriber, DEFAULT_FILTER};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn writes_bunyan_records_with_program_name() {
        let buffer = Buffer::default();
        let subscriber = get_subscriber("encode_gen", "info", buffer.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("face images loaded");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let record: serde_json::Value = serde_json::from_str(
            output.lines().last().expect("no record written"),
        )
        .unwrap();
        assert_eq!(record["name"], "encode_gen");
        assert_eq!(record["msg"], "face images loaded");
    }
}
