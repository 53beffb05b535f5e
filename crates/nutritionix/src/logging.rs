//! Response logging capability.
//!
//! Debug mode is a per-client [`ResponseLog`], not a process-wide logger
//! setting, so clients with different debug flags can coexist. The library
//! never installs a `tracing` subscriber itself.

use crate::request::HttpMethod;
use crate::response::NutritionResponse;
use url::Url;

/// `tracing` target used for response bodies.
pub const RESPONSE_TARGET: &str = "nutritionix::response";

/// Receives every response a debug-enabled client gets back.
pub trait ResponseLog: Send + Sync {
    /// Record one response.
    fn log_response(&self, method: HttpMethod, url: &Url, response: &NutritionResponse);
}

/// Emits the full response body as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingResponseLog;

impl ResponseLog for TracingResponseLog {
    fn log_response(&self, method: HttpMethod, url: &Url, response: &NutritionResponse) {
        tracing::debug!(
            target: RESPONSE_TARGET,
            %method,
            %url,
            status = response.status(),
            "Response Content: {}",
            response.text()
        );
    }
}

#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory sink for a scoped `fmt` subscriber.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_max_level(tracing::Level::DEBUG)
                .with_target(true)
                .with_ansi(false)
                .finish()
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("lock logs")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock logs").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
