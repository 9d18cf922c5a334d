use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use reqwest::{Method, StatusCode};

/// Logging configuration file picked up from the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yaml";

/// A unique identifier for a particular outgoing request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Log an outgoing request.
pub fn log_request(id: RequestId, method: &Method, url: &str) {
    info!("->req{id} {method} {url}");
}

/// Log the response to a request, louder for worse status codes.
pub fn log_response(id: RequestId, status: StatusCode, endpoint: &str) {
    let log_msg = format!("<-rsp{id} {status} {endpoint}");
    if status.is_server_error() {
        error!("{log_msg}");
    } else if status.is_client_error() {
        warn!("{log_msg}");
    } else {
        info!("{log_msg}");
    }
}

/// Set up logging: from [`LOG_CONFIG_FILE`] if present, otherwise to stderr at `level`.
pub fn init(level: LevelFilter) -> Result<(), String> {
    if Path::new(LOG_CONFIG_FILE).exists() {
        return log4rs::init_file(LOG_CONFIG_FILE, Default::default()).map_err(|e| e.to_string());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| e.to_string())?;
    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
