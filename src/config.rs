use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use warp::http::Uri;

use crate::recognition::{
    Classifier, HttpClassifier, SimulatedClassifier, DEFAULT_CLASSIFIER_TIMEOUT_SECS,
    DEFAULT_CLASSIFIER_URL,
};
use crate::store::MonumentStore;
use crate::uploads::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierKind {
    /// Random catalogue monument, no external calls.
    Simulated,
    /// External prediction service over HTTP.
    Http,
}

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "TuniTales monument service", long_about = None)]
pub struct Args {
    #[clap(long, env = "TUNITALES_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: SocketAddr,

    #[clap(long, env = "TUNITALES_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    #[clap(long, env = "TUNITALES_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: u64,

    #[clap(long, env = "TUNITALES_CLASSIFIER", value_enum, default_value = "simulated")]
    pub classifier: ClassifierKind,

    #[clap(long, env = "TUNITALES_CLASSIFIER_URL", default_value = DEFAULT_CLASSIFIER_URL)]
    pub classifier_url: String,

    #[clap(long, env = "TUNITALES_CLASSIFIER_TIMEOUT_SECS", default_value_t = DEFAULT_CLASSIFIER_TIMEOUT_SECS)]
    pub classifier_timeout_secs: u64,

    /// Allowed CORS origin. Repeat for several.
    #[clap(long = "cors-origin", env = "TUNITALES_CORS_ORIGINS", value_delimiter = ',', default_value = "http://localhost:5000", value_parser = parse_origin)]
    pub cors_origins: Vec<String>,

    /// Tokio worker threads. Defaults to the number of logical cores.
    #[clap(long, env = "TUNITALES_WORKERS")]
    pub workers: Option<usize>,
}

/// Typed service configuration, resolved from [`Args`].
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub classifier: ClassifierKind,
    pub classifier_url: String,
    pub classifier_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub worker_threads: usize,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            addr: args.addr,
            uploads_dir: args.uploads_dir,
            max_upload_bytes: args.max_upload_bytes,
            classifier: args.classifier,
            classifier_url: args.classifier_url,
            classifier_timeout: Duration::from_secs(args.classifier_timeout_secs),
            cors_origins: args.cors_origins,
            worker_threads: args.workers.filter(|&w| w > 0).unwrap_or(cores),
        }
    }
}

/// Normalizes a CORS origin to `scheme://host[:port]`. Only http(s) origins
/// without path, query or credentials are accepted.
pub fn parse_origin(raw: &str) -> Result<String, String> {
    let uri: Uri = raw
    .trim()
    .parse()
    .map_err(|e| format!("invalid origin {:?}: {}", raw, e))?;

    let scheme = match uri.scheme_str() {
        Some(s @ ("http" | "https")) => s,
        _ => return Err(format!("origin {:?} must use http or https", raw)),
    };
    let authority = uri
    .authority()
    .filter(|a| !a.host().is_empty() && !a.as_str().contains('@'))
    .ok_or_else(|| format!("origin {:?} has no host", raw))?;
    if uri.path() != "/" || uri.query().is_some() {
        return Err(format!("origin {:?} must not carry a path or query", raw));
    }
    Ok(format!("{}://{}", scheme, authority))
}

impl ServiceConfig {
    /// Builds the classifier selected by `classifier`.
    pub fn build_classifier(&self, store: &MonumentStore) -> Result<Arc<dyn Classifier>, reqwest::Error> {
        let classifier: Arc<dyn Classifier> = match self.classifier {
            ClassifierKind::Simulated => Arc::new(SimulatedClassifier::from_store(store)),
            ClassifierKind::Http => {
                Arc::new(HttpClassifier::new(&self.classifier_url, self.classifier_timeout)?)
            }
        };
        Ok(classifier)
    }
}
