//! RangeGraph API Server binary
//!
//! HTTP front end: upload a workbook, get back its named references,
//! dependency graph and documentation table.

use clap::Parser;
use rangegraph::api::{run_api_server, ApiConfig};
use rangegraph::core::DEFAULT_CACHE_CAPACITY;

#[derive(Parser, Debug)]
#[command(name = "rangegraph-server")]
#[command(version)]
#[command(about = "RangeGraph API Server - named range dependency analysis over HTTP")]
#[command(long_about = r#"
RangeGraph API Server

Endpoints:
  - POST /api/v1/analyze   - Analyze an uploaded .xlsx (raw bytes in the body)
  - POST /api/v1/translate - Document and translate one formula
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Features:
  - Results cached by content hash, least recently used evicted first
    (add ?nocache=true to bypass)
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs

Example usage:
  rangegraph-server                           # Start on localhost:8080
  rangegraph-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/analyze \
    --data-binary @model.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RANGEGRAPH_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "RANGEGRAPH_PORT")]
    port: u16,

    /// Largest accepted upload, in megabytes
    #[arg(long, default_value = "20", env = "RANGEGRAPH_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Analyses kept in memory for repeated uploads (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, env = "RANGEGRAPH_MAX_CACHED")]
    max_cached: usize,
}

impl From<Args> for ApiConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
            max_cached_analyses: args.max_cached,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_api_server(Args::parse().into()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["rangegraph-server"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.max_upload_mb, 20);
        assert_eq!(args.max_cached, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        let args =
            Args::try_parse_from(["rangegraph-server", "--max-upload-mb", &usize::MAX.to_string()])
                .unwrap();
        let config = ApiConfig::from(args);
        assert_eq!(config.max_upload_bytes, usize::MAX);
    }

    #[test]
    fn test_cache_size_flag() {
        let args = Args::try_parse_from(["rangegraph-server", "--max-cached", "0"]).unwrap();
        assert_eq!(ApiConfig::from(args).max_cached_analyses, 0);
    }
}
