use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,

    /// Classifier model artifact path
    pub model_path: PathBuf,

    /// Firestore credential file path
    pub credentials_path: PathBuf,

    /// Use the in-process counter store instead of Firestore
    pub offline: bool,

    /// ONNX Runtime session options
    pub onnx_config: OnnxConfig,

    /// Server limits
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU threads per inference call
    pub intra_threads: usize,

    /// Graph optimization level
    pub optimization_level: i32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        model_path: String,
        credentials_path: String,
        offline: bool,
    ) -> Result<Self> {
        let cpu_cores = num_cpus::get();

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1),
            optimization_level: 3,
        };

        let server_config = ServerConfig {
            request_timeout: 60,
            max_request_size: 10 * 1024 * 1024, // 10MB
        };

        Ok(Self {
            bind_addr,
            model_path: PathBuf::from(model_path),
            credentials_path: PathBuf::from(credentials_path),
            offline,
            onnx_config,
            server_config,
        })
    }
}
