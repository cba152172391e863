//! 工具模块集合
//!
//! 包含CLI、配置、扫描、批量流程与报告，支持main.rs的流程控制。

pub mod cli;
pub mod config;
pub mod constants;
pub mod processor;
pub mod report;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, show_startup_info};
pub use config::ConvertConfig;
pub use processor::{ConsoleOptions, convert_directory, run_batch};
pub use report::BatchReport;
pub use scanner::{scan_audio_files, show_scan_results};
pub use utils::path;
