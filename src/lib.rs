//! Batch Audio Converter
//!
//! 递归扫描目录，把匹配扩展名的音频文件并行转换为目标格式，
//! 转换成功后删除源文件。
//!
//! ## 核心特性
//! - 按扩展名递归发现文件（大小写不敏感）
//! - 有界worker池并行转换，单个文件失败不影响其他文件
//! - 有损格式码率控制，可选重采样与声道重排
//! - ffmpeg 外部进程或原生 WAV 编码两种后端

pub mod audio;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use audio::{AudioCodec, CodecKind, FfmpegCodec, NativeCodec};
pub use error::{ConvertError, ConvertResult, ErrorCategory};
pub use processing::{ConversionJob, ConversionOutcome, Dispatcher, WorkerPool};
pub use tools::{BatchReport, ConsoleOptions, ConvertConfig, convert_directory, run_batch};
