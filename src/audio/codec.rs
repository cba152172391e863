//! 编解码器抽象
//!
//! 转换worker只依赖 [`AudioCodec`]：解码源文件、按需重采样/重混、编码写出目标文件。
//! 具体实现有外部ffmpeg和纯Rust原生路径两种，[`AutoCodec`] 按输出格式选择。

use super::ffmpeg_bridge::FfmpegCodec;
use super::format::normalize_format;
use super::native_codec::NativeCodec;
use crate::error::{ConvertError, ConvertResult};
use crate::processing::job::ConversionJob;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// 音频编解码器
pub trait AudioCodec: Send + Sync {
    /// 实现名称（用于日志）
    fn name(&self) -> &'static str;

    /// 是否能写出该输出格式
    fn supports_output(&self, format: &str) -> bool;

    /// 执行单个任务的完整转换：解码 → 重采样 → 重混 → 编码 → 写出 `dest_path`
    fn convert(&self, job: &ConversionJob) -> ConvertResult<()>;
}

/// 编解码器选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// wav输出走原生路径，其余走ffmpeg
    #[default]
    Auto,
    Ffmpeg,
    Native,
}

impl CodecKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Ffmpeg => "ffmpeg",
            Self::Native => "native",
        }
    }

    /// 解析命令行取值
    pub fn parse(value: &str) -> ConvertResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "ffmpeg" => Ok(Self::Ffmpeg),
            "native" => Ok(Self::Native),
            other => Err(ConvertError::InvalidInput(format!(
                "未知的编解码器 / unknown codec: {other} (auto|ffmpeg|native)"
            ))),
        }
    }

    /// 构建对应的编解码器实例
    pub fn build(self, ffmpeg_path: Option<PathBuf>) -> Arc<dyn AudioCodec> {
        let ffmpeg = match ffmpeg_path {
            Some(path) => FfmpegCodec::with_path(path),
            None => FfmpegCodec::new(),
        };
        match self {
            Self::Auto => Arc::new(AutoCodec::new(NativeCodec::new(), ffmpeg)),
            Self::Ffmpeg => Arc::new(ffmpeg),
            Self::Native => Arc::new(NativeCodec::new()),
        }
    }
}

/// 按输出格式路由的编解码器
pub struct AutoCodec {
    native: NativeCodec,
    ffmpeg: FfmpegCodec,
}

impl AutoCodec {
    pub fn new(native: NativeCodec, ffmpeg: FfmpegCodec) -> Self {
        Self { native, ffmpeg }
    }

    fn select(&self, format: &str) -> &dyn AudioCodec {
        if self.native.supports_output(format) {
            &self.native
        } else {
            &self.ffmpeg
        }
    }
}

impl AudioCodec for AutoCodec {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports_output(&self, format: &str) -> bool {
        self.native.supports_output(format) || self.ffmpeg.supports_output(format)
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        let codec = self.select(&normalize_format(&job.output_format));
        log::debug!(
            "编解码器选择 / codec for {}: {}",
            job.source_path.display(),
            codec.name()
        );
        codec.convert(job)
    }
}
