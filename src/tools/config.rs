//! 批量转换配置
//!
//! 入口函数接收的配置包。所有字段都有默认值，只有根目录必填。

use super::constants::{defaults, parallel_limits};
use crate::audio::codec::CodecKind;
use crate::audio::format::{is_lossy_format, normalize_extension, normalize_format};
use crate::error::{ConvertError, ConvertResult};
use crate::processing::job::{EncodeSettings, OutputDirPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// 批量转换配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// 扫描根目录
    pub root_directory: PathBuf,

    /// 输入扩展名（小写，带前导点）
    #[serde(default = "default_input_extensions")]
    pub input_extensions: BTreeSet<String>,

    /// 输出格式（小写，无前导点）
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// 码率（仅有损格式）
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// 目标采样率（Hz）
    #[serde(default)]
    pub sample_rate: Option<u32>,

    /// 目标声道数
    #[serde(default)]
    pub channels: Option<u16>,

    /// worker数量（None表示主机核心数）
    #[serde(default)]
    pub worker_count: Option<usize>,

    /// 转换成功后删除源文件
    #[serde(default = "default_delete_originals")]
    pub delete_originals: bool,

    /// 输出根目录（None表示写在源文件旁边）
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// 编解码器选择
    #[serde(default)]
    pub codec: CodecKind,

    /// 显式ffmpeg路径
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

fn default_input_extensions() -> BTreeSet<String> {
    defaults::INPUT_EXTENSIONS
        .iter()
        .map(|ext| normalize_extension(ext))
        .collect()
}

fn default_output_format() -> String {
    defaults::OUTPUT_FORMAT.to_string()
}

fn default_bitrate() -> String {
    defaults::BITRATE.to_string()
}

fn default_delete_originals() -> bool {
    defaults::DELETE_ORIGINALS
}

impl ConvertConfig {
    /// 以默认值创建配置
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
            input_extensions: default_input_extensions(),
            output_format: default_output_format(),
            bitrate: default_bitrate(),
            sample_rate: None,
            channels: None,
            worker_count: None,
            delete_originals: default_delete_originals(),
            output_dir: None,
            codec: CodecKind::default(),
            ffmpeg_path: None,
        }
    }

    /// 设置输入扩展名（自动规范化）
    pub fn with_input_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.input_extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    pub fn with_output_format(mut self, format: &str) -> Self {
        self.output_format = normalize_format(format);
        self
    }

    pub fn with_bitrate(mut self, bitrate: &str) -> Self {
        self.bitrate = bitrate.trim().to_string();
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: Option<u32>) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: Option<u16>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_worker_count(mut self, worker_count: Option<usize>) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_delete_originals(mut self, delete: bool) -> Self {
        self.delete_originals = delete;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// 规范化并验证配置
    pub fn validate(&self) -> ConvertResult<()> {
        if self.root_directory.as_os_str().is_empty() {
            return Err(ConvertError::InvalidInput(
                "根目录不能为空 / root directory is required".to_string(),
            ));
        }
        if normalize_format(&self.output_format).is_empty() {
            return Err(ConvertError::InvalidInput(
                "输出格式不能为空 / output format is required".to_string(),
            ));
        }
        if self.input_extensions.is_empty() || self.input_extensions.iter().any(|e| e == ".") {
            return Err(ConvertError::InvalidInput(
                "输入扩展名列表无效 / input extension set is empty or invalid".to_string(),
            ));
        }
        if let Some(workers) = self.worker_count
            && workers < parallel_limits::MIN_PARALLEL_DEGREE
        {
            return Err(ConvertError::InvalidInput(format!(
                "worker数量必须至少为{} / worker count must be >= {}",
                parallel_limits::MIN_PARALLEL_DEGREE,
                parallel_limits::MIN_PARALLEL_DEGREE
            )));
        }
        if self.channels == Some(0) {
            return Err(ConvertError::InvalidInput(
                "声道数必须至少为1 / channels must be >= 1".to_string(),
            ));
        }
        if self.sample_rate == Some(0) {
            return Err(ConvertError::InvalidInput(
                "采样率必须大于0 / sample rate must be > 0".to_string(),
            ));
        }
        if is_lossy_format(&self.output_format) && self.bitrate.trim().is_empty() {
            return Err(ConvertError::InvalidInput(format!(
                "有损格式 {} 需要码率 / lossy format requires a bitrate",
                self.output_format
            )));
        }
        Ok(())
    }

    /// 共享编码参数
    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings::new(&self.output_format, &self.bitrate)
            .with_sample_rate(self.sample_rate)
            .with_channels(self.channels)
    }

    /// 目标目录策略
    pub fn output_policy(&self) -> OutputDirPolicy {
        match &self.output_dir {
            None => OutputDirPolicy::SameAsSource,
            Some(output_root) => OutputDirPolicy::Mirror {
                source_root: self.root_directory.clone(),
                output_root: output_root.clone(),
            },
        }
    }
}
