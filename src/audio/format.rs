//! 音频格式信息
//!
//! 输出格式规范化、有损格式判定，以及原生转换路径使用的交错PCM缓冲区。

use crate::error::{ConvertError, ConvertResult};

/// 需要传递码率的有损输出格式
pub const LOSSY_FORMATS: &[&str] = &["mp3", "ogg", "m4a", "aac"];

/// 原生路径可写出的格式
pub const NATIVE_OUTPUT_FORMATS: &[&str] = &["wav"];

/// 规范化输出格式：小写，去掉前导点
pub fn normalize_format(format: &str) -> String {
    format.trim().trim_start_matches('.').to_lowercase()
}

/// 规范化输入扩展名：小写，保证带前导点
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.').to_lowercase();
    format!(".{trimmed}")
}

/// 判断输出格式是否为有损格式（大小写不敏感）
#[inline]
pub fn is_lossy_format(format: &str) -> bool {
    let normalized = normalize_format(format);
    LOSSY_FORMATS.contains(&normalized.as_str())
}

/// 交错PCM音频（f32，范围[-1.0, 1.0]）
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    /// 采样率（Hz）
    pub sample_rate: u32,

    /// 声道数
    pub channels: u16,

    /// 交错样本 [L1, R1, L2, R2, ...]
    pub samples: Vec<f32>,
}

impl PcmAudio {
    /// 创建PCM缓冲区
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// 验证格式参数的有效性
    pub fn validate(&self) -> ConvertResult<()> {
        if self.sample_rate == 0 {
            return Err(ConvertError::Decoding("采样率为0 / zero sample rate".to_string()));
        }
        if self.channels == 0 {
            return Err(ConvertError::Decoding("声道数为0 / zero channels".to_string()));
        }
        if self.samples.len() % self.channels as usize != 0 {
            return Err(ConvertError::Decoding(format!(
                "样本数 {} 不是声道数 {} 的整数倍 / sample count not frame aligned",
                self.samples.len(),
                self.channels
            )));
        }
        Ok(())
    }

    /// 每声道帧数
    #[inline]
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// 时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }
}
