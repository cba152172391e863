//! 原生转换路径
//!
//! symphonia解码 → 线性插值重采样 → 声道重混 → hound写出16位PCM WAV。
//! 不依赖外部进程，仅支持wav输出。

use super::codec::AudioCodec;
use super::decoder::decode_file;
use super::format::{NATIVE_OUTPUT_FORMATS, PcmAudio, normalize_format};
use super::remix::{remix_channels, resample};
use crate::error::{ConvertError, ConvertResult, encoding_error};
use crate::processing::job::ConversionJob;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// 输出位深
const OUTPUT_BITS_PER_SAMPLE: u16 = 16;

/// 纯Rust编解码器
#[derive(Debug, Clone, Default)]
pub struct NativeCodec;

impl NativeCodec {
    pub fn new() -> Self {
        Self
    }

    /// 按任务参数处理PCM（先重采样，再重混）
    pub fn transform(audio: PcmAudio, job: &ConversionJob) -> PcmAudio {
        let audio = match job.sample_rate {
            Some(rate) if rate != audio.sample_rate => resample(&audio, rate),
            _ => audio,
        };
        match job.channels {
            Some(channels) if channels != audio.channels => remix_channels(&audio, channels),
            _ => audio,
        }
    }

    /// 写出16位整型WAV
    pub fn write_wav(audio: &PcmAudio, dest: &Path) -> ConvertResult<()> {
        let spec = WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(dest, spec)
            .map_err(|e| encoding_error(&format!("无法创建 / cannot create {}", dest.display()), e))?;

        for &sample in &audio.samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let value = (clamped * i16::MAX as f32).round() as i16;
            writer
                .write_sample(value)
                .map_err(|e| encoding_error("写入样本失败 / sample write failed", e))?;
        }

        writer
            .finalize()
            .map_err(|e| encoding_error("WAV收尾失败 / WAV finalize failed", e))
    }
}

impl AudioCodec for NativeCodec {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports_output(&self, format: &str) -> bool {
        let format = normalize_format(format);
        NATIVE_OUTPUT_FORMATS.contains(&format.as_str())
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        if !self.supports_output(&job.output_format) {
            return Err(ConvertError::UnsupportedOutputFormat(format!(
                "{} (原生路径仅支持 / native path supports: {})",
                job.output_format,
                NATIVE_OUTPUT_FORMATS.join(", ")
            )));
        }

        let decoded = decode_file(&job.source_path)?;
        let audio = Self::transform(decoded, job);
        audio.validate()?;
        Self::write_wav(&audio, &job.dest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(format: &str, sample_rate: Option<u32>, channels: Option<u16>) -> ConversionJob {
        ConversionJob {
            source_path: PathBuf::from("in.flac"),
            dest_path: PathBuf::from("out.wav"),
            output_format: format.to_string(),
            bitrate: "192k".to_string(),
            sample_rate,
            channels,
        }
    }

    #[test]
    fn test_supports_only_wav() {
        let codec = NativeCodec::new();
        assert!(codec.supports_output("wav"));
        assert!(codec.supports_output("WAV"));
        assert!(!codec.supports_output("mp3"));
    }

    #[test]
    fn test_unsupported_format_fails_before_decoding() {
        let err = NativeCodec::new().convert(&job("mp3", None, None)).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedOutputFormat(_)));
    }

    #[test]
    fn test_transform_applies_rate_then_channels() {
        let mono = PcmAudio::new(22050, 1, vec![0.5; 2205]);
        let out = NativeCodec::transform(mono, &job("wav", Some(44100), Some(2)));
        assert_eq!(out.sample_rate, 44100);
        assert_eq!(out.channels, 2);
        assert_eq!(out.frames(), 4410);
    }

    #[test]
    fn test_transform_without_options_is_identity() {
        let audio = PcmAudio::new(48000, 2, vec![0.1, -0.1, 0.2, -0.2]);
        let out = NativeCodec::transform(audio.clone(), &job("wav", None, None));
        assert_eq!(out, audio);
    }

    #[test]
    fn test_write_wav_round_spec() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("tone.wav");
        let audio = PcmAudio::new(44100, 2, vec![0.0, 1.5, -1.5, 0.25]);
        NativeCodec::write_wav(&audio, &dest).unwrap();

        let mut reader = hound::WavReader::open(&dest).unwrap();
        assert_eq!(reader.spec().sample_rate, 44100);
        assert_eq!(reader.spec().channels, 2);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        // 超界样本被钳位
        assert_eq!(samples[1], i16::MAX);
        assert_eq!(samples[2], -i16::MAX);
    }
}
