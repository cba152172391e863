//! 集成测试公共工具
//!
//! WAV固件生成与模拟编解码器。
#![allow(dead_code)]

use batch_audio_converter::audio::AudioCodec;
use batch_audio_converter::error::{ConvertError, ConvertResult};
use batch_audio_converter::processing::ConversionJob;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn log(msg_zh: impl AsRef<str>, msg_en: impl AsRef<str>) {
    println!("{} / {}", msg_zh.as_ref(), msg_en.as_ref());
}

/// 写入正弦波WAV（16-bit PCM）
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (t * 440.0 * std::f32::consts::TAU).sin() * 0.5;
        for _ in 0..channels {
            writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// 写入一个扩展名正确但内容损坏的文件
pub fn write_corrupted(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"RIFF\x00\x00\x00\x00garbage that is not audio").unwrap();
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"placeholder").unwrap();
}

/// 直接把源文件内容拷贝到目标路径的编解码器
#[derive(Default)]
pub struct CopyCodec;

impl AudioCodec for CopyCodec {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn supports_output(&self, _format: &str) -> bool {
        true
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        std::fs::copy(&job.source_path, &job.dest_path)?;
        Ok(())
    }
}

/// 源文件名包含 "bad" 时失败
#[derive(Default)]
pub struct SelectiveFailCodec;

impl AudioCodec for SelectiveFailCodec {
    fn name(&self) -> &'static str {
        "selective"
    }

    fn supports_output(&self, _format: &str) -> bool {
        true
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        let name = job.source_path.file_name().unwrap().to_string_lossy();
        if name.contains("bad") {
            return Err(ConvertError::Decoding(format!("cannot decode {name}")));
        }
        std::fs::write(&job.dest_path, b"converted")?;
        Ok(())
    }
}

/// 记录最大并发数与看到的任务的编解码器
#[derive(Default)]
pub struct ConcurrencyProbeCodec {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<ConversionJob>>,
}

impl ConcurrencyProbeCodec {
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<ConversionJob> {
        self.seen.lock().unwrap().clone()
    }
}

impl AudioCodec for ConcurrencyProbeCodec {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn supports_output(&self, _format: &str) -> bool {
        true
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        self.seen.lock().unwrap().push(job.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        std::fs::write(&job.dest_path, b"probe")?;
        Ok(())
    }
}
