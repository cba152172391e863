//! symphonia通用解码
//!
//! 原生转换路径的解码阶段：自动探测容器格式，解码首个音频轨道为交错f32样本。

use super::format::PcmAudio;
use crate::error::{ConvertError, ConvertResult, decoding_error};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// 解码整个文件为交错PCM
pub fn decode_file(path: &Path) -> ConvertResult<PcmAudio> {
    let file = std::fs::File::open(path)
        .map_err(|e| decoding_error(&format!("无法打开 / cannot open {}", path.display()), e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension() {
        hint.with_extension(&extension.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decoding_error("格式探测失败 / format probe failed", e))?;

    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ConvertError::Decoding("未找到音频轨道 / no audio track".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| decoding_error("创建解码器失败 / cannot create decoder", e))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params
        .channels
        .map(|ch| ch.count() as u16)
        .unwrap_or(0);

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut buf_frames = 0usize;

    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decoding_error("读取包失败 / packet read failed", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                let spec = *audio_buf.spec();
                if sample_rate == 0 {
                    sample_rate = spec.rate;
                }
                if channels == 0 {
                    channels = spec.channels.count() as u16;
                }

                // 按需扩容缓冲区（容量以帧计）
                if sample_buf.is_none() || buf_frames < audio_buf.capacity() {
                    buf_frames = audio_buf.capacity();
                    sample_buf = Some(SampleBuffer::new(buf_frames as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(audio_buf);
                    samples.extend_from_slice(buf.samples());
                }
            }
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            // 单个损坏包跳过
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("跳过损坏的包 / skipping bad packet in {}: {msg}", path.display());
                continue;
            }
            Err(e) => return Err(decoding_error("解码失败 / decode failed", e)),
        }
    }

    if samples.is_empty() {
        return Err(ConvertError::Decoding(
            "未解码到任何样本 / no samples decoded".to_string(),
        ));
    }

    let pcm = PcmAudio::new(sample_rate, channels, samples);
    pcm.validate()?;
    Ok(pcm)
}
