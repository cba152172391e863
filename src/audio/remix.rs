//! 重采样与声道重混
//!
//! 原生转换路径的中间两步：
//!
//! 1. [`resample`]：线性插值重采样到目标采样率（逐声道）。
//! 2. [`remix_channels`]：调整交错音频的声道数。
//!
//! 声道映射规则：
//! - 单声道 → N：复制到每个声道
//! - N → 单声道：所有声道取平均
//! - N → M（M < N）：源声道 `j` 折叠到输出声道 `j % M`，按折叠数取平均
//! - N → M（M > N）：输出声道 `c` 取源声道 `c % N`

use super::format::PcmAudio;

/// 线性插值重采样
///
/// 采样率相同时原样返回；输出帧数为 `round(frames * target / source)`。
pub fn resample(audio: &PcmAudio, target_rate: u32) -> PcmAudio {
    if audio.sample_rate == target_rate || target_rate == 0 || audio.sample_rate == 0 {
        return audio.clone();
    }
    if audio.samples.is_empty() || audio.channels == 0 {
        return PcmAudio::new(target_rate, audio.channels, Vec::new());
    }

    let channels = audio.channels as usize;
    let in_frames = audio.frames();
    let ratio = target_rate as f64 / audio.sample_rate as f64;
    let out_frames = (in_frames as f64 * ratio).round() as usize;

    let mut output = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        for ch in 0..channels {
            let sample = if idx + 1 < in_frames {
                let a = audio.samples[idx * channels + ch];
                let b = audio.samples[(idx + 1) * channels + ch];
                a * (1.0 - frac) + b * frac
            } else if idx < in_frames {
                audio.samples[idx * channels + ch]
            } else {
                audio.samples[(in_frames - 1) * channels + ch]
            };
            output.push(sample);
        }
    }

    PcmAudio::new(target_rate, audio.channels, output)
}

/// 调整声道数
pub fn remix_channels(audio: &PcmAudio, target_channels: u16) -> PcmAudio {
    let src = audio.channels as usize;
    let dst = target_channels as usize;

    if src == dst || src == 0 || dst == 0 {
        return audio.clone();
    }

    let frames = audio.frames();
    let mut output = Vec::with_capacity(frames * dst);

    for frame in audio.samples.chunks_exact(src) {
        if dst < src {
            // 折叠：源声道 j -> 输出声道 j % dst
            for c in 0..dst {
                let (sum, count) = frame
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| j % dst == c)
                    .fold((0.0f32, 0usize), |(s, n), (_, v)| (s + v, n + 1));
                output.push(sum / count as f32);
            }
        } else {
            for c in 0..dst {
                output.push(frame[c % src]);
            }
        }
    }

    PcmAudio::new(audio.sample_rate, target_channels, output)
}
