//! 音频编解码模块
//!
//! 两种后端：外部 ffmpeg 进程（所有格式）与原生 symphonia 解码 + hound WAV 编码。

pub mod codec;
pub mod decoder;
pub mod ffmpeg_bridge;
pub mod format;
pub mod native_codec;
pub mod remix;

pub use codec::{AudioCodec, AutoCodec, CodecKind};
pub use ffmpeg_bridge::FfmpegCodec;
pub use format::PcmAudio;
pub use native_codec::NativeCodec;
