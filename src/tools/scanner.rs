//! 文件扫描模块
//!
//! 两步纯函数：先递归枚举候选文件，再按扩展名过滤。
//! 只有根目录不可读是致命错误；子目录读取失败记录警告后跳过。

use super::config::ConvertConfig;
use super::utils;
use crate::error::{ConvertError, ConvertResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 扫描根目录，返回匹配扩展名的文件（已排序）
pub fn scan_audio_files(root: &Path, extensions: &BTreeSet<String>) -> ConvertResult<Vec<PathBuf>> {
    check_root(root)?;
    let candidates = enumerate_candidates(root);
    Ok(filter_by_extension(candidates, extensions))
}

/// 根目录必须存在、是目录且可读
fn check_root(root: &Path) -> ConvertResult<()> {
    let metadata = std::fs::metadata(root).map_err(|e| ConvertError::filesystem(root, e))?;
    if !metadata.is_dir() {
        return Err(ConvertError::filesystem(
            root,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "路径不是目录 / path is not a directory",
            ),
        ));
    }
    std::fs::read_dir(root).map_err(|e| ConvertError::filesystem(root, e))?;
    Ok(())
}

/// 递归枚举根目录下所有普通文件（尽力而为）
pub fn enumerate_candidates(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                log::warn!("跳过不可读路径 / skipping unreadable path {location}: {e}");
            }
        }
    }

    files
}

/// 按扩展名过滤（大小写不敏感），结果排序
pub fn filter_by_extension(candidates: Vec<PathBuf>, extensions: &BTreeSet<String>) -> Vec<PathBuf> {
    let mut matched: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| has_allowed_extension(path, extensions))
        .collect();
    matched.sort();
    matched
}

/// 文件扩展名（小写，带点）是否在允许列表中
#[inline]
pub fn has_allowed_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&format!(".{}", ext.to_lowercase())))
        .unwrap_or(false)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &ConvertConfig, audio_files: &[PathBuf], verbose: bool) {
    if audio_files.is_empty() {
        println!(
            "[WARNING] 在目录 {} 中没有找到匹配的音频文件 / no matching audio files found",
            config.root_directory.display()
        );
        let exts: Vec<&str> = config.input_extensions.iter().map(String::as_str).collect();
        println!("   匹配的扩展名 / extensions: {}", exts.join(", "));
        return;
    }

    println!("[SCAN] 扫描目录 / Directory: {}", config.root_directory.display());
    println!("[SCAN] 找到 {} 个音频文件 / files found", audio_files.len());

    if verbose {
        for (i, file) in audio_files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}
