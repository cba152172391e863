//! 文件发现集成测试
//!
//! 验证递归扫描、扩展名过滤与根目录错误处理。

mod common;

use batch_audio_converter::error::ConvertError;
use batch_audio_converter::tools::scanner::{enumerate_candidates, scan_audio_files};
use common::{log, touch};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn exts(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 嵌套目录中的匹配文件全部被发现，非匹配文件被忽略
#[test]
fn test_recursive_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a.wav"));
    touch(&root.join("sub/b.wav"));
    touch(&root.join("sub/deeper/c.flac"));
    touch(&root.join("c.txt"));
    touch(&root.join("sub/cover.jpg"));

    let found = scan_audio_files(root, &exts(&[".wav", ".flac"])).unwrap();

    assert_eq!(
        found,
        vec![
            root.join("a.wav"),
            root.join("sub/b.wav"),
            root.join("sub/deeper/c.flac"),
        ]
    );
    log("  ✓ 递归发现3个文件", "recursive discovery found 3 files");
}

/// 扩展名大小写不敏感
#[test]
fn test_uppercase_extensions_match() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("LOUD.WAV"));
    touch(&dir.path().join("Mixed.Flac"));

    let found = scan_audio_files(dir.path(), &exts(&[".wav", ".flac"])).unwrap();
    assert_eq!(found.len(), 2);
}

/// 没有扩展名或扩展名不在列表中的文件不会出现
#[test]
fn test_extensionless_and_foreign_files_ignored() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("README"));
    touch(&dir.path().join("wav"));
    touch(&dir.path().join("notes.wav.txt"));

    let found = scan_audio_files(dir.path(), &exts(&[".wav"])).unwrap();
    assert!(found.is_empty());
}

/// 空目录返回空列表而不是错误
#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let found = scan_audio_files(dir.path(), &exts(&[".wav"])).unwrap();
    assert!(found.is_empty());
}

/// 根目录不存在是致命错误
#[test]
fn test_missing_root_is_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = scan_audio_files(&missing, &exts(&[".wav"])).unwrap_err();
    assert!(matches!(err, ConvertError::Filesystem { .. }));
    log("  ✓ 根目录不存在返回文件系统错误", "missing root yields Filesystem error");
}

/// 根路径是文件也视为致命错误
#[test]
fn test_root_is_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.wav");
    touch(&file);

    let err = scan_audio_files(&file, &exts(&[".wav"])).unwrap_err();
    assert!(matches!(err, ConvertError::Filesystem { .. }));
}

/// 枚举只返回普通文件，不包含目录
#[test]
fn test_enumerate_returns_files_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("album.wav")).unwrap();
    touch(&dir.path().join("album.wav/track.wav"));

    let candidates = enumerate_candidates(dir.path());
    assert_eq!(candidates, vec![PathBuf::from(dir.path().join("album.wav/track.wav"))]);
}

/// 子目录不可读时跳过，不中止扫描
#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("ok.wav"));
    let locked = dir.path().join("locked");
    touch(&locked.join("hidden.wav"));
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    let result = scan_audio_files(dir.path(), &exts(&[".wav"]));

    // 恢复权限以便tempdir清理
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let found = result.unwrap();
    assert!(found.contains(&dir.path().join("ok.wav")));
    // root用户无视权限位，此时 hidden.wav 也会被发现
    assert!(found.len() == 1 || found.len() == 2);
}
