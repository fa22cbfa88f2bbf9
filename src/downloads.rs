//! 下载目录管理模块
//!
//! # 设计思路
//!
//! 工具页的“下载”按钮在桌面端落地为：把编码好的字节写入下载目录。
//! 目录优先使用用户指定的路径，否则使用系统下载目录。
//!
//! # 实现思路
//!
//! - 目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 文件名只保留最后一段，去掉路径分隔符，防止写出目录之外。
//! - 同名文件已存在时追加 ` (1)`、` (2)`…，不覆盖旧文件。
//! - 命令层通过 `save_bytes_async` 写盘，避免在异步运行时里做阻塞 IO。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::image_handler::export::format_file_size;

/// 写入结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    pub path: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub size_label: String,
}

/// 确保目录存在。
pub fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Storage(format!("创建目录 '{}' 失败: {}", dir.display(), e)))?;
    }
    Ok(())
}

/// 只保留文件名最后一段；为空时使用 `download`。
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.');
    if last.is_empty() {
        "download".to_string()
    } else {
        last.to_string()
    }
}

/// 在目录中找到不冲突的路径。
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.split_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (file_name, String::new()),
    };

    (1..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// 把字节写入目录，返回实际路径。
pub fn save_bytes(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<SavedFile, AppError> {
    ensure_dir(dir)?;
    let file_name = sanitize_file_name(file_name);
    let path = unique_path(dir, &file_name);
    fs::write(&path, bytes)?;

    let saved_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(file_name);
    log::info!("💾 已保存文件 - {} ({} 字节)", path.display(), bytes.len());

    Ok(SavedFile {
        path: path.to_string_lossy().into_owned(),
        file_name: saved_name,
        size_bytes: bytes.len() as u64,
        size_label: format_file_size(bytes.len() as u64),
    })
}

/// `save_bytes` 的异步版本，写盘放到阻塞线程执行。
pub async fn save_bytes_async(dir: PathBuf, file_name: String, bytes: Vec<u8>) -> Result<SavedFile, AppError> {
    tokio::task::spawn_blocking(move || save_bytes(&dir, &file_name, &bytes))
        .await
        .map_err(|e| AppError::Task(format!("保存文件线程执行失败：{}", e)))?
}

/// 获取下载目录
///
/// # 参数
/// * `app` - Tauri 应用句柄，用于获取系统目录
/// * `custom_dir` - 用户指定目录（可选）
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的下载目录
/// - `Err(AppError::Storage)` — 无法获取或创建目录
#[cfg(feature = "desktop")]
pub fn resolve_download_dir(app: &tauri::AppHandle, custom_dir: Option<String>) -> Result<PathBuf, AppError> {
    use tauri::Manager;

    if let Some(dir) = custom_dir.filter(|d| !d.trim().is_empty()) {
        let path = PathBuf::from(dir);
        ensure_dir(&path)?;
        return Ok(path);
    }

    let dir = match app.path().download_dir() {
        Ok(dir) => dir,
        Err(err) => {
            log::warn!("⚠️ 获取系统下载目录失败，回退到应用数据目录: {}", err);
            app.path()
                .app_data_dir()
                .map_err(|e| AppError::Storage(format!("获取应用数据目录失败: {}", e)))?
                .join("downloads")
        }
    };
    ensure_dir(&dir)?;
    Ok(dir)
}
