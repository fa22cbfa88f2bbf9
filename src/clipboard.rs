//! 剪贴板写入模块
//!
//! # 设计思路
//!
//! 工具页上的“复制”按钮（Lorem、Base64、WhatsApp 链接、CPF/CNPJ）统一经过这里写入系统剪贴板。
//! 只写文本，写一次；失败原样交给前端提示。
//!
//! # 实现思路
//!
//! - 底层使用 `arboard`，每次写入新建 `Clipboard` 句柄。
//! - `arboard` 调用是阻塞的，异步入口放进 `spawn_blocking`。

/// 剪贴板错误。
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("无法访问剪贴板：{0}")]
    Unavailable(String),

    #[error("写入剪贴板失败：{0}")]
    Write(String),

    #[error("后台任务失败：{0}")]
    Task(String),
}

fn write_error(error: arboard::Error) -> ClipboardError {
    match error {
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable(error.to_string()),
        other => ClipboardError::Write(other.to_string()),
    }
}

/// 同步写入文本（调用方需位于阻塞线程）。
pub fn write_text_blocking(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    clipboard.set_text(text.to_owned()).map_err(write_error)?;
    log::debug!("📋 已复制文本到剪贴板 - {} 字符", text.chars().count());
    Ok(())
}

/// 异步写入文本。
pub async fn write_text(text: String) -> Result<(), ClipboardError> {
    tokio::task::spawn_blocking(move || write_text_blocking(&text))
        .await
        .map_err(|e| ClipboardError::Task(e.to_string()))?
}

/// 将文本写入系统剪贴板。
#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn write_text_to_clipboard(text: String) -> Result<(), crate::error::AppError> {
    if let Err(err) = write_text(text).await {
        log::warn!("❌ 复制失败：{}", err);
        return Err(err.into());
    }
    Ok(())
}
