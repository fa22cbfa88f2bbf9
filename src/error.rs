//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，各工具模块保留自己的错误类型
//! （`ImageError`、`TextToolError`、`VideoError`、`ClipboardError`），
//! 在命令边界通过 `From` 汇聚到这里。
//!
//! 所有 `#[tauri::command]` 函数统一返回 `Result<T, AppError>`，
//! 前端收到的错误总是一段可直接展示的文字。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 模块错误用 `#[from]` 转换，命令函数里直接 `?`。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::clipboard::ClipboardError;
use crate::image_handler::ImageError;
use crate::text_tools::TextToolError;
use crate::video::VideoError;

/// 应用级统一错误类型
///
/// 所有 Tauri command 均返回此类型，确保前端收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板写入失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(#[from] ClipboardError),

    /// 图片处理错误（加载 / 解码 / 变换 / 编码）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文本工具输入错误
    #[error("{0}")]
    Text(#[from] TextToolError),

    /// 视频接口错误
    #[error("{0}")]
    Video(#[from] VideoError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 下载目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 后台任务异常退出
    #[error("后台任务失败: {0}")]
    Task(String),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
