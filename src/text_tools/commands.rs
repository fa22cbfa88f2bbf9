//! # 文本工具 Tauri 命令
//!
//! 薄封装：参数原样转发给各子模块的纯函数。

use super::base64_codec::{self, Mode};
use super::documents::{self, DocumentKind};
use super::{lorem, whatsapp};
use crate::error::AppError;

/// 生成 Lorem Ipsum；传入 `existing` 时追加在其后。
#[tauri::command]
pub fn generate_lorem(count: usize, existing: Option<String>) -> Result<String, AppError> {
    let text = match existing {
        Some(existing) => lorem::generate_more(&existing, count)?,
        None => lorem::generate(count)?,
    };
    Ok(text)
}

#[tauri::command]
pub fn process_base64(mode: Mode, input: String) -> Result<String, AppError> {
    Ok(base64_codec::process(mode, &input)?)
}

#[tauri::command]
pub fn generate_document(kind: DocumentKind, formatted: bool) -> String {
    documents::generate(kind, formatted)
}

#[tauri::command]
pub fn normalize_document_input(kind: DocumentKind, value: String, formatted: bool) -> String {
    documents::normalize_input(kind, &value, formatted)
}

#[tauri::command]
pub fn validate_document(kind: DocumentKind, value: String) -> bool {
    documents::is_valid(kind, &value)
}

#[tauri::command]
pub fn format_whatsapp_phone(value: String) -> String {
    whatsapp::format_phone(&value)
}

#[tauri::command]
pub fn build_whatsapp_link(country_code: String, phone: String, message: String) -> String {
    whatsapp::build_link(&country_code, &phone, &message)
}
