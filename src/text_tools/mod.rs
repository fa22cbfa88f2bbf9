//! # 文本工具模块（text_tools）
//!
//! ## 设计思路
//!
//! 文本类工具都是“字符串进、字符串出”的纯函数，没有共享状态：
//! - `lorem`：Lorem Ipsum 生成
//! - `base64_codec`：UTF-8 文本与 Base64 互转
//! - `documents`：CPF / CNPJ 校验位生成、格式化与校验
//! - `whatsapp`：WhatsApp 号码掩码与聊天链接
//!
//! 需要随机数的函数同时提供接受 `Rng` 的版本，测试可以用固定种子。
//! `commands` 仅在 `desktop` feature 下编译。

pub mod base64_codec;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod documents;
pub mod lorem;
pub mod whatsapp;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// 文本工具错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextToolError {
    #[error("单词数量必须大于 0")]
    WordCountTooLow,

    #[error("单词数量不能超过 {max}")]
    WordCountTooHigh { max: usize },

    #[error("无效的 Base64：{0}")]
    InvalidBase64(String),

    #[error("解码结果不是合法的 UTF-8 文本")]
    InvalidUtf8,
}

/// `encodeURIComponent` 不转义的字符之外全部百分号编码。
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 与浏览器 `encodeURIComponent` 一致的编码。
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// 只保留 ASCII 数字。
pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
