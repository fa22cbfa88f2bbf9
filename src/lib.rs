//! # Dev Tools 开发者工具箱 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 前端 (ui/ 静态页面)                       │
//! │                                                          │
//! │  侧边栏导航 ── 各工具页 ── window.__TAURI__.core.invoke   │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ navigation ─ 路由表 / 过滤 / 404                      │
//! │  ├─ text_tools ─ Lorem / Base64 / CPF·CNPJ / WhatsApp    │
//! │  ├─ image_handler 转换·缩放·裁剪·占位图·二维码            │
//! │  ├─ video ────── TikTok 视频查询与下载                    │
//! │  ├─ clipboard ── 文本写入剪贴板                           │
//! │  └─ downloads ── 下载目录 / 不覆盖写入                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`navigation`] | 侧边栏路由表、按标签过滤、未知地址解析为 404 |
//! | [`text_tools`] | 纯文本工具：Lorem Ipsum、Base64、CPF/CNPJ、WhatsApp 链接 |
//! | [`image_handler`] | 图片解码、效果、缩放、裁剪、占位图、二维码与导出 |
//! | [`video`] | 调用解析接口获取 TikTok 视频并流式下载 |
//! | [`clipboard`] | 文本写入剪贴板，失败直接返回错误 |
//! | [`downloads`] | 下载目录解析、文件名清洗、同名不覆盖 |
//!
//! 不启用 `desktop` feature 时只编译纯逻辑部分，便于在无图形环境下测试。

pub mod error;
pub mod clipboard;
pub mod downloads;
pub mod image_handler;
pub mod navigation;
pub mod text_tools;
pub mod video;
