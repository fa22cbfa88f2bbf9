//! # TikTok 视频下载模块（video）
//!
//! ## 设计思路
//!
//! 页面只需要两步：粘贴链接查询视频信息，然后把视频保存到本地。
//! 查询走第三方解析接口（`tikwm.com`），下载直接流式读取接口返回的 `play` 地址。
//!
//! - `config`：接口地址、超时、User-Agent
//! - `client`：`VideoClient`，负责查询与下载
//! - `error`：`VideoError`，区分空链接、接口拒绝、无法连接、超时与写盘失败
//! - `commands`：Tauri 命令（需 `desktop` feature）
//!
//! ## 实现思路
//!
//! ```text
//! fetch_tiktok_video(url)
//!    ↓ GET {endpoint}?url=encodeURIComponent(url)
//!    ├─ 非 JSON / 网络失败 → Unreachable
//!    ├─ code != 0          → Rejected
//!    └─ code == 0          → VideoInfo
//! download_tiktok_video(info)
//!    ↓ 流式写入 tiktok-{时间戳}.mp4
//! ```

mod client;
#[cfg(feature = "desktop")]
pub mod commands;
mod config;
mod error;

pub use client::{DownloadedVideo, VideoAuthor, VideoClient, VideoInfo};
pub use config::{DEFAULT_ENDPOINT, VideoConfig};
pub use error::VideoError;
