//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“图片来源识别 → 加载校验 → 解码 → 变换 → 编码导出 → Tauri 命令暴露”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装，需 `desktop` feature）
//! - `service`：承载可注入状态（`ImageServiceState`），把 CPU 任务放进阻塞线程
//! - `handler`：编排各工具的处理流程，持有配置与解码缓存
//! - `loader`：负责上传内容/本地文件加载、体积校验与类型识别
//! - `pipeline`：负责解码与像素/内存限制
//! - `effects`：像素化、模糊、灰度
//! - `resize` / `crop`：缩放与裁剪工具
//! - `placeholder` / `qr`：无需输入图片的生成类工具
//! - `export`：PNG / JPEG / WEBP / SVG 编码与体积统计
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 前端 invoke
//!    ↓
//! commands.rs（参数适配）
//!    ↓
//! service.rs（State 注入、spawn_blocking）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积校验）
//!    ├─ pipeline.rs（解码 + 像素限制）
//!    ├─ effects.rs / resize.rs / crop.rs（变换）
//!    └─ export.rs（编码）
//!    ↓
//! 返回 AppError 给前端
//! ```
//!
//! ## 分层职责建议
//!
//! - 调用入口变更（命令名/参数）优先改 `commands.rs`
//! - 配置与取值范围变更优先改 `config.rs`
//! - 业务流程顺序变更优先改 `handler.rs`
//! - 单个算法的行为优化分别改对应子模块

#[cfg(feature = "desktop")]
pub mod commands;
mod config;
pub mod crop;
pub mod effects;
mod error;
pub mod export;
mod handler;
mod loader;
mod pipeline;
pub mod placeholder;
pub mod qr;
pub mod resize;
mod service;
mod source;

pub use config::{
    DEFAULT_EFFECT_LEVEL, DEFAULT_QUALITY, EFFECT_LEVEL_RANGE, ImageConfig, QUALITY_RANGE,
    validate_effect_level, validate_quality,
};
pub use effects::Effect;
pub use error::ImageError;
pub use export::{EncodedImage, ExportFormat, FileSizes, ImagePreview};
pub use handler::{
    ConvertOutput, ConvertRequest, CropOutput, ImageHandler, ImageInfo, NamedImage, ResizeOutput,
};
pub use resize::{DimensionField, ResizeControls, ResizeDimensions};
pub use service::{ImageServiceState, PlaceholderPreview};
pub use source::{Bitmap, FALLBACK_STEM, ImageSource, mime_extension};
