//! # 配置模块
//!
//! ## 设计思路
//!
//! 将解码上限与缓存容量集中到 `ImageConfig`，处理器创建时确定，之后只读。
//! 各工具的取值范围（效果强度、质量、占位图尺寸等）也放在这里，命令层只负责转发。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `validate_*` 系列函数把前端传入的数值统一校验成 `ImageError::InvalidParameter`。

use std::ops::RangeInclusive;

use super::ImageError;

/// 转换器效果强度滑块范围。
pub const EFFECT_LEVEL_RANGE: RangeInclusive<u32> = 2..=50;
/// 转换器默认效果强度。
pub const DEFAULT_EFFECT_LEVEL: u32 = 24;
/// 导出质量范围（百分比）。
pub const QUALITY_RANGE: RangeInclusive<u8> = 0..=100;
/// 转换器默认导出质量。
pub const DEFAULT_QUALITY: u8 = 90;
/// 缩放工具估算文件体积时使用的质量。
pub const RESIZE_ESTIMATE_QUALITY: u8 = 90;

/// 图片处理配置。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 解码缓存容量（条目数），0 表示关闭缓存。
    pub decode_cache_capacity: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            decode_cache_capacity: 8,
        }
    }
}

/// 校验效果强度。
pub fn validate_effect_level(level: u32) -> Result<u32, ImageError> {
    if !EFFECT_LEVEL_RANGE.contains(&level) {
        return Err(ImageError::InvalidParameter(format!(
            "效果强度必须在 {}~{} 之间：{}",
            EFFECT_LEVEL_RANGE.start(),
            EFFECT_LEVEL_RANGE.end(),
            level
        )));
    }
    Ok(level)
}

/// 校验导出质量。
pub fn validate_quality(quality: u8) -> Result<u8, ImageError> {
    if !QUALITY_RANGE.contains(&quality) {
        return Err(ImageError::InvalidParameter(format!(
            "质量必须在 {}~{} 之间：{}",
            QUALITY_RANGE.start(),
            QUALITY_RANGE.end(),
            quality
        )));
    }
    Ok(quality)
}
