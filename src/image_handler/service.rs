//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `ImageServiceState` 作为 Tauri 注入状态，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由 `main.rs` 统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//!
//! ## 实现思路
//!
//! 每个工具操作都是纯 CPU 任务，统一经 `run_blocking` 放进
//! `tokio::task::spawn_blocking`，避免阻塞 IPC 所在的异步运行时。
//! 失败时记录错误码，便于按类型聚合日志。

use std::sync::Arc;

use super::crop::CropRect;
use super::export::{EncodedImage, ExportFormat, ImagePreview};
use super::handler::{
    ConvertOutput, ConvertRequest, CropOutput, ImageInfo, NamedImage, ResizeOutput,
};
use super::placeholder::{self, PlaceholderOptions};
use super::qr::{self, QrOptions};
use super::{ImageConfig, ImageError, ImageHandler, ImageSource};

/// 占位图预览：图片本身 + 页面上的展示尺寸。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderPreview {
    pub image: ImagePreview,
    pub file_name: String,
    pub display_width: u32,
    pub display_height: u32,
}

/// 图片处理服务状态。
///
/// 作为 Tauri `State` 注入到命令层，内部持有 `ImageHandler`。
pub struct ImageServiceState {
    handler: Arc<ImageHandler>,
}

impl ImageServiceState {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use dev_tools::image_handler::ImageServiceState;
    ///
    /// let service = ImageServiceState::new()?;
    /// # Ok::<(), dev_tools::image_handler::ImageError>(())
    /// ```
    pub fn new() -> Result<Self, ImageError> {
        Self::with_config(ImageConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    pub fn with_config(config: ImageConfig) -> Result<Self, ImageError> {
        Ok(Self {
            handler: Arc::new(ImageHandler::new(config)?),
        })
    }

    async fn run_blocking<T, F>(&self, op: &'static str, task: F) -> Result<T, ImageError>
    where
        T: Send + 'static,
        F: FnOnce(&ImageHandler) -> Result<T, ImageError> + Send + 'static,
    {
        let handler = Arc::clone(&self.handler);
        let result = tokio::task::spawn_blocking(move || task(handler.as_ref()))
            .await
            .map_err(|e| ImageError::Task(format!("{} 线程执行失败：{}", op, e)))?;

        if let Err(err) = &result {
            log::warn!("❌ {} 失败 code={}：{}", op, err.code(), err);
        }
        result
    }

    pub async fn inspect(&self, source: ImageSource) -> Result<ImageInfo, ImageError> {
        self.run_blocking("inspect", move |h| h.inspect(&source)).await
    }

    pub async fn convert(&self, request: ConvertRequest) -> Result<ConvertOutput, ImageError> {
        self.run_blocking("convert", move |h| h.convert(&request)).await
    }

    pub async fn export_converted(
        &self,
        request: ConvertRequest,
        format: ExportFormat,
        with_effect: bool,
    ) -> Result<NamedImage, ImageError> {
        self.run_blocking("export_converted", move |h| {
            h.export_converted(&request, format, with_effect)
        })
        .await
    }

    /// “全部下载”：同一组参数依次处理多张图片，任一失败即中止。
    pub async fn export_converted_batch(
        &self,
        requests: Vec<ConvertRequest>,
        format: ExportFormat,
        with_effect: bool,
    ) -> Result<Vec<NamedImage>, ImageError> {
        self.run_blocking("export_converted_batch", move |h| {
            requests
                .iter()
                .map(|request| h.export_converted(request, format, with_effect))
                .collect()
        })
        .await
    }

    pub async fn resize(&self, source: ImageSource, width: u32, height: u32) -> Result<ResizeOutput, ImageError> {
        self.run_blocking("resize", move |h| h.resize(&source, width, height)).await
    }

    pub async fn export_resized(
        &self,
        source: ImageSource,
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> Result<NamedImage, ImageError> {
        self.run_blocking("export_resized", move |h| {
            h.export_resized(&source, width, height, format)
        })
        .await
    }

    pub async fn crop(&self, source: ImageSource, rect: CropRect) -> Result<CropOutput, ImageError> {
        self.run_blocking("crop", move |h| h.crop(&source, rect)).await
    }

    pub async fn export_cropped(&self, source: ImageSource, rect: CropRect) -> Result<NamedImage, ImageError> {
        self.run_blocking("export_cropped", move |h| h.export_cropped(&source, rect)).await
    }

    pub async fn placeholder(&self, options: PlaceholderOptions) -> Result<NamedImage, ImageError> {
        self.run_blocking("placeholder", move |_| {
            let image: EncodedImage = placeholder::render_placeholder(&options)?;
            Ok(NamedImage {
                file_name: options.file_name(),
                image,
            })
        })
        .await
    }

    pub async fn placeholder_preview(&self, options: PlaceholderOptions) -> Result<PlaceholderPreview, ImageError> {
        let (display_width, display_height) = placeholder::preview_size(options.width, options.height);
        let named = self.placeholder(options).await?;
        Ok(PlaceholderPreview {
            image: named.image.preview(),
            file_name: named.file_name,
            display_width,
            display_height,
        })
    }

    pub async fn qr_code(&self, options: QrOptions, format: ExportFormat) -> Result<NamedImage, ImageError> {
        self.run_blocking("qr_code", move |_| {
            Ok(NamedImage {
                file_name: qr::file_name(format),
                image: qr::render_qr(&options, format)?,
            })
        })
        .await
    }
}
