//! 视频下载错误模型。

/// 视频接口与下载错误。
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("请粘贴 TikTok 视频链接")]
    EmptyUrl,

    #[error("无法获取视频，请检查链接或稍后重试（code={code}）")]
    Rejected { code: i64, message: Option<String> },

    #[error("无法连接到接口，请稍后重试：{0}")]
    Unreachable(String),

    #[error("视频下载失败：{0}")]
    Download(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("HTTP 客户端初始化失败：{0}")]
    Client(String),
}

impl VideoError {
    /// 稳定错误码，供日志聚合。
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUrl => "empty_url",
            Self::Rejected { .. } => "rejected",
            Self::Unreachable(_) => "unreachable",
            Self::Download(_) => "download",
            Self::FileSystem(_) => "file_system",
            Self::Client(_) => "client",
        }
    }
}
