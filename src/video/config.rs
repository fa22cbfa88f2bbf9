//! 视频客户端配置。

pub const DEFAULT_ENDPOINT: &str = "https://tikwm.com/api/";

/// 视频客户端配置。
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// 解析接口地址（测试时指向本地服务）。
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl VideoConfig {
    /// 指向自定义接口，其余保持默认。
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}
