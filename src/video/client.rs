//! # 视频接口客户端
//!
//! ## 设计思路
//!
//! `VideoClient` 持有复用的 `reqwest::Client` 与配置，只做两件事：
//! 1. `fetch_video`：对解析接口发一次 GET，取出 `data`
//! 2. `download_video`：把 `play` 地址流式写入下载目录
//!
//! ## 实现思路
//!
//! - 查询参数按 `encodeURIComponent` 规则编码，和网页端生成的请求一致。
//! - 接口调用不重试也不设超时；连接失败、响应不是 JSON 都归为“无法连接到接口”。
//! - 下载先写 `.part` 临时文件，完整读完再改名；中途失败删除临时文件。

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tokio::io::AsyncWriteExt;

use super::{VideoConfig, VideoError};
use crate::downloads;
use crate::text_tools::encode_uri_component;

/// 接口响应。
#[derive(Debug, Clone, serde::Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<VideoInfo>,
}

/// 视频作者。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoAuthor {
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// 接口返回的视频信息（只保留用到的字段）。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    pub play: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub author: Option<VideoAuthor>,
}

/// 下载结果。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedVideo {
    pub path: String,
    pub size_bytes: u64,
}

/// 视频客户端。
pub struct VideoClient {
    config: VideoConfig,
    http_client: reqwest::Client,
}

impl VideoClient {
    pub fn new(config: VideoConfig) -> Result<Self, VideoError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| VideoError::Client(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// 组装解析接口地址。
    pub fn api_url(&self, video_url: &str) -> String {
        format!("{}?url={}", self.config.endpoint, encode_uri_component(video_url))
    }

    /// 查询视频信息。
    pub async fn fetch_video(&self, video_url: &str) -> Result<VideoInfo, VideoError> {
        let video_url = video_url.trim();
        if video_url.is_empty() {
            return Err(VideoError::EmptyUrl);
        }

        let started = Instant::now();
        let api_url = self.api_url(video_url);
        log::info!("🎬 查询视频信息 - {}", video_url);

        let response = self
            .http_client
            .get(&api_url)
            .send()
            .await
            .map_err(|e| VideoError::Unreachable(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| VideoError::Unreachable(e.to_string()))?;

        let parsed: ApiResponse = serde_json::from_slice(&body)
            .map_err(|e| VideoError::Unreachable(format!("响应不是合法 JSON：{}", e)))?;

        if parsed.code != 0 {
            log::warn!("⚠️ 接口拒绝 - code={} msg={:?}", parsed.code, parsed.msg);
            return Err(VideoError::Rejected {
                code: parsed.code,
                message: parsed.msg,
            });
        }

        let info = parsed.data.ok_or(VideoError::Rejected {
            code: parsed.code,
            message: Some("响应缺少 data".to_string()),
        })?;

        log::info!("✅ 视频信息获取完成 - total={}ms", started.elapsed().as_millis());
        Ok(info)
    }

    /// 下载文件名：`tiktok-{时间戳}.mp4`。
    pub fn video_file_name() -> String {
        format!("tiktok-{}.mp4", Local::now().format("%Y%m%d%H%M%S"))
    }

    /// 流式下载视频到目录。
    pub async fn download_video(&self, info: &VideoInfo, dir: &Path) -> Result<DownloadedVideo, VideoError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| VideoError::FileSystem(format!("创建目录失败：{}", e)))?;
        let path: PathBuf = downloads::unique_path(dir, &Self::video_file_name());
        let part_path = part_path_for(&path);

        let started = Instant::now();
        let response = self
            .http_client
            .get(&info.play)
            .send()
            .await
            .map_err(|e| VideoError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VideoError::Download(format!("HTTP {}", response.status().as_u16())));
        }

        let total = match stream_to_file(response, &part_path).await {
            Ok(total) => total,
            Err(err) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                log::warn!("❌ 视频下载中断 code={}：{}", err.code(), err);
                return Err(err);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(VideoError::FileSystem(format!("保存文件失败：{}", e)));
        }

        log::info!(
            "✅ 视频下载完成 - {} ({} 字节, {}ms)",
            path.display(),
            total,
            started.elapsed().as_millis()
        );

        Ok(DownloadedVideo {
            path: path.to_string_lossy().into_owned(),
            size_bytes: total,
        })
    }
}

/// `tiktok-x.mp4` → `tiktok-x.mp4.part`
fn part_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

async fn stream_to_file(mut response: reqwest::Response, path: &Path) -> Result<u64, VideoError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| VideoError::FileSystem(format!("创建文件失败：{}", e)))?;
    let mut total: u64 = 0;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| VideoError::Download(e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| VideoError::FileSystem(format!("写入文件失败：{}", e)))?;
        total = total.saturating_add(chunk.len() as u64);
    }

    file.flush()
        .await
        .map_err(|e| VideoError::FileSystem(format!("写入文件失败：{}", e)))?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// 单连接 HTTP 服务：返回固定响应，并把请求行回传给测试。
    fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> (String, mpsc::Receiver<String>) {
        let declared = body.len();
        serve_truncated(status, content_type, declared, body)
    }

    /// 同上，但 `Content-Length` 可以大于实际发送的字节数。
    fn serve_truncated(
        status: &'static str,
        content_type: &'static str,
        declared_len: usize,
        body: Vec<u8>,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let mut req_buf = [0u8; 4096];
            let n = stream.read(&mut req_buf).unwrap_or(0);
            let request = String::from_utf8_lossy(&req_buf[..n]).into_owned();
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status, content_type, declared_len
            );
            stream.write_all(head.as_bytes()).expect("write headers failed");
            stream.write_all(&body).expect("write body failed");
            stream.flush().expect("flush failed");
        });

        (format!("http://127.0.0.1:{}/api/", addr.port()), rx)
    }

    fn client_for(endpoint: &str) -> VideoClient {
        VideoClient::new(VideoConfig::with_endpoint(endpoint)).expect("client")
    }

    #[test]
    fn api_url_encodes_like_encode_uri_component() {
        let client = client_for("https://tikwm.com/api/");
        assert_eq!(
            client.api_url("https://www.tiktok.com/@user/video/1?lang=pt"),
            "https://tikwm.com/api/?url=https%3A%2F%2Fwww.tiktok.com%2F%40user%2Fvideo%2F1%3Flang%3Dpt"
        );
    }

    #[tokio::test]
    async fn blank_url_is_rejected_without_request() {
        let client = client_for("http://127.0.0.1:9/api/");
        assert!(matches!(client.fetch_video("   ").await, Err(VideoError::EmptyUrl)));
    }

    #[tokio::test]
    async fn successful_response_returns_data() {
        let body = br#"{"code":0,"msg":"success","data":{"play":"https://cdn.example/v.mp4","title":"oi","duration":12,"author":{"unique_id":"dev","nickname":"Dev"}}}"#;
        let (endpoint, requests) = serve_once("200 OK", "application/json", body.to_vec());
        let client = client_for(&endpoint);

        let info = client
            .fetch_video("https://www.tiktok.com/@dev/video/42")
            .await
            .expect("fetch should succeed");

        assert_eq!(info.play, "https://cdn.example/v.mp4");
        assert_eq!(info.duration, Some(12));
        assert_eq!(info.author.and_then(|a| a.unique_id).as_deref(), Some("dev"));

        let request_line = requests.recv().expect("request line");
        assert!(request_line.starts_with("GET /api/?url=https%3A%2F%2Fwww.tiktok.com%2F%40dev%2Fvideo%2F42 "));
    }

    #[tokio::test]
    async fn nonzero_code_is_rejected() {
        let body = br#"{"code":-1,"msg":"Url parsing is failed!"}"#;
        let (endpoint, _) = serve_once("200 OK", "application/json", body.to_vec());
        let result = client_for(&endpoint).fetch_video("https://x").await;
        assert!(matches!(result, Err(VideoError::Rejected { code: -1, .. })));
    }

    #[tokio::test]
    async fn non_json_body_is_unreachable() {
        let (endpoint, _) = serve_once("502 Bad Gateway", "text/html", b"<html>bad</html>".to_vec());
        let result = client_for(&endpoint).fetch_video("https://x").await;
        assert!(matches!(result, Err(VideoError::Unreachable(_))));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let client = client_for(&format!("http://127.0.0.1:{}/api/", port));
        assert!(matches!(
            client.fetch_video("https://x").await,
            Err(VideoError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn download_streams_to_mp4_file() {
        let payload = vec![7u8; 64 * 1024];
        let (endpoint, _) = serve_once("200 OK", "video/mp4", payload.clone());
        let client = client_for("http://unused/");
        let dir = std::env::temp_dir().join(format!("dev-tools-video-{}", std::process::id()));

        let info = VideoInfo {
            play: format!("{}v.mp4", endpoint),
            title: None,
            cover: None,
            duration: None,
            author: None,
        };
        let saved = client.download_video(&info, &dir).await.expect("download");

        assert_eq!(saved.size_bytes, payload.len() as u64);
        assert!(saved.path.ends_with(".mp4"));
        assert!(Path::new(&saved.path)
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("tiktok-")));
        assert_eq!(std::fs::read(&saved.path).expect("read video"), payload);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn truncated_download_leaves_no_file() {
        let (endpoint, _) = serve_truncated("200 OK", "video/mp4", 100_000, vec![1u8; 1000]);
        let client = client_for("http://unused/");
        let dir = std::env::temp_dir().join(format!("dev-tools-video-cut-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let info = VideoInfo {
            play: format!("{}v.mp4", endpoint),
            title: None,
            cover: None,
            duration: None,
            author: None,
        };
        let result = client.download_video(&info, &dir).await;

        assert!(matches!(result, Err(VideoError::Download(_))));
        let leftovers = std::fs::read_dir(&dir).expect("dir exists").count();
        assert_eq!(leftovers, 0);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn part_file_sits_next_to_target() {
        let part = part_path_for(Path::new("/tmp/videos/tiktok-1.mp4"));
        assert_eq!(part, Path::new("/tmp/videos/tiktok-1.mp4.part"));
    }
}
