//! 数据源
//!
//! 启动时对固定接口发起一次 GET，返回角色列表。不重试，不分页。

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Character;

/// HTTP 数据源
#[derive(Clone)]
pub struct HttpSource {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 拉取角色列表
    pub async fn fetch(&self) -> Result<Vec<Character>> {
        tracing::info!(endpoint = %self.endpoint, "fetching characters");

        let response = self.http_client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let characters = decode_characters(&body)?;
        tracing::info!(count = characters.len(), "fetched characters");
        Ok(characters)
    }
}

/// 解析接口返回的 JSON 数组，不做字段校验
pub fn decode_characters(body: &[u8]) -> Result<Vec<Character>> {
    Ok(serde_json::from_slice(body)?)
}

/// 在运行时上执行一次拉取，结果通过 oneshot 交回 UI 线程
pub fn spawn_fetch(runtime: &Handle, source: HttpSource) -> oneshot::Receiver<Result<Vec<Character>>> {
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        let result = source.fetch().await;
        // UI 已退出时接收端会被丢弃
        let _ = tx.send(result);
    });
    rx
}
