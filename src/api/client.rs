use anyhow::{bail, Context, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::session::Session;
use crate::config::AppConfig;

/// 后端接口客户端：reqwest 连接池 + 会话令牌。
///
/// 所有请求统一从这里出去：自动带上 Bearer 令牌，401 时清除本地令牌，
/// 其他错误码取后端的 detail 字段报错。
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session: Session::load(&config.token_file),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 统一出口：带令牌、查状态码
    async fn send(&mut self, req: reqwest::RequestBuilder) -> Result<Response> {
        let req = match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await.context("请求发送失败，请检查后端地址")?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            // 唯一的会话失效点
            self.session.clear()?;
            bail!("登录已过期或未登录，请先执行 auth login");
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .and_then(|d| d.as_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| "无错误详情".to_string());
            bail!("接口返回错误 ({status}): {detail}");
        }

        debug!("{} -> {}", resp.url().path(), resp.status());
        Ok(resp)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let req = self.http.get(self.url(path)).query(query);
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    pub async fn post_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let req = self.http.post(self.url(path)).json(body);
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    pub async fn put_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let req = self.http.put(self.url(path)).json(body);
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    /// 无请求体的 PUT（如切换用户状态）
    pub async fn put_empty<T: DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let req = self.http.put(self.url(path));
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    pub async fn delete_json<T: DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let req = self.http.delete(self.url(path));
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    /// 表单编码 POST（登录接口用）
    pub async fn post_form<T: DeserializeOwned>(
        &mut self,
        path: &str,
        form: &impl Serialize,
    ) -> Result<T> {
        let req = self.http.post(self.url(path)).form(form);
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }

    /// multipart POST（文件上传用）
    pub async fn post_multipart<T: DeserializeOwned>(
        &mut self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let req = self.http.post(self.url(path)).multipart(form);
        let resp = self.send(req).await?;
        resp.json().await.context("响应解析失败")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            api_base_url: "http://localhost:8000/".to_string(),
            token_file: dir.join("token").display().to_string(),
            log_dir: dir.join("logs").display().to_string(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(dir.path()));
        assert_eq!(client.url("/exam-points"), "http://localhost:8000/exam-points");
    }

    #[test]
    fn test_session_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(&test_config(dir.path()));
        assert!(!client.session().is_authenticated());
    }
}
