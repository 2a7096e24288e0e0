use std::path::PathBuf;

use anyhow::{Context, Result};

/// 登录会话：令牌落盘保存，后续命令直接复用。
///
/// 整个进程里令牌只从这里读（[`token`](Session::token)），也只在这里
/// 失效（[`clear`](Session::clear)，401 或显式登出时由客户端调用）。
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    token: Option<String>,
}

impl Session {
    /// 从令牌文件加载会话；文件不存在即未登录
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = std::fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Session { path, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 登录成功后保存令牌
    pub fn store(&mut self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token)
            .with_context(|| format!("写入令牌文件失败: {}", self.path.display()))?;
        self.token = Some(token.to_string());
        Ok(())
    }

    /// 清除令牌（登录过期或登出）
    pub fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("删除令牌文件失败: {}", self.path.display()))?;
        }
        self.token = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("token"));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_store_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let mut session = Session::load(&path);
        session.store("abc123").unwrap();
        assert_eq!(session.token(), Some("abc123"));

        let reloaded = Session::load(&path);
        assert_eq!(reloaded.token(), Some("abc123"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let mut session = Session::load(&path);
        session.store("abc123").unwrap();
        session.clear().unwrap();

        assert!(!session.is_authenticated());
        assert!(!path.exists());
        // 重复清除不报错
        session.clear().unwrap();
    }

    #[test]
    fn test_blank_token_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        let session = Session::load(&path);
        assert!(!session.is_authenticated());
    }
}
