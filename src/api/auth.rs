use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::client::ApiClient;
use crate::api::users::User;

/// 登录返回的令牌
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// 注册表单：一项输入一个字段，提交前整体校验
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i64>,
}

impl RegisterForm {
    /// 提交前校验必填项
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            bail!("用户名不能为空");
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            bail!("邮箱格式不正确: {}", self.email);
        }
        if self.password.len() < 6 {
            bail!("密码长度至少 6 位");
        }
        Ok(())
    }
}

/// 用户登录，成功后令牌写入会话文件
pub async fn login(client: &mut ApiClient, username: &str, password: &str) -> Result<Token> {
    let form = [("username", username), ("password", password)];
    let token: Token = client.post_form("/auth/login", &form).await?;
    client.session_mut().store(&token.access_token)?;
    info!("用户 {} 登录成功", username);
    Ok(token)
}

/// 用户注册
pub async fn register(client: &mut ApiClient, form: &RegisterForm) -> Result<User> {
    form.validate()?;
    let user: User = client.post_json("/auth/register", form).await?;
    info!("用户 {} 注册成功，待审核", user.username);
    Ok(user)
}

/// 获取当前登录用户信息
pub async fn current_user(client: &mut ApiClient) -> Result<User> {
    client.get_json("/users/me", &[]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_validation() {
        let mut form = RegisterForm {
            username: "student".to_string(),
            email: "student@example.com".to_string(),
            password: "secret123".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        form.email = "not-an-email".to_string();
        assert!(form.validate().is_err());

        form.email = "student@example.com".to_string();
        form.password = "123".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_register_form_optional_fields_skipped() {
        let form = RegisterForm {
            username: "student".to_string(),
            email: "student@example.com".to_string(),
            password: "secret123".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("phone").is_none());
        assert!(json.get("province_id").is_none());
    }

    mod online {
        use super::super::*;
        use crate::config::AppConfig;

        #[tokio::test]
        #[ignore] // 需要真实后端
        async fn test_login() {
            let config = AppConfig::load().expect("加载配置失败");
            let mut client = ApiClient::new(&config);
            let token = login(&mut client, "admin", "admin123").await.expect("登录失败");
            println!("token_type: {}", token.token_type);
        }
    }
}
