use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::client::ApiClient;
use crate::api::location::{City, Province};

/// 用户信息（列表与详情共用），字段与后端返回一一对应
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub province_id: Option<i64>,
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub province: Option<Province>,
    #[serde(default)]
    pub city: Option<City>,
}

/// 用户编辑表单，未填的字段不提交
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Debug, Serialize)]
struct ApprovalRequest {
    is_approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 获取用户列表
pub async fn list_users(client: &mut ApiClient) -> Result<Vec<User>> {
    client.get_json("/users", &[]).await
}

/// 获取单个用户信息
pub async fn get_user(client: &mut ApiClient, user_id: i64) -> Result<User> {
    client.get_json(&format!("/users/{user_id}"), &[]).await
}

/// 更新用户信息
pub async fn update_user(client: &mut ApiClient, user_id: i64, update: &UserUpdate) -> Result<User> {
    let user: User = client
        .put_json(&format!("/users/{user_id}"), update)
        .await?;
    info!("用户 {} 更新成功", user.username);
    Ok(user)
}

/// 审核用户（通过或驳回）
pub async fn approve_user(client: &mut ApiClient, user_id: i64, approved: bool) -> Result<User> {
    client
        .put_json(
            &format!("/users/{user_id}/approve"),
            &ApprovalRequest {
                is_approved: approved,
            },
        )
        .await
}

/// 切换用户激活/禁用状态
pub async fn toggle_user_status(client: &mut ApiClient, user_id: i64) -> Result<MessageResponse> {
    client
        .put_empty(&format!("/users/{user_id}/toggle-status"))
        .await
}

/// 删除用户（软删除）
pub async fn delete_user(client: &mut ApiClient, user_id: i64) -> Result<MessageResponse> {
    client.delete_json(&format!("/users/{user_id}")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_skips_unset_fields() {
        let update = UserUpdate {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"email": "new@example.com"}));
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_user_deserialize_minimal() {
        // 后端老数据可能缺大量可选字段
        let user: User = serde_json::from_str(
            r#"{"id": 1, "username": "admin", "email": "admin@example.com"}"#,
        )
        .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.is_approved, None);
    }

    mod online {
        use super::super::*;
        use crate::config::AppConfig;

        #[tokio::test]
        #[ignore] // 需要真实后端与已登录令牌
        async fn test_list_users() {
            let config = AppConfig::load().expect("加载配置失败");
            let mut client = ApiClient::new(&config);
            let users = list_users(&mut client).await.expect("获取用户列表失败");
            println!("共 {} 个用户", users.len());
        }
    }
}
