use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::api::client::ApiClient;

/// 考点记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPoint {
    pub id: i64,
    pub province_id: i64,
    pub subject: String,
    pub grade: String,
    pub semester: String,
    pub level1_point: String,
    #[serde(default)]
    pub level2_point: Option<String>,
    #[serde(default)]
    pub level3_point: Option<String>,
    pub description: String,
    /// 历年高考覆盖率
    pub coverage_rate: f64,
    pub added_by: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub province_name: Option<String>,
    #[serde(default)]
    pub added_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// 新建/导入考点的提交记录
#[derive(Debug, Clone, Serialize)]
pub struct ExamPointCreate {
    pub province_id: i64,
    pub subject: String,
    pub grade: String,
    pub semester: String,
    pub level1_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level2_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level3_point: Option<String>,
    pub description: String,
    pub coverage_rate: f64,
    pub added_by: String,
    pub is_active: bool,
}

/// 考点编辑表单，未填的字段不提交
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExamPointUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level1_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level2_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level3_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 考点查询条件
#[derive(Debug, Clone, Default)]
pub struct ExamPointQuery {
    pub province_id: Option<i64>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub semester: Option<String>,
    pub level1_point: Option<String>,
    pub level2_point: Option<String>,
    pub level3_point: Option<String>,
    pub description: Option<String>,
}

impl ExamPointQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.province_id {
            params.push(("province_id", id.to_string()));
        }
        let text_fields = [
            ("subject", &self.subject),
            ("grade", &self.grade),
            ("semester", &self.semester),
            ("level1_point", &self.level1_point),
            ("level2_point", &self.level2_point),
            ("level3_point", &self.level3_point),
            ("description", &self.description),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value {
                if !v.is_empty() {
                    params.push((key, v.clone()));
                }
            }
        }
        params
    }
}

#[derive(Debug, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub imported_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 按条件查询考点列表
pub async fn list_exam_points(
    client: &mut ApiClient,
    query: &ExamPointQuery,
) -> Result<Vec<ExamPoint>> {
    client.get_json("/exam-points", &query.to_params()).await
}

/// 获取单个考点
pub async fn get_exam_point(client: &mut ApiClient, id: i64) -> Result<ExamPoint> {
    client.get_json(&format!("/exam-points/{id}"), &[]).await
}

/// 创建考点
pub async fn create_exam_point(
    client: &mut ApiClient,
    create: &ExamPointCreate,
) -> Result<ExamPoint> {
    let point: ExamPoint = client.post_json("/exam-points", create).await?;
    info!("考点创建成功: id={}", point.id);
    Ok(point)
}

/// 更新考点
pub async fn update_exam_point(
    client: &mut ApiClient,
    id: i64,
    update: &ExamPointUpdate,
) -> Result<ExamPoint> {
    let point: ExamPoint = client
        .put_json(&format!("/exam-points/{id}"), update)
        .await?;
    info!("考点更新成功: id={}", point.id);
    Ok(point)
}

/// 删除考点
pub async fn delete_exam_point(client: &mut ApiClient, id: i64) -> Result<MessageResponse> {
    client.delete_json(&format!("/exam-points/{id}")).await
}

/// 批量导入考点
pub async fn import_exam_points(
    client: &mut ApiClient,
    points: &[ExamPointCreate],
) -> Result<ImportResponse> {
    let body = json!({ "exam_points": points });
    let resp: ImportResponse = client.post_json("/exam-points/import", &body).await?;
    info!("批量导入完成: {}", resp.message);
    Ok(resp)
}
