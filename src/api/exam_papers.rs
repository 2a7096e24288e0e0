use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::client::ApiClient;

/// 试卷记录，字段与后端返回一一对应
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct ExamPaper {
    pub id: i64,
    pub year: i32,
    pub province_id: i64,
    pub subject: String,
    pub paper_name: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub total_score: Option<i32>,
    /// 考试时长（分钟）
    #[serde(default)]
    pub exam_time: Option<i32>,
    pub added_by: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub province_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// 新建试卷的提交记录；文件先走上传接口拿到 file_path/file_type
#[derive(Debug, Clone, Serialize)]
pub struct ExamPaperCreate {
    pub year: i32,
    pub province_id: i64,
    pub subject: String,
    pub paper_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_time: Option<i32>,
    pub added_by: String,
    pub is_active: bool,
}

/// 试卷编辑表单
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExamPaperUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 试卷查询条件
#[derive(Debug, Clone, Default)]
pub struct ExamPaperQuery {
    pub year: Option<i32>,
    pub province_id: Option<i64>,
    pub subject: Option<String>,
    pub paper_name: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ExamPaperQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        if let Some(id) = self.province_id {
            params.push(("province_id", id.to_string()));
        }
        if let Some(subject) = self.subject.as_ref().filter(|s| !s.is_empty()) {
            params.push(("subject", subject.clone()));
        }
        if let Some(name) = self.paper_name.as_ref().filter(|s| !s.is_empty()) {
            params.push(("paper_name", name.clone()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// 提取出的试题，字段与后端返回一一对应
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_paper_id: i64,
    pub question_number: String,
    pub question_type: String,
    pub question_content: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub exam_points: Option<String>,
    #[serde(default)]
    pub answer_content: Option<String>,
    #[serde(default)]
    pub answer_explanation: Option<String>,
    pub added_by: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// 试卷详情：试卷字段 + 已提取的试题
#[derive(Debug, Clone, Deserialize)]
pub struct ExamPaperDetail {
    #[serde(flatten)]
    pub paper: ExamPaper,
    #[serde(default)]
    pub questions: Vec<ExamQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct FileUploadResponse {
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub message: String,
}

/// 试题提取结果；extraction_result 是后端原样返回的提取负载
#[derive(Debug, Deserialize)]
pub struct ExtractResponse {
    pub message: String,
    pub questions_count: i64,
    #[serde(default)]
    pub extraction_result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 按条件查询试卷列表
pub async fn list_exam_papers(
    client: &mut ApiClient,
    query: &ExamPaperQuery,
) -> Result<Vec<ExamPaper>> {
    client.get_json("/exam-papers", &query.to_params()).await
}

/// 获取试卷详情（含已提取试题）
pub async fn get_exam_paper(client: &mut ApiClient, id: i64) -> Result<ExamPaperDetail> {
    client.get_json(&format!("/exam-papers/{id}"), &[]).await
}

/// 创建试卷
pub async fn create_exam_paper(
    client: &mut ApiClient,
    create: &ExamPaperCreate,
) -> Result<ExamPaper> {
    let paper: ExamPaper = client.post_json("/exam-papers", create).await?;
    info!("试卷创建成功: id={} {}", paper.id, paper.paper_name);
    Ok(paper)
}

/// 更新试卷
pub async fn update_exam_paper(
    client: &mut ApiClient,
    id: i64,
    update: &ExamPaperUpdate,
) -> Result<ExamPaper> {
    client.put_json(&format!("/exam-papers/{id}"), update).await
}

/// 删除试卷
pub async fn delete_exam_paper(client: &mut ApiClient, id: i64) -> Result<MessageResponse> {
    client.delete_json(&format!("/exam-papers/{id}")).await
}

/// 上传试卷文件，返回服务端保存路径
pub async fn upload_paper_file(client: &mut ApiClient, path: &Path) -> Result<FileUploadResponse> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .with_context(|| format!("文件名无法识别: {}", path.display()))?;

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    info!("开始上传试卷文件: {} ({} bytes)", filename, bytes.len());

    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp: FileUploadResponse = client.post_multipart("/exam-papers/upload", form).await?;
    info!("上传成功: {}", resp.file_path);
    Ok(resp)
}

/// 触发服务端试题提取
pub async fn extract_questions(client: &mut ApiClient, paper_id: i64) -> Result<ExtractResponse> {
    let resp: ExtractResponse = client
        .post_json(
            &format!("/exam-papers/{paper_id}/extract-questions"),
            &serde_json::json!({}),
        )
        .await?;
    info!("试题提取完成: {}", resp.message);
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_query_params() {
        let query = ExamPaperQuery {
            year: Some(2024),
            subject: Some("数学".to_string()),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("year", "2024".to_string()),
                ("subject", "数学".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_paper_detail_flatten() {
        let detail: ExamPaperDetail = serde_json::from_value(serde_json::json!({
            "id": 3,
            "year": 2023,
            "province_id": 1,
            "subject": "数学",
            "paper_name": "2023北京卷",
            "added_by": "admin",
            "questions": [{
                "id": 1,
                "exam_paper_id": 3,
                "question_number": "1",
                "question_type": "选择题",
                "question_content": "求 $x^2=4$ 的解",
                "added_by": "admin"
            }]
        }))
        .unwrap();
        assert_eq!(detail.paper.paper_name, "2023北京卷");
        assert_eq!(detail.questions.len(), 1);
        assert_eq!(detail.questions[0].question_type, "选择题");
    }

    #[test]
    fn test_extract_response_keeps_raw_payload() {
        let resp: ExtractResponse = serde_json::from_value(serde_json::json!({
            "message": "成功提取 2 道试题",
            "questions_count": 2,
            "extraction_result": {"questions": [{}, {}]}
        }))
        .unwrap();
        assert_eq!(resp.questions_count, 2);
        assert!(resp.extraction_result.get("questions").is_some());
    }
}
