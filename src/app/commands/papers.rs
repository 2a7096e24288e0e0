use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::api::auth;
use crate::api::client::ApiClient;
use crate::api::exam_papers::{
    self, ExamPaperCreate, ExamPaperQuery, ExamPaperUpdate, ExamQuestion,
};
use crate::app::commands::opt;

/// 新建试卷的命令行输入；可附带本地试卷文件，先上传再建档
#[derive(Debug, Clone)]
pub struct NewPaper {
    pub year: i32,
    pub province_id: i64,
    pub subject: String,
    pub paper_name: String,
    pub file: Option<std::path::PathBuf>,
    pub total_score: Option<i32>,
    pub exam_time: Option<i32>,
}

pub async fn list(client: &mut ApiClient, query: &ExamPaperQuery) -> Result<()> {
    let papers = exam_papers::list_exam_papers(client, query).await?;
    println!(
        "{:<6} {:<6} {:<8} {:<6} {:<28} {:<8} {:<6}",
        "ID", "年份", "省份", "科目", "试卷名称", "总分", "文件"
    );
    for paper in &papers {
        println!(
            "{:<6} {:<6} {:<8} {:<6} {:<28} {:<8} {:<6}",
            paper.id,
            paper.year,
            opt(&paper.province_name),
            paper.subject,
            paper.paper_name,
            paper
                .total_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if paper.file_path.is_some() { "有" } else { "无" },
        );
    }
    println!("共 {} 份试卷", papers.len());
    Ok(())
}

/// 试卷预览：基本信息 + 已提取的试题
pub async fn show(client: &mut ApiClient, id: i64) -> Result<()> {
    let detail = exam_papers::get_exam_paper(client, id).await?;
    let paper = &detail.paper;

    println!("试卷详情");
    println!("名称:     {}", paper.paper_name);
    println!("年份:     {}", paper.year);
    println!("科目:     {}", paper.subject);
    println!("省份:     {}", opt(&paper.province_name));
    if let Some(score) = paper.total_score {
        println!("总分:     {score}");
    }
    if let Some(minutes) = paper.exam_time {
        println!("时长:     {minutes} 分钟");
    }
    println!("文件:     {}", opt(&paper.file_path));

    if detail.questions.is_empty() {
        println!("尚未提取试题，可执行 papers extract {id}");
    } else {
        println!("已提取 {} 道试题:", detail.questions.len());
        for question in &detail.questions {
            print_question(question);
        }
    }
    Ok(())
}

fn print_question(question: &ExamQuestion) {
    let score = question
        .score
        .map(|s| format!("{s}分"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  [{}] {} ({}, 难度: {})",
        question.question_number,
        question.question_type,
        score,
        opt(&question.difficulty_level),
    );
    println!("      {}", question.question_content);
    if let Some(points) = question
        .exam_points
        .as_ref()
        .filter(|p| !p.trim().is_empty())
    {
        println!("      考点: {points}");
    }
}

pub async fn create(client: &mut ApiClient, input: NewPaper) -> Result<()> {
    let operator = auth::current_user(client).await?;

    // 附带文件时先上传拿到服务端路径
    let (file_path, file_type) = match &input.file {
        Some(file) => {
            let uploaded = exam_papers::upload_paper_file(client, file).await?;
            (Some(uploaded.file_path), Some(uploaded.file_type))
        }
        None => (None, None),
    };

    let create = ExamPaperCreate {
        year: input.year,
        province_id: input.province_id,
        subject: input.subject,
        paper_name: input.paper_name,
        file_path,
        file_type,
        total_score: input.total_score,
        exam_time: input.exam_time,
        added_by: operator.username,
        is_active: true,
    };
    let paper = exam_papers::create_exam_paper(client, &create).await?;
    println!("试卷创建成功: id={}", paper.id);
    Ok(())
}

pub async fn upload(client: &mut ApiClient, file: &Path) -> Result<()> {
    let resp = exam_papers::upload_paper_file(client, file).await?;
    println!("{}", resp.message);
    println!(
        "{} -> {} (类型: {})",
        resp.filename, resp.file_path, resp.file_type
    );
    Ok(())
}

pub async fn update(client: &mut ApiClient, id: i64, update: ExamPaperUpdate) -> Result<()> {
    let paper = exam_papers::update_exam_paper(client, id, &update).await?;
    println!("试卷更新成功: id={}", paper.id);
    Ok(())
}

pub async fn delete(client: &mut ApiClient, id: i64) -> Result<()> {
    let resp = exam_papers::delete_exam_paper(client, id).await?;
    println!("{}", resp.message);
    Ok(())
}

pub async fn extract(client: &mut ApiClient, id: i64) -> Result<()> {
    println!("开始提取试题，视试卷大小可能需要数分钟...");
    let resp = exam_papers::extract_questions(client, id).await?;
    debug!("提取负载: {}", resp.extraction_result);
    println!("{} (共 {} 道)", resp.message, resp.questions_count);
    println!("可执行 papers show {id} 查看试题");
    Ok(())
}
