use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::api::auth;
use crate::api::client::ApiClient;
use crate::api::exam_points::{
    self, ExamPoint, ExamPointCreate, ExamPointQuery, ExamPointUpdate,
};
use crate::api::location::{self, province_name};
use crate::app::commands::opt;
use crate::app::math::{auto_fix_latex, format_description, segments, Segment};
use crate::app::workflow::pipeline;

/// 新建考点的命令行输入；added_by 由当前登录用户补齐
#[derive(Debug, Clone)]
pub struct NewPoint {
    pub province_id: i64,
    pub subject: String,
    pub grade: String,
    pub semester: String,
    pub level1_point: String,
    pub level2_point: Option<String>,
    pub level3_point: Option<String>,
    pub description: String,
    pub coverage_rate: f64,
}

pub async fn list(client: &mut ApiClient, query: &ExamPointQuery) -> Result<()> {
    let points = exam_points::list_exam_points(client, query).await?;
    println!(
        "{:<6} {:<8} {:<6} {:<6} {:<8} {:<16} {:<8} {:<6}",
        "ID", "省份", "科目", "年级", "学期", "一级考点", "覆盖率", "状态"
    );
    for point in &points {
        println!(
            "{:<6} {:<8} {:<6} {:<6} {:<8} {:<16} {:<8.1} {:<6}",
            point.id,
            opt(&point.province_name),
            point.subject,
            point.grade,
            point.semester,
            point.level1_point,
            point.coverage_rate,
            if point.is_active { "有效" } else { "停用" },
        );
    }
    println!("共 {} 条考点", points.len());
    Ok(())
}

pub async fn show(client: &mut ApiClient, id: i64) -> Result<()> {
    let point = exam_points::get_exam_point(client, id).await?;
    let provinces = location::get_provinces(client).await.unwrap_or_default();

    let province = point
        .province_name
        .clone()
        .unwrap_or_else(|| province_name(&provinces, point.province_id).to_string());

    println!("考点详情");
    println!("省份:     {province}");
    println!("科目:     {}", point.subject);
    println!("年级:     {}", point.grade);
    println!("学期:     {}", point.semester);
    println!("一级考点: {}", point.level1_point);
    println!("二级考点: {}", opt(&point.level2_point));
    println!("三级考点: {}", opt(&point.level3_point));
    println!("覆盖率:   {}", point.coverage_rate);
    println!("添加人:   {}", point.added_by);
    println!("描述:");
    render_description(&point.description);
    Ok(())
}

/// 描述的终端渲染：补斜杠后按片段输出，块级公式独占一行并缩进标记
fn render_description(desc: &str) {
    let fixed = auto_fix_latex(desc);
    for segment in segments(&fixed) {
        match segment {
            Segment::Text(text) => print!("{text}"),
            Segment::InlineMath(math) => print!("${math}$"),
            Segment::BlockMath(math) => {
                println!();
                println!("    {math}");
            }
            Segment::LineBreak => println!(),
        }
    }
    println!();
}

pub async fn create(client: &mut ApiClient, input: NewPoint) -> Result<()> {
    let operator = auth::current_user(client).await?;
    let create = ExamPointCreate {
        province_id: input.province_id,
        subject: input.subject,
        grade: input.grade,
        semester: input.semester,
        level1_point: input.level1_point,
        level2_point: input.level2_point,
        level3_point: input.level3_point,
        description: format_description(&input.description),
        coverage_rate: input.coverage_rate,
        added_by: operator.username,
        is_active: true,
    };
    let point = exam_points::create_exam_point(client, &create).await?;
    println!("考点添加成功: id={}", point.id);
    Ok(())
}

pub async fn update(client: &mut ApiClient, id: i64, mut update: ExamPointUpdate) -> Result<()> {
    // 编辑的描述同样先整形再提交
    update.description = update.description.map(|d| format_description(&d));
    let point = exam_points::update_exam_point(client, id, &update).await?;
    println!("考点更新成功: id={}", point.id);
    Ok(())
}

pub async fn delete(client: &mut ApiClient, id: i64) -> Result<()> {
    let resp = exam_points::delete_exam_point(client, id).await?;
    println!("{}", resp.message);
    Ok(())
}

pub async fn import(client: &mut ApiClient, path: &Path) -> Result<()> {
    let operator = auth::current_user(client).await?;
    let summary = pipeline::run(client, path, &operator.username).await?;
    println!(
        "导入完成: 文件 {} 个，成功 {} 行，失败 {} 行",
        summary.files, summary.imported, summary.failed_rows
    );
    if summary.failed_rows > 0 {
        println!("失败行明细见日志 failed_rows 清单");
    }
    Ok(())
}

pub async fn export(client: &mut ApiClient, query: &ExamPointQuery, out: &Path) -> Result<()> {
    let points = exam_points::list_exam_points(client, query).await?;
    let provinces = location::get_provinces(client).await.unwrap_or_default();

    let rows: Vec<_> = points
        .iter()
        .map(|point| export_row(point, &provinces))
        .collect();

    let content = serde_json::to_string_pretty(&rows).context("序列化导出数据失败")?;
    std::fs::write(out, content)
        .with_context(|| format!("写入导出文件失败: {}", out.display()))?;
    println!("已导出 {} 条考点到 {}", points.len(), out.display());
    Ok(())
}

/// 导出行：列名与导入模板一致，省份转回名称
fn export_row(point: &ExamPoint, provinces: &[location::Province]) -> serde_json::Value {
    let province = point
        .province_name
        .clone()
        .unwrap_or_else(|| province_name(provinces, point.province_id).to_string());
    json!({
        "province": province,
        "subject": point.subject,
        "grade": point.grade,
        "semester": point.semester,
        "level1_point": point.level1_point,
        "level2_point": point.level2_point.clone().unwrap_or_default(),
        "level3_point": point.level3_point.clone().unwrap_or_default(),
        "description": point.description,
        "coverage_rate": point.coverage_rate,
        "added_by": point.added_by,
        "added_date": point.added_date.clone().unwrap_or_default(),
        "is_active": if point.is_active { "是" } else { "否" },
    })
}

/// 生成导入模板文件（示例数据一行）
pub fn template(out: &Path) -> Result<()> {
    let sample = json!([{
        "province": "北京",
        "subject": "数学",
        "grade": "高三",
        "semester": "上学期",
        "level1_point": "函数",
        "level2_point": "基本初等函数",
        "level3_point": "指数函数",
        "description": "指数函数的基本性质和应用",
        "coverage_rate": 85.5,
        "added_by": "admin",
        "is_active": "是",
    }]);
    let content = serde_json::to_string_pretty(&sample).expect("static template serializes");
    std::fs::write(out, content)
        .with_context(|| format!("写入模板文件失败: {}", out.display()))?;
    println!("导入模板已生成: {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_roundtrips_through_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.json");
        template(&path).unwrap();

        let rows = crate::app::import::parse_import_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].province, "北京");
        assert_eq!(rows[0].coverage_rate, Some(85.5));
    }

    #[test]
    fn test_export_row_columns_match_template() {
        let point = ExamPoint {
            id: 1,
            province_id: 1,
            subject: "数学".to_string(),
            grade: "高三".to_string(),
            semester: "上学期".to_string(),
            level1_point: "函数".to_string(),
            level2_point: None,
            level3_point: None,
            description: "$x^2$".to_string(),
            coverage_rate: 80.0,
            added_by: "admin".to_string(),
            is_active: true,
            province_name: Some("北京".to_string()),
            added_date: None,
            created_at: None,
            updated_at: None,
        };
        let row = export_row(&point, &[]);
        assert_eq!(row["province"], "北京");
        assert_eq!(row["is_active"], "是");
        assert_eq!(row["level2_point"], "");
    }
}
