//! 考点导入文件解析与校验
//!
//! 表格解析交给外部工具，这里只处理已经整理成 JSON/TOML 的行数据：
//! 必填列校验、省份名转 ID、有效状态解析，再把描述统一整形后拼成
//! 可提交的考点记录。

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::api::exam_points::ExamPointCreate;
use crate::api::location::{province_id_by_name, Province};
use crate::app::catalog::{Grade, Semester, Subject};
use crate::app::math::format_description;

/// 导入文件的一行，列名与导入模板一致
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub level1_point: String,
    #[serde(default)]
    pub level2_point: Option<String>,
    #[serde(default)]
    pub level3_point: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coverage_rate: Option<f64>,
    #[serde(default)]
    pub added_by: Option<String>,
    #[serde(default)]
    pub is_active: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ImportFile {
    exam_points: Vec<ImportRow>,
}

/// 解析导入文件（.json 数组、带 exam_points 键的 .json、或 .toml）
pub fn parse_import_file(path: &Path) -> Result<Vec<ImportRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取导入文件失败: {}", path.display()))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => {
            if let Ok(rows) = serde_json::from_str::<Vec<ImportRow>>(&content) {
                return Ok(rows);
            }
            let file: ImportFile =
                serde_json::from_str(&content).context("JSON 格式错误或列名不符合模板")?;
            Ok(file.exam_points)
        }
        "toml" => {
            let file: ImportFile =
                toml::from_str(&content).context("TOML 格式错误或列名不符合模板")?;
            Ok(file.exam_points)
        }
        other => bail!("不支持的导入文件类型: .{other}"),
    }
}

/// 解析有效状态列：是/否、true/false、0/1 都接受
pub fn parse_active_flag(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_i64().map(|i| i != 0),
        serde_json::Value::String(s) => match s.trim() {
            "是" | "true" | "1" => Some(true),
            "否" | "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl ImportRow {
    /// 校验并转换成提交记录。
    ///
    /// # 参数
    /// * `row_no` - 行号（从 1 开始，报错用）
    /// * `provinces` - 省份表，用于把省份名解析成 ID
    /// * `operator` - 当前登录用户名，added_by 列缺省时填入
    pub fn into_create(
        self,
        row_no: usize,
        provinces: &[Province],
        operator: &str,
    ) -> Result<ExamPointCreate> {
        let required = [
            ("province", self.province.trim().is_empty()),
            ("subject", self.subject.trim().is_empty()),
            ("grade", self.grade.trim().is_empty()),
            ("semester", self.semester.trim().is_empty()),
            ("level1_point", self.level1_point.trim().is_empty()),
            ("description", self.description.trim().is_empty()),
            ("coverage_rate", self.coverage_rate.is_none()),
            ("is_active", self.is_active.is_none()),
        ];
        for (field, missing) in required {
            if missing {
                bail!("第{row_no}行缺少必需字段: {field}");
            }
        }

        let province_id = province_id_by_name(provinces, self.province.trim())
            .with_context(|| format!("第{row_no}行省份无法识别: {}", self.province))?;

        let is_active = self
            .is_active
            .as_ref()
            .and_then(parse_active_flag)
            .with_context(|| format!("第{row_no}行有效状态无法识别"))?;

        // 科目/年级/学期超出选项表的只提示不拦截，后端有老数据
        if Subject::find(&self.subject).is_none() {
            warn!("第{}行科目不在选项表内: {}", row_no, self.subject);
        }
        if Grade::find(&self.grade).is_none() {
            warn!("第{}行年级不在选项表内: {}", row_no, self.grade);
        }
        if Semester::from_str(&self.semester).is_none() {
            warn!("第{}行学期不在选项表内: {}", row_no, self.semester);
        }

        Ok(ExamPointCreate {
            province_id,
            subject: self.subject,
            grade: self.grade,
            semester: self.semester,
            level1_point: self.level1_point,
            level2_point: self.level2_point.filter(|s| !s.trim().is_empty()),
            level3_point: self.level3_point.filter(|s| !s.trim().is_empty()),
            description: format_description(&self.description),
            coverage_rate: self.coverage_rate.unwrap_or_default(),
            added_by: self
                .added_by
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| operator.to_string()),
            is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn provinces() -> Vec<Province> {
        vec![Province {
            id: 1,
            name: "北京".to_string(),
            code: "BJ".to_string(),
            created_at: None,
            updated_at: None,
        }]
    }

    fn sample_row() -> ImportRow {
        ImportRow {
            province: "北京".to_string(),
            subject: "数学".to_string(),
            grade: "高三".to_string(),
            semester: "上学期".to_string(),
            level1_point: "函数".to_string(),
            level2_point: Some("基本初等函数".to_string()),
            level3_point: Some("指数函数".to_string()),
            description: "指数函数 x^2 的性质".to_string(),
            coverage_rate: Some(85.5),
            added_by: None,
            is_active: Some(serde_json::json!("是")),
        }
    }

    #[test]
    fn test_row_converts_and_formats_description() {
        let create = sample_row().into_create(1, &provinces(), "admin").unwrap();
        assert_eq!(create.province_id, 1);
        assert_eq!(create.added_by, "admin");
        assert!(create.is_active);
        // 描述带上下标记号，整行被包进 $...$
        assert_eq!(create.description, "$指数函数 x^2 的性质$");
    }

    #[test]
    fn test_missing_required_field() {
        let mut row = sample_row();
        row.description = String::new();
        let err = row.into_create(3, &provinces(), "admin").unwrap_err();
        assert_eq!(err.to_string(), "第3行缺少必需字段: description");
    }

    #[test]
    fn test_unknown_province() {
        let mut row = sample_row();
        row.province = "东京".to_string();
        assert!(row.into_create(1, &provinces(), "admin").is_err());
    }

    #[test]
    fn test_active_flag_parsing() {
        assert_eq!(parse_active_flag(&serde_json::json!("是")), Some(true));
        assert_eq!(parse_active_flag(&serde_json::json!("否")), Some(false));
        assert_eq!(parse_active_flag(&serde_json::json!(true)), Some(true));
        assert_eq!(parse_active_flag(&serde_json::json!(0)), Some(false));
        assert_eq!(parse_active_flag(&serde_json::json!("也许")), None);
    }

    #[test]
    fn test_parse_json_bare_array() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"province":"北京","subject":"数学","grade":"高三","semester":"上学期","level1_point":"函数","description":"x^2","coverage_rate":80,"is_active":"是"}}]"#
        )
        .unwrap();
        let rows = parse_import_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "数学");
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "[[exam_points]]\nprovince = \"北京\"\nsubject = \"数学\"\ngrade = \"高三\"\nsemester = \"上学期\"\nlevel1_point = \"函数\"\ndescription = \"x^2\"\ncoverage_rate = 80.0\nis_active = true\n"
        )
        .unwrap();
        let rows = parse_import_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].coverage_rate, Some(80.0));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(file, "not a spreadsheet").unwrap();
        assert!(parse_import_file(file.path()).is_err());
    }
}
