use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::api::client::ApiClient;
use crate::api::exam_points;
use crate::api::location::{self, Province};
use crate::app::import;
use crate::app::workflow::ImportSummary;

/// 批量导入入口：单个文件或整个目录。
///
/// 单个文件失败只记日志并跳过，不中断整批；校验不通过的行写入
/// failed_rows 清单日志，便于人工补录。
pub async fn run(client: &mut ApiClient, path: &Path, operator: &str) -> Result<ImportSummary> {
    let files = collect_import_files(path)?;
    if files.is_empty() {
        bail!("{} 下没有可导入的 .json/.toml 文件", path.display());
    }

    // 省份表只取一次，整批共用
    let provinces = location::get_provinces(client)
        .await
        .context("获取省份列表失败")?;

    let mut summary = ImportSummary::default();
    for file in files {
        info!("开始导入文件: {}", file.display());

        match import_one_file(client, &file, &provinces, operator).await {
            Ok((imported, failed)) => {
                summary.files += 1;
                summary.imported += imported;
                summary.failed_rows += failed;
            }
            Err(e) => {
                error!("文件 {} 导入失败，跳过。错误: {:?}", file.display(), e);
            }
        }
    }

    info!(
        "========== 导入完成 - 文件: {}, 成功行: {}, 失败行: {} ==========",
        summary.files, summary.imported, summary.failed_rows
    );
    Ok(summary)
}

/// 处理单个导入文件：解析 → 逐行校验 → 批量提交
async fn import_one_file(
    client: &mut ApiClient,
    path: &Path,
    provinces: &[Province],
    operator: &str,
) -> Result<(usize, usize)> {
    let rows = import::parse_import_file(path)?;
    let total = rows.len();
    if total == 0 {
        bail!("文件没有数据行");
    }

    let mut creates = Vec::new();
    let mut failed = 0usize;
    for (idx, row) in rows.into_iter().enumerate() {
        let row_no = idx + 1;
        match row.into_create(row_no, provinces, operator) {
            Ok(create) => creates.push(create),
            Err(e) => {
                failed += 1;
                warn!(
                    target: "failed_rows",
                    "文件 {} 第{}行校验失败: {:#}",
                    path.display(),
                    row_no,
                    e
                );
            }
        }
    }

    if creates.is_empty() {
        bail!("全部 {total} 行均校验失败");
    }

    let resp = exam_points::import_exam_points(client, &creates).await?;
    info!("文件 {} 导入成功: {}", path.display(), resp.message);
    Ok((resp.imported_count as usize, failed))
}

/// 收集待导入文件：目录按文件名排序，保证可重放
fn collect_import_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("路径不存在: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("读取目录失败: {}", path.display()))?
    {
        let entry = entry?;
        let file_path = entry.path();
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if matches!(ext.as_str(), "json" | "toml") {
            files.push(file_path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_from_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), "").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_import_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.toml"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("points.json");
        std::fs::write(&file, "[]").unwrap();

        let files = collect_import_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_path_rejected() {
        assert!(collect_import_files(Path::new("/no/such/dir")).is_err());
    }
}
