pub mod pipeline;

/// 批量导入汇总
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// 成功处理的文件数
    pub files: usize,
    /// 成功导入的行数
    pub imported: usize,
    /// 校验失败被跳过的行数
    pub failed_rows: usize,
}
