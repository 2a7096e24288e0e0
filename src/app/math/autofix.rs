use std::sync::LazyLock;

use regex::Regex;

use super::KEYWORDS;

// 每个关键字编译一条 `([^\\])kw` 规则，进程内只编译一次
static FIX_RULES: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|kw| {
            let re = Regex::new(&format!(r"([^\\]){}", kw)).expect("valid regex literal");
            (re, format!("${{1}}\\{}", kw))
        })
        .collect()
});

/// 为漏写反斜杠的公式关键字补上 `\` 前缀。
///
/// 只有前面紧挨着非反斜杠字符的关键字才会被补；已经写成 `\frac` 的
/// 不会重复加。关键字出现在全文第一个字符时没有前置字符可匹配，
/// 维持原样。
///
/// # 参数
/// * `desc` - 考点描述原文
///
/// # 返回
/// 补全后的描述，长度只增不减
pub fn auto_fix_latex(desc: &str) -> String {
    let mut fixed = desc.to_string();
    for (re, rep) in FIX_RULES.iter() {
        fixed = re.replace_all(&fixed, rep.as_str()).into_owned();
    }
    fixed
}
