use std::sync::LazyLock;

use regex::Regex;

use super::auto_fix_latex;

// 换行既可能是 \n，也可能是富文本残留的 <br> 标记
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|<br\s*/?>").expect("valid regex literal"));

// 已转义的关键字，外加上下标记号
static MATH_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\frac|\\sqrt|\\leq|\\geq|\\sum|\\int|\\log|\\sin|\\cos|\\tan|\\cdot|\\times|\\div|\\left|\\right|\^|_",
    )
    .expect("valid regex literal")
});

/// 录入/导入时的描述整形：补斜杠后，把含公式记号的整行包进 `$...$`。
///
/// 已经以 `$` 开头的行不会重复包裹，不含公式记号的行原样通过；
/// `<br>` 换行标记统一成 `\n`，行数不变。
///
/// # 参数
/// * `desc` - 表单或导入文件里的描述原文
///
/// # 返回
/// 可直接提交给后端的描述
pub fn format_description(desc: &str) -> String {
    let fixed = auto_fix_latex(desc);
    LINE_BREAK_RE
        .split(&fixed)
        .map(|line| {
            if MATH_TOKEN_RE.is_match(line) && !line.trim_start().starts_with('$') {
                format!("${}$", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_passes_through() {
        // 无关键字、无上下标，原样通过
        assert_eq!(format_description("v=at"), "v=at");
    }

    #[test]
    fn test_wraps_math_line() {
        assert_eq!(format_description("x^2+1"), "$x^2+1$");
    }

    #[test]
    fn test_fixes_then_wraps() {
        assert_eq!(format_description("面积 frac{1}{2}ab"), "$面积 \\frac{1}{2}ab$");
    }

    #[test]
    fn test_already_wrapped_line_untouched() {
        assert_eq!(format_description("$x^2$"), "$x^2$");
        // 行首空白后接 $ 同样视为已包裹
        assert_eq!(format_description("  $x^2$"), "  $x^2$");
    }

    #[test]
    fn test_idempotent() {
        let once = format_description("x_1 + x_2");
        assert_eq!(format_description(&once), once);
    }

    #[test]
    fn test_line_count_preserved() {
        let out = format_description("第一行\nx^2\n第三行");
        assert_eq!(out.lines().count(), 3);
        assert_eq!(out, "第一行\n$x^2$\n第三行");
    }

    #[test]
    fn test_br_markers_normalized() {
        assert_eq!(
            format_description("文字<br/>y^2<br >尾行"),
            "文字\n$y^2$\n尾行"
        );
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(format_description(""), "");
    }
}
