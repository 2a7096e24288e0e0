//! 描述文本的公式处理
//!
//! 考点描述是人工录入的自由文本，公式宏经常漏写反斜杠，或者混用
//! `$...$` 行内与 `$$...$$` 块级定界符。这里统一做三件事：
//! 补斜杠（autofix）、切分渲染片段（render）、录入时整行包裹（format）。

mod autofix;
mod format;
mod render;

pub use autofix::auto_fix_latex;
pub use format::format_description;
pub use render::{segments, Segment};

/// 识别的公式关键字，按替换优先级排列。
///
/// 顺序即替换顺序。表内若出现共享前缀的关键字，先替换的会影响后替换的
/// 匹配范围，调整顺序前需逐对确认（见 DESIGN.md）。
pub(crate) const KEYWORDS: [&str; 15] = [
    "frac", "sqrt", "leq", "geq", "sum", "int", "log", "sin", "cos", "tan", "cdot", "times",
    "div", "left", "right",
];
