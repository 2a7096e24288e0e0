use std::sync::LazyLock;

use regex::Regex;

// 块级与行内定界符都不允许内部再出现 `$`，配不上的定界符按普通文本处理
static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$[^$]+\$\$").expect("valid regex literal"));
static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[^$]+\$").expect("valid regex literal"));

/// 渲染片段，按原文顺序产出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// 普通文本
    Text(&'a str),
    /// 行内公式，`$` 定界符已剥掉
    InlineMath(&'a str),
    /// 块级公式，`$$` 定界符已剥掉；整行公式自动识别也归这里
    BlockMath(&'a str),
    /// 换行
    LineBreak,
}

/// 把（通常已经过 [`auto_fix_latex`](super::auto_fix_latex) 的）描述切成渲染片段。
///
/// 两遍切分：先按 `$$...$$` 提出块级公式，剩余部分逐行处理——
/// 整行只含公式字符且带有公式特征的行提升为块级公式，其余行再按
/// `$...$` 切出行内公式。迭代器惰性求值，可随时重新调用本函数重跑。
pub fn segments(desc: &str) -> Segments<'_> {
    Segments {
        blocks: BlockSplit { text: desc, pos: 0 },
        lines: None,
        inline: None,
        queued: None,
        first_line: false,
    }
}

#[derive(Clone)]
pub struct Segments<'a> {
    blocks: BlockSplit<'a>,
    lines: Option<std::str::Split<'a, char>>,
    inline: Option<InlineSplit<'a>>,
    /// 换行片段先行时暂存的后续片段
    queued: Option<Segment<'a>>,
    first_line: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        loop {
            if let Some(seg) = self.queued.take() {
                return Some(seg);
            }

            if let Some(inline) = self.inline.as_mut() {
                if let Some(seg) = inline.next() {
                    return Some(seg);
                }
                self.inline = None;
            }

            if let Some(lines) = self.lines.as_mut() {
                let Some(line) = lines.next() else {
                    self.lines = None;
                    continue;
                };
                let need_break = !std::mem::take(&mut self.first_line);
                let next_seg = if let Some(math) = implicit_block(line) {
                    Some(Segment::BlockMath(math))
                } else if line.is_empty() {
                    None
                } else {
                    self.inline = Some(InlineSplit { line, pos: 0 });
                    None
                };
                if need_break {
                    self.queued = next_seg;
                    return Some(Segment::LineBreak);
                }
                if let Some(seg) = next_seg {
                    return Some(seg);
                }
                continue;
            }

            match self.blocks.next()? {
                Piece::Block(math) => return Some(Segment::BlockMath(math)),
                Piece::Chunk(chunk) => {
                    self.lines = Some(chunk.split('\n'));
                    self.first_line = true;
                }
            }
        }
    }
}

#[derive(Clone)]
enum Piece<'a> {
    Block(&'a str),
    Chunk(&'a str),
}

/// 第一遍：按 `$$...$$` 切分
#[derive(Clone)]
struct BlockSplit<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for BlockSplit<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        match BLOCK_RE.find(rest) {
            Some(m) if m.start() == 0 => {
                self.pos += m.end();
                Some(Piece::Block(&rest[2..m.end() - 2]))
            }
            Some(m) => {
                self.pos += m.start();
                Some(Piece::Chunk(&rest[..m.start()]))
            }
            None => {
                self.pos = self.text.len();
                Some(Piece::Chunk(rest))
            }
        }
    }
}

/// 第二遍：行内按 `$...$` 切分
#[derive(Clone)]
struct InlineSplit<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Iterator for InlineSplit<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.pos >= self.line.len() {
            return None;
        }
        let rest = &self.line[self.pos..];
        match INLINE_RE.find(rest) {
            Some(m) if m.start() == 0 => {
                self.pos += m.end();
                Some(Segment::InlineMath(&rest[1..m.end() - 1]))
            }
            Some(m) => {
                self.pos += m.start();
                Some(Segment::Text(&rest[..m.start()]))
            }
            None => {
                self.pos = self.line.len();
                Some(Segment::Text(rest))
            }
        }
    }
}

/// 整行公式自动识别。
///
/// 去掉首尾空白后整行只含 ASCII 公式字符（中文等直接落选），并且至少
/// 带一个公式特征字符才提升为块级公式；纯英文说明行（如 "OK see page
/// 12"）不会被误判。
fn implicit_block(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.chars().all(is_math_char) {
        return None;
    }
    if !trimmed.chars().any(is_math_signal) {
        return None;
    }
    Some(trimmed)
}

fn is_math_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_^-+*/()[]{}=<>|,.:; \\".contains(c)
}

fn is_math_signal(c: char) -> bool {
    matches!(
        c,
        '\\' | '^' | '_' | '=' | '+' | '*' | '/' | '<' | '>' | '|'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(desc: &str) -> Vec<Segment<'_>> {
        segments(desc).collect()
    }

    /// 片段正文拼回去应当等于原文去掉定界符
    fn reconstruct(desc: &str) -> String {
        segments(desc)
            .map(|seg| match seg {
                Segment::Text(t) | Segment::InlineMath(t) | Segment::BlockMath(t) => t,
                Segment::LineBreak => "\n",
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn test_plain_text_single_segment() {
        assert_eq!(collect("这是普通描述"), vec![Segment::Text("这是普通描述")]);
    }

    #[test]
    fn test_inline_math_mixed_line() {
        assert_eq!(
            collect("说明：$x^2+y^2=1$ 是圆的方程"),
            vec![
                Segment::Text("说明："),
                Segment::InlineMath("x^2+y^2=1"),
                Segment::Text(" 是圆的方程"),
            ]
        );
    }

    #[test]
    fn test_block_math_delimited() {
        assert_eq!(
            collect("前文$$\\frac{1}{2}$$后文"),
            vec![
                Segment::Text("前文"),
                Segment::BlockMath("\\frac{1}{2}"),
                Segment::Text("后文"),
            ]
        );
    }

    #[test]
    fn test_implicit_block_line() {
        assert_eq!(collect("E=mc^2"), vec![Segment::BlockMath("E=mc^2")]);
    }

    #[test]
    fn test_ascii_prose_stays_text() {
        // 全是公式字符集里的字符，但没有公式特征，不能升格
        assert_eq!(
            collect("OK see page 12"),
            vec![Segment::Text("OK see page 12")]
        );
    }

    #[test]
    fn test_line_breaks_preserved() {
        assert_eq!(
            collect("第一行\n第二行"),
            vec![
                Segment::Text("第一行"),
                Segment::LineBreak,
                Segment::Text("第二行"),
            ]
        );
    }

    #[test]
    fn test_empty_line_becomes_single_break() {
        assert_eq!(
            collect("a\n\nb"),
            vec![
                Segment::Text("a"),
                Segment::LineBreak,
                Segment::LineBreak,
                Segment::Text("b"),
            ]
        );
    }

    #[test]
    fn test_unbalanced_delimiters_degrade_to_text() {
        assert_eq!(collect("$x"), vec![Segment::Text("$x")]);
        assert_eq!(collect("a$$b"), vec![Segment::Text("a$$b")]);
    }

    #[test]
    fn test_mixed_document() {
        assert_eq!(
            collect("定义：$f(x)$\n$$\\int f$$"),
            vec![
                Segment::Text("定义："),
                Segment::InlineMath("f(x)"),
                Segment::LineBreak,
                Segment::BlockMath("\\int f"),
            ]
        );
    }

    #[test]
    fn test_reconstruction_modulo_delimiters() {
        let cases = [
            "说明：$x^2+y^2=1$ 是圆的方程",
            "a\nb\nc",
            "前$$x+y$$后",
            "纯文本，无公式。",
        ];
        for case in cases {
            let expected: String = case.chars().filter(|&c| c != '$').collect();
            assert_eq!(reconstruct(case), expected, "case: {case}");
        }
    }

    #[test]
    fn test_restartable() {
        let desc = "说明：$x$";
        let first: Vec<_> = segments(desc).collect();
        let second: Vec<_> = segments(desc).collect();
        assert_eq!(first, second);
    }
}
