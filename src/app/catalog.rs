//! 科目/年级/学期选项
//!
//! 与后端录入约定保持一致，导入校验和命令行参数解析共用。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Chinese,   // 语文
    Math,      // 数学
    English,   // 英语
    Physics,   // 物理
    Chemistry, // 化学
    Biology,   // 生物
    Politics,  // 政治
    History,   // 历史
    Geography, // 地理
}

impl Subject {
    pub const ALL: [Subject; 9] = [
        Subject::Chinese,
        Subject::Math,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::Politics,
        Subject::History,
        Subject::Geography,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Chinese => "语文",
            Subject::Math => "数学",
            Subject::English => "英语",
            Subject::Physics => "物理",
            Subject::Chemistry => "化学",
            Subject::Biology => "生物",
            Subject::Politics => "政治",
            Subject::History => "历史",
            Subject::Geography => "地理",
        }
    }

    /// 从完整名称获取科目
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// 从简写获取科目
    pub fn from_short_name(name: &str) -> Option<Self> {
        match name {
            "语" => Some(Subject::Chinese),
            "数" => Some(Subject::Math),
            "英" => Some(Subject::English),
            "物" => Some(Subject::Physics),
            "化" => Some(Subject::Chemistry),
            "生" => Some(Subject::Biology),
            "政" => Some(Subject::Politics),
            "历" => Some(Subject::History),
            "地" => Some(Subject::Geography),
            _ => None,
        }
    }

    /// 智能查找科目（支持简写）
    pub fn find(name: &str) -> Option<Self> {
        Self::from_name(name).or_else(|| Self::from_short_name(name))
    }
}

/// 年级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Grade {
    /// 高一
    Senior1,
    /// 高二
    Senior2,
    /// 高三
    Senior3,
}

impl Grade {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Grade::Senior1 => "高一",
            Grade::Senior2 => "高二",
            Grade::Senior3 => "高三",
        }
    }

    /// 尝试从字符串解析年级（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "高一" | "高1" | "1" => Some(Grade::Senior1),
            "高二" | "高2" | "2" => Some(Grade::Senior2),
            "高三" | "高3" | "3" => Some(Grade::Senior3),
            _ => None,
        }
    }

    /// 智能查找年级（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(grade) = Self::from_str(s) {
            return Some(grade);
        }

        if s.contains('一') || s.contains('1') {
            return Some(Grade::Senior1);
        }
        if s.contains('二') || s.contains('2') {
            return Some(Grade::Senior2);
        }
        if s.contains('三') || s.contains('3') {
            return Some(Grade::Senior3);
        }

        None
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 学期枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semester {
    /// 上学期
    First,
    /// 下学期
    Second,
}

impl Semester {
    pub fn name(self) -> &'static str {
        match self {
            Semester::First => "上学期",
            Semester::Second => "下学期",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "上学期" | "上" => Some(Semester::First),
            "下学期" | "下" => Some(Semester::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_roundtrip() {
        for subject in Subject::ALL {
            assert_eq!(Subject::from_name(subject.name()), Some(subject));
        }
        assert_eq!(Subject::find("数"), Some(Subject::Math));
        assert_eq!(Subject::find("体育"), None);
    }

    #[test]
    fn test_grade_find() {
        assert_eq!(Grade::from_str("高三"), Some(Grade::Senior3));
        assert_eq!(Grade::find("高2下"), Some(Grade::Senior2));
        assert_eq!(Grade::from_str("初一"), None);
    }

    #[test]
    fn test_semester() {
        assert_eq!(Semester::from_str("上学期"), Some(Semester::First));
        assert_eq!(Semester::from_str("下"), Some(Semester::Second));
        assert_eq!(Semester::from_str("春季"), None);
    }
}
