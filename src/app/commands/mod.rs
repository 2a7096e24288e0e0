pub mod auth;
pub mod location;
pub mod papers;
pub mod points;
pub mod users;

/// 布尔列的展示值
pub(crate) fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "是",
        Some(false) => "否",
        None => "-",
    }
}

/// 可选文本列的展示值
pub(crate) fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
