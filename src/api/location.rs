use anyhow::Result;
use serde::Deserialize;

use crate::api::client::ApiClient;

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Province {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub province_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// 获取所有省份
pub async fn get_provinces(client: &mut ApiClient) -> Result<Vec<Province>> {
    client.get_json("/provinces", &[]).await
}

/// 根据省份 ID 获取城市列表
pub async fn get_cities_by_province(client: &mut ApiClient, province_id: i64) -> Result<Vec<City>> {
    client
        .get_json(&format!("/provinces/{province_id}/cities"), &[])
        .await
}

/// 按 ID 找省份名，找不到给空串（与前端展示逻辑一致）
pub fn province_name(provinces: &[Province], id: i64) -> &str {
    provinces
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
        .unwrap_or("")
}

/// 按名称找省份 ID（导入时把省份名解析成 ID）
pub fn province_id_by_name(provinces: &[Province], name: &str) -> Option<i64> {
    provinces.iter().find(|p| p.name == name).map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Province> {
        vec![
            Province {
                id: 1,
                name: "北京".to_string(),
                code: "BJ".to_string(),
                created_at: None,
                updated_at: None,
            },
            Province {
                id: 2,
                name: "上海".to_string(),
                code: "SH".to_string(),
                created_at: None,
                updated_at: None,
            },
        ]
    }

    #[test]
    fn test_province_lookup() {
        let provinces = sample();
        assert_eq!(province_name(&provinces, 2), "上海");
        assert_eq!(province_name(&provinces, 99), "");
        assert_eq!(province_id_by_name(&provinces, "北京"), Some(1));
        assert_eq!(province_id_by_name(&provinces, "东京"), None);
    }
}
