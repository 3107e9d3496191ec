//! Представление данных ВГХ для отображения и экспорта

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Чертеж, подходящий под запрошенные DN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingImage {
    pub drawing_id: String,
    pub drawing_title: String,
    pub drawing_description: String,
    pub media_url: Option<String>,
    pub display_order: i32,
    pub allowed_dns: Vec<String>,
    pub matching_dns: Vec<String>,
}

/// Матрица значений для одного PN; первая строка - заголовок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionMatrix {
    pub pn: String,
    pub matrix: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionData {
    pub images: Vec<DrawingImage>,
    pub matrices: Vec<DimensionMatrix>,
    pub errors: Vec<String>,
}

/// Данные ВГХ серии с учетом наследования таблицы
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDimensionData {
    pub table_id: Option<String>,
    /// Серия, от которой унаследована таблица
    pub source_series_id: Option<String>,
    pub data: DimensionData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateTableRequest {
    pub new_name: Option<String>,
    pub new_code: Option<String>,
}

/// Параметры запроса данных ВГХ: списки кодов через запятую
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionDataQuery {
    pub dn: Option<String>,
    pub pn: Option<String>,
    #[serde(default)]
    pub export: bool,
}

impl DimensionDataQuery {
    fn split(raw: &Option<String>) -> Option<Vec<String>> {
        raw.as_ref().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    pub fn dn_list(&self) -> Option<Vec<String>> {
        Self::split(&self.dn)
    }

    pub fn pn_list(&self) -> Option<Vec<String>> {
        Self::split(&self.pn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_lists() {
        let query = DimensionDataQuery {
            dn: Some("DN50, DN80,,".into()),
            pn: None,
            export: false,
        };
        assert_eq!(query.dn_list(), Some(vec!["DN50".to_string(), "DN80".to_string()]));
        assert_eq!(query.pn_list(), None);
    }
}
