//! Сборка матриц ВГХ и подбор чертежей по DN

use contracts::domain::a001_catalog_option::{CatalogOption, CatalogOptionId};
use contracts::domain::a005_dimension_table::{
    DimensionCell, DimensionData, DimensionMatrix, DimensionParameter, DimensionParameterId,
    DrawingImage, TableDrawing,
};
use contracts::domain::common::AggregateId;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Исходные данные одной таблицы
pub struct DimensionSource<'a> {
    pub parameters: &'a [DimensionParameter],
    pub cells: &'a [DimensionCell],
    pub drawings: &'a [TableDrawing],
    /// Весь справочник DN: для подписей допустимых DN чертежей
    pub dn_catalog: &'a [CatalogOption],
}

/// Ключ оси: код в режиме экспорта, иначе название
fn axis_key(option: &CatalogOption, export: bool) -> String {
    if export || option.base.description.trim().is_empty() {
        option.base.code.clone()
    } else {
        option.base.description.clone()
    }
}

/// Сортировка осей по порядку справочника
pub fn sort_axis(options: &mut [CatalogOption]) {
    options.sort_by(|a, b| {
        a.sorting_order
            .cmp(&b.sorting_order)
            .then_with(|| a.base.code.cmp(&b.base.code))
    });
}

/// DN и PN, встречающиеся в значениях таблицы
pub fn axes_in_cells(cells: &[DimensionCell]) -> (Vec<CatalogOptionId>, Vec<CatalogOptionId>) {
    let dns: BTreeSet<CatalogOptionId> = cells.iter().map(|c| c.dn_id).collect();
    let pns: BTreeSet<CatalogOptionId> = cells.iter().map(|c| c.pn_id).collect();
    (dns.into_iter().collect(), pns.into_iter().collect())
}

/// Матрицы по PN; PN без данных пропускаются, колонки DN без значений отбрасываются
pub fn build_matrices(
    parameters: &[DimensionParameter],
    cells: &[DimensionCell],
    dns: &[CatalogOption],
    pns: &[CatalogOption],
    export: bool,
) -> Vec<DimensionMatrix> {
    let mut sorted_params: Vec<&DimensionParameter> = parameters.iter().collect();
    sorted_params.sort_by_key(|p| p.sorting_order);

    let mut matrices = Vec::new();
    for pn in pns {
        let pn_key = axis_key(pn, export);

        let mut values: HashMap<(DimensionParameterId, CatalogOptionId), Value> = HashMap::new();
        for cell in cells.iter().filter(|c| c.pn_id == pn.base.id) {
            values.insert((cell.parameter_id, cell.dn_id), cell.display_value());
        }
        if values.is_empty() {
            continue;
        }

        let rows: Vec<&DimensionParameter> = sorted_params
            .iter()
            .copied()
            .filter(|p| values.keys().any(|(param_id, _)| *param_id == p.id))
            .collect();
        let columns: Vec<&CatalogOption> = dns
            .iter()
            .filter(|dn| rows.iter().any(|p| values.contains_key(&(p.id, dn.base.id))))
            .collect();

        let mut header: Vec<Value> = if export {
            vec![
                "legend".into(),
                "parame_name".into(),
                "parameter_variety_code".into(),
                pn_key.clone().into(),
            ]
        } else {
            vec!["legend".into(), "parameter_variety_name".into()]
        };
        header.extend(columns.iter().map(|dn| Value::from(axis_key(dn, export))));

        let mut matrix = vec![header];
        for param in rows {
            let mut row: Vec<Value> = if export {
                vec![
                    param.legend.clone().into(),
                    param.name.clone().into(),
                    param.parameter_code.clone().unwrap_or_default().into(),
                    pn_key.clone().into(),
                ]
            } else {
                vec![param.legend.clone().into(), param.name.clone().into()]
            };
            row.extend(columns.iter().map(|dn| {
                values
                    .get(&(param.id, dn.base.id))
                    .cloned()
                    .unwrap_or(Value::Null)
            }));
            matrix.push(row);
        }

        matrices.push(DimensionMatrix {
            pn: pn_key,
            matrix,
        });
    }
    matrices
}

/// Чертежи, допустимые DN которых пересекаются с запрошенными
pub fn drawing_images(
    drawings: &[TableDrawing],
    dns: &[CatalogOption],
    dn_catalog: &[CatalogOption],
    export: bool,
) -> Vec<DrawingImage> {
    let label = |code: &str| -> String {
        dn_catalog
            .iter()
            .find(|dn| dn.base.code.eq_ignore_ascii_case(code))
            .map(|dn| axis_key(dn, export))
            .unwrap_or_else(|| code.to_string())
    };

    let mut ordered: Vec<&TableDrawing> = drawings.iter().collect();
    ordered.sort_by_key(|d| d.display_order);

    ordered
        .into_iter()
        .filter_map(|drawing| {
            let allowed: HashSet<String> =
                drawing.allowed_dn.iter().map(|c| c.to_lowercase()).collect();
            let matching: Vec<String> = dns
                .iter()
                .filter(|dn| allowed.contains(&dn.base.code.to_lowercase()))
                .map(|dn| axis_key(dn, export))
                .collect();
            if matching.is_empty() {
                return None;
            }
            Some(DrawingImage {
                drawing_id: drawing.id.as_string(),
                drawing_title: drawing.title.clone(),
                drawing_description: drawing.description.clone(),
                media_url: drawing.media_url.clone(),
                display_order: drawing.display_order,
                allowed_dns: drawing.allowed_dn.iter().map(|c| label(c)).collect(),
                matching_dns: matching,
            })
        })
        .collect()
}

/// Данные ВГХ для выбранных DN/PN
///
/// Пустой список DN или PN не ограничивает выборку значений.
pub fn build_dimension_data(
    source: &DimensionSource<'_>,
    mut dns: Vec<CatalogOption>,
    mut pns: Vec<CatalogOption>,
    errors: Vec<String>,
    export: bool,
) -> DimensionData {
    sort_axis(&mut dns);
    sort_axis(&mut pns);

    let dn_ids: HashSet<CatalogOptionId> = dns.iter().map(|d| d.base.id).collect();
    let pn_ids: HashSet<CatalogOptionId> = pns.iter().map(|p| p.base.id).collect();
    let selected: Vec<DimensionCell> = source
        .cells
        .iter()
        .filter(|c| dn_ids.is_empty() || dn_ids.contains(&c.dn_id))
        .filter(|c| pn_ids.is_empty() || pn_ids.contains(&c.pn_id))
        .cloned()
        .collect();

    if selected.is_empty() {
        tracing::warn!("Нет значений ВГХ для указанных параметров");
        return DimensionData {
            errors,
            ..Default::default()
        };
    }

    DimensionData {
        images: drawing_images(source.drawings, &dns, source.dn_catalog, export),
        matrices: build_matrices(source.parameters, &selected, &dns, &pns, export),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_catalog_option::OptionKind;
    use contracts::domain::a005_dimension_table::{
        DimensionCellId, DimensionTableId, TableDrawingId,
    };
    use contracts::domain::common::EntityMetadata;
    use serde_json::json;

    fn option(kind: OptionKind, code: &str, name: &str, order: i32) -> CatalogOption {
        let mut option = CatalogOption::new_for_insert(kind, code.into(), name.into());
        option.sorting_order = order;
        option
    }

    fn parameter(table_id: DimensionTableId, name: &str, legend: &str, order: i32) -> DimensionParameter {
        DimensionParameter {
            id: DimensionParameterId::new_v4(),
            table_id,
            name: name.into(),
            legend: legend.into(),
            parameter_code: Some(format!("{}_code", legend)),
            sorting_order: order,
            metadata: EntityMetadata::new(),
        }
    }

    fn cell(param: &DimensionParameter, dn: &CatalogOption, pn: &CatalogOption, value: f64) -> DimensionCell {
        DimensionCell {
            id: DimensionCellId::new_v4(),
            parameter_id: param.id,
            dn_id: dn.base.id,
            pn_id: pn.base.id,
            value: Some(value),
            text_value: None,
        }
    }

    fn drawing(table_id: DimensionTableId, title: &str, order: i32, allowed: &[&str]) -> TableDrawing {
        TableDrawing {
            id: TableDrawingId::new_v4(),
            table_id,
            title: title.into(),
            description: String::new(),
            media_url: None,
            display_order: order,
            allowed_dn: allowed.iter().map(|s| s.to_string()).collect(),
            metadata: EntityMetadata::new(),
        }
    }

    struct Fixture {
        dn50: CatalogOption,
        dn80: CatalogOption,
        dn100: CatalogOption,
        pn16: CatalogOption,
        pn40: CatalogOption,
        params: Vec<DimensionParameter>,
        cells: Vec<DimensionCell>,
        drawings: Vec<TableDrawing>,
    }

    fn fixture() -> Fixture {
        let table_id = DimensionTableId::new_v4();
        let dn50 = option(OptionKind::Dn, "DN50", "Ду 50", 1);
        let dn80 = option(OptionKind::Dn, "DN80", "Ду 80", 2);
        let dn100 = option(OptionKind::Dn, "DN100", "Ду 100", 3);
        let pn16 = option(OptionKind::Pn, "PN16", "Ру 16", 1);
        let pn40 = option(OptionKind::Pn, "PN40", "Ру 40", 2);

        let height = parameter(table_id, "Высота", "H", 2);
        let length = parameter(table_id, "Длина", "L", 1);
        let cells = vec![
            cell(&height, &dn100, &pn16, 300.0),
            cell(&height, &dn50, &pn16, 200.0),
            cell(&length, &dn50, &pn16, 150.0),
            cell(&length, &dn50, &pn40, 160.0),
        ];
        let drawings = vec![
            drawing(table_id, "Большие", 2, &["DN100"]),
            drawing(table_id, "Малые", 1, &["DN50", "DN80"]),
        ];

        Fixture {
            dn50,
            dn80,
            dn100,
            pn16,
            pn40,
            params: vec![height, length],
            cells,
            drawings,
        }
    }

    #[test]
    fn test_matrices_follow_catalog_order_and_skip_empty_columns() {
        let f = fixture();
        let dns = vec![f.dn100.clone(), f.dn80.clone(), f.dn50.clone()];
        let pns = vec![f.pn40.clone(), f.pn16.clone()];
        let catalog = vec![f.dn50.clone(), f.dn80.clone(), f.dn100.clone()];
        let source = DimensionSource {
            parameters: &f.params,
            cells: &f.cells,
            drawings: &f.drawings,
            dn_catalog: &catalog,
        };

        let data = build_dimension_data(&source, dns, pns, Vec::new(), false);
        assert_eq!(data.matrices.len(), 2);

        let first = &data.matrices[0];
        assert_eq!(first.pn, "Ру 16");
        assert_eq!(
            first.matrix[0],
            vec![json!("legend"), json!("parameter_variety_name"), json!("Ду 50"), json!("Ду 100")]
        );
        assert_eq!(first.matrix[1], vec![json!("L"), json!("Длина"), json!(150.0), Value::Null]);
        assert_eq!(first.matrix[2], vec![json!("H"), json!("Высота"), json!(200.0), json!(300.0)]);

        let second = &data.matrices[1];
        assert_eq!(second.pn, "Ру 40");
        assert_eq!(second.matrix.len(), 2);
    }

    #[test]
    fn test_export_mode_uses_codes() {
        let f = fixture();
        let matrices = build_matrices(
            &f.params,
            &f.cells,
            &[f.dn50.clone()],
            &[f.pn40.clone()],
            true,
        );
        assert_eq!(
            matrices[0].matrix,
            vec![
                vec![
                    json!("legend"),
                    json!("parame_name"),
                    json!("parameter_variety_code"),
                    json!("PN40"),
                    json!("DN50")
                ],
                vec![json!("L"), json!("Длина"), json!("L_code"), json!("PN40"), json!(160.0)],
            ]
        );
    }

    #[test]
    fn test_images_match_requested_dns() {
        let f = fixture();
        let catalog = vec![f.dn50.clone(), f.dn80.clone(), f.dn100.clone()];
        let images = drawing_images(
            &f.drawings,
            &[f.dn50.clone(), f.dn100.clone()],
            &catalog,
            false,
        );
        let titles: Vec<&str> = images.iter().map(|i| i.drawing_title.as_str()).collect();
        assert_eq!(titles, vec!["Малые", "Большие"]);
        assert_eq!(images[0].matching_dns, vec!["Ду 50".to_string()]);
        assert_eq!(images[0].allowed_dns, vec!["Ду 50".to_string(), "Ду 80".to_string()]);

        assert!(drawing_images(&f.drawings, &[f.dn80.clone()], &catalog, true)
            .iter()
            .all(|i| i.matching_dns == vec!["DN80".to_string()]));
    }

    #[test]
    fn test_no_data_keeps_errors_only() {
        let f = fixture();
        let source = DimensionSource {
            parameters: &f.params,
            cells: &f.cells,
            drawings: &f.drawings,
            dn_catalog: &[],
        };
        let data = build_dimension_data(
            &source,
            vec![f.dn80.clone()],
            Vec::new(),
            vec!["Dn 'DN999' не найден".into()],
            false,
        );
        assert!(data.matrices.is_empty());
        assert!(data.images.is_empty());
        assert_eq!(data.errors.len(), 1);
    }

    #[test]
    fn test_axes_in_cells_are_distinct() {
        let f = fixture();
        let (dns, pns) = axes_in_cells(&f.cells);
        assert_eq!(dns.len(), 2);
        assert_eq!(pns.len(), 2);
    }
}
