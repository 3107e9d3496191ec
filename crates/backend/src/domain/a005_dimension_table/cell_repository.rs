use contracts::domain::a001_catalog_option::CatalogOptionId;
use contracts::domain::a005_dimension_table::{DimensionCell, DimensionCellId, DimensionParameterId};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_dimension_cell")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub parameter_id: String,
    pub dn_id: String,
    pub pn_id: String,
    pub value: Option<f64>,
    pub text_value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_or_nil(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::nil())
}

impl From<Model> for DimensionCell {
    fn from(m: Model) -> Self {
        DimensionCell {
            id: DimensionCellId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            parameter_id: DimensionParameterId(parse_or_nil(&m.parameter_id)),
            dn_id: CatalogOptionId(parse_or_nil(&m.dn_id)),
            pn_id: CatalogOptionId(parse_or_nil(&m.pn_id)),
            value: m.value,
            text_value: m.text_value,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn ids_to_strings(ids: &[DimensionParameterId]) -> Vec<String> {
    ids.iter().map(|id| id.value().to_string()).collect()
}

/// Значения всех переданных параметров
pub async fn list_for_parameters(
    parameter_ids: &[DimensionParameterId],
) -> anyhow::Result<Vec<DimensionCell>> {
    if parameter_ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = Entity::find()
        .filter(Column::ParameterId.is_in(ids_to_strings(parameter_ids)))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

async fn find_model(
    parameter_id: DimensionParameterId,
    dn_id: CatalogOptionId,
    pn_id: CatalogOptionId,
) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find()
        .filter(Column::ParameterId.eq(parameter_id.value().to_string()))
        .filter(Column::DnId.eq(dn_id.value().to_string()))
        .filter(Column::PnId.eq(pn_id.value().to_string()))
        .one(conn())
        .await?)
}

/// Запись значения по ключу (parameter, dn, pn)
pub async fn upsert(cell: &DimensionCell) -> anyhow::Result<DimensionCell> {
    let existing = find_model(cell.parameter_id, cell.dn_id, cell.pn_id).await?;
    let id = existing
        .as_ref()
        .map(|m| m.id.clone())
        .unwrap_or_else(|| cell.id.value().to_string());
    let active = ActiveModel {
        id: Set(id),
        parameter_id: Set(cell.parameter_id.value().to_string()),
        dn_id: Set(cell.dn_id.value().to_string()),
        pn_id: Set(cell.pn_id.value().to_string()),
        value: Set(cell.value),
        text_value: Set(cell.text_value.clone()),
    };
    let saved = if existing.is_some() {
        active.update(conn()).await?
    } else {
        active.insert(conn()).await?
    };
    Ok(saved.into())
}

/// Удаление значений для PN среди переданных параметров
pub async fn delete_for_pn(
    parameter_ids: &[DimensionParameterId],
    pn_id: CatalogOptionId,
) -> anyhow::Result<u64> {
    if parameter_ids.is_empty() {
        return Ok(0);
    }
    let result = Entity::delete_many()
        .filter(Column::ParameterId.is_in(ids_to_strings(parameter_ids)))
        .filter(Column::PnId.eq(pn_id.value().to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_for_parameter(parameter_id: DimensionParameterId) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::ParameterId.eq(parameter_id.value().to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
