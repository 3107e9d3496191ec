use contracts::domain::a005_dimension_table::{
    DimensionParameter, DimensionParameterId, DimensionTableId,
};
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_dimension_parameter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub table_id: String,
    pub name: String,
    pub legend: String,
    pub parameter_code: Option<String>,
    pub sorting_order: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DimensionParameter {
    fn from(m: Model) -> Self {
        DimensionParameter {
            id: DimensionParameterId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            table_id: DimensionTableId(Uuid::parse_str(&m.table_id).unwrap_or_else(|_| Uuid::nil())),
            name: m.name,
            legend: m.legend,
            parameter_code: m.parameter_code,
            sorting_order: m.sorting_order,
            metadata: EntityMetadata::from_row(m.created_at, m.updated_at, false, 0),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(parameter: &DimensionParameter) -> ActiveModel {
    ActiveModel {
        id: Set(parameter.id.value().to_string()),
        table_id: Set(parameter.table_id.value().to_string()),
        name: Set(parameter.name.clone()),
        legend: Set(parameter.legend.clone()),
        parameter_code: Set(parameter.parameter_code.clone()),
        sorting_order: Set(parameter.sorting_order),
        created_at: Set(Some(parameter.metadata.created_at)),
        updated_at: Set(Some(parameter.metadata.updated_at)),
    }
}

pub async fn list_for_table(table_id: DimensionTableId) -> anyhow::Result<Vec<DimensionParameter>> {
    let items = Entity::find()
        .filter(Column::TableId.eq(table_id.value().to_string()))
        .order_by_asc(Column::SortingOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<DimensionParameter>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(parameter: &DimensionParameter) -> anyhow::Result<Uuid> {
    to_active(parameter).insert(conn()).await?;
    Ok(parameter.id.value())
}

pub async fn update(parameter: &DimensionParameter) -> anyhow::Result<()> {
    let mut active = to_active(parameter);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
