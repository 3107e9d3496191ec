use chrono::Utc;
use contracts::domain::a001_catalog_option::{CatalogOption, CatalogOptionId, OptionKind};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_catalog_option")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub kind: String,
    pub full_code: Option<String>,
    pub rank: Option<i32>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub voltage_value: Option<i32>,
    pub voltage_type: Option<String>,
    pub sorting_order: i32,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CatalogOption {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let kind = m.kind.parse().unwrap_or_else(|e| {
            tracing::warn!("a001 {}: {}", m.id, e);
            OptionKind::Ip
        });

        CatalogOption {
            base: BaseAggregate::with_metadata(
                CatalogOptionId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            kind,
            full_code: m.full_code,
            rank: m.rank,
            temp_min: m.temp_min,
            temp_max: m.temp_max,
            voltage_value: m.voltage_value,
            voltage_type: m.voltage_type,
            sorting_order: m.sorting_order,
            is_active: m.is_active,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &CatalogOption) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        kind: Set(aggregate.kind.as_str().to_string()),
        full_code: Set(aggregate.full_code.clone()),
        rank: Set(aggregate.rank),
        temp_min: Set(aggregate.temp_min),
        temp_max: Set(aggregate.temp_max),
        voltage_value: Set(aggregate.voltage_value),
        voltage_type: Set(aggregate.voltage_type.clone()),
        sorting_order: Set(aggregate.sorting_order),
        is_active: Set(aggregate.is_active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<CatalogOption>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Kind)
        .order_by_asc(Column::SortingOrder)
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Опции одного вида, по порядку сортировки и коду
pub async fn list_by_kind(kind: OptionKind, active_only: bool) -> anyhow::Result<Vec<CatalogOption>> {
    let mut select = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Kind.eq(kind.as_str()));
    if active_only {
        select = select.filter(Column::IsActive.eq(true));
    }
    let items = select
        .order_by_asc(Column::SortingOrder)
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<CatalogOption>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_ids(ids: &[CatalogOptionId]) -> anyhow::Result<Vec<CatalogOption>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let keys: Vec<String> = ids.iter().map(|id| id.value().to_string()).collect();
    let items = Entity::find()
        .filter(Column::Id.is_in(keys))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(aggregate: &CatalogOption) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &CatalogOption) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
