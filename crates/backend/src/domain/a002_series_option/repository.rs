use chrono::Utc;
use contracts::domain::a001_catalog_option::{CatalogOptionId, OptionKind};
use contracts::domain::a002_series_option::{SeriesOption, SeriesOptionId};
use contracts::domain::a003_product_series::ProductSeriesId;
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_series_option")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub series_id: String,
    pub kind: String,
    pub option_id: Option<String>,
    pub sorting_order: i32,
    pub is_active: bool,
    pub is_default: bool,
    pub additional_cost: f64,
    pub lead_time_days: i32,
    pub work_temp_min: Option<i32>,
    pub work_temp_max: Option<i32>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SeriesOption {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let series_uuid = Uuid::parse_str(&m.series_id).unwrap_or_else(|_| Uuid::nil());
        let kind = m.kind.parse().unwrap_or_else(|e| {
            tracing::warn!("a002 {}: {}", m.id, e);
            OptionKind::Ip
        });

        SeriesOption {
            base: BaseAggregate::with_metadata(
                SeriesOptionId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            series_id: ProductSeriesId(series_uuid),
            kind,
            option_id: m
                .option_id
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map(CatalogOptionId),
            sorting_order: m.sorting_order,
            is_active: m.is_active,
            is_default: m.is_default,
            additional_cost: m.additional_cost,
            lead_time_days: m.lead_time_days,
            work_temp_min: m.work_temp_min,
            work_temp_max: m.work_temp_max,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &SeriesOption) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        series_id: Set(aggregate.series_id.value().to_string()),
        kind: Set(aggregate.kind.as_str().to_string()),
        option_id: Set(aggregate.option_id.map(|id| id.value().to_string())),
        sorting_order: Set(aggregate.sorting_order),
        is_active: Set(aggregate.is_active),
        is_default: Set(aggregate.is_default),
        additional_cost: Set(aggregate.additional_cost),
        lead_time_days: Set(aggregate.lead_time_days),
        work_temp_min: Set(aggregate.work_temp_min),
        work_temp_max: Set(aggregate.work_temp_max),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Все опции серии одного вида (включая неактивные)
pub async fn list_for(series_id: ProductSeriesId, kind: OptionKind) -> anyhow::Result<Vec<SeriesOption>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::SeriesId.eq(series_id.value().to_string()))
        .filter(Column::Kind.eq(kind.as_str()))
        .order_by_asc(Column::SortingOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Все опции серии
pub async fn list_for_series(series_id: ProductSeriesId) -> anyhow::Result<Vec<SeriesOption>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::SeriesId.eq(series_id.value().to_string()))
        .order_by_asc(Column::Kind)
        .order_by_asc(Column::SortingOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SeriesOption>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &SeriesOption) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &SeriesOption) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::IsDefault, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
