use chrono::Utc;
use contracts::domain::a003_product_series::{ProductSeries, ProductSeriesId};
use contracts::domain::a005_dimension_table::DimensionTableId;
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_product_series")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub original_series_id: Option<String>,
    pub producer: Option<String>,
    pub brand: Option<String>,
    pub valve_variety: Option<String>,
    pub body_material: Option<String>,
    pub sealing_class: Option<String>,
    pub features_text: Option<String>,
    pub application_text: Option<String>,
    pub work_temp_min: Option<i32>,
    pub work_temp_max: Option<i32>,
    pub port_qty: Option<i32>,
    pub dimension_table_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_uuid(value: Option<&str>) -> Option<Uuid> {
    value.and_then(|s| Uuid::parse_str(s).ok())
}

impl From<Model> for ProductSeries {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ProductSeries {
            base: BaseAggregate::with_metadata(
                ProductSeriesId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            original_series_id: parse_uuid(m.original_series_id.as_deref()).map(ProductSeriesId),
            producer: m.producer,
            brand: m.brand,
            valve_variety: m.valve_variety,
            body_material: m.body_material,
            sealing_class: m.sealing_class,
            features_text: m.features_text,
            application_text: m.application_text,
            work_temp_min: m.work_temp_min,
            work_temp_max: m.work_temp_max,
            port_qty: m.port_qty,
            dimension_table_id: parse_uuid(m.dimension_table_id.as_deref()).map(DimensionTableId),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &ProductSeries) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        original_series_id: Set(aggregate.original_series_id.map(|id| id.value().to_string())),
        producer: Set(aggregate.producer.clone()),
        brand: Set(aggregate.brand.clone()),
        valve_variety: Set(aggregate.valve_variety.clone()),
        body_material: Set(aggregate.body_material.clone()),
        sealing_class: Set(aggregate.sealing_class.clone()),
        features_text: Set(aggregate.features_text.clone()),
        application_text: Set(aggregate.application_text.clone()),
        work_temp_min: Set(aggregate.work_temp_min),
        work_temp_max: Set(aggregate.work_temp_max),
        port_qty: Set(aggregate.port_qty),
        dimension_table_id: Set(aggregate.dimension_table_id.map(|id| id.value().to_string())),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<ProductSeries>> {
    let mut items: Vec<ProductSeries> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ProductSeries>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &ProductSeries) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &ProductSeries) -> anyhow::Result<()> {
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
