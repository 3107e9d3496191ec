use chrono::Utc;
use contracts::domain::a005_dimension_table::{DimensionTable, DimensionTableId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_dimension_table")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub valve_variety: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DimensionTable {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        DimensionTable {
            base: BaseAggregate::with_metadata(
                DimensionTableId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            name: m.name,
            brand: m.brand,
            valve_variety: m.valve_variety,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &DimensionTable) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        name: Set(aggregate.name.clone()),
        brand: Set(aggregate.brand.clone()),
        valve_variety: Set(aggregate.valve_variety.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<DimensionTable>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Name)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<DimensionTable>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into).filter(|t: &DimensionTable| !t.base.metadata.is_deleted))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<DimensionTable>> {
    let result = Entity::find()
        .filter(Column::Code.eq(code.trim()))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &DimensionTable) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &DimensionTable) -> anyhow::Result<()> {
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
