use chrono::Utc;
use contracts::domain::a004_eav::{EavAttribute, EavAttributeId, EavValueType};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_eav_attribute")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub value_type: String,
    pub choices: String,
    pub default_value: Option<String>,
    pub is_required: bool,
    pub is_global: bool,
    pub entity_type: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EavAttribute {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let value_type = m.value_type.parse().unwrap_or_else(|e| {
            tracing::warn!("a004 attribute {}: {}", m.code, e);
            EavValueType::String
        });

        EavAttribute {
            base: BaseAggregate::with_metadata(
                EavAttributeId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            value_type,
            choices: m.choices,
            default_value: m.default_value,
            is_required: m.is_required,
            is_global: m.is_global,
            entity_type: m.entity_type,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &EavAttribute) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        value_type: Set(aggregate.value_type.as_str().to_string()),
        choices: Set(aggregate.choices.clone()),
        default_value: Set(aggregate.default_value.clone()),
        is_required: Set(aggregate.is_required),
        is_global: Set(aggregate.is_global),
        entity_type: Set(aggregate.entity_type.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<EavAttribute>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<EavAttribute>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<EavAttribute>> {
    let result = Entity::find()
        .filter(Column::Code.eq(code.trim()))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &EavAttribute) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &EavAttribute) -> anyhow::Result<()> {
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
