use contracts::domain::a004_eav::{EavAttributeId, EavValue, EavValueId};
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_eav_value")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub attribute_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub value_text: String,
    pub display_order: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EavValue {
    fn from(m: Model) -> Self {
        EavValue {
            id: EavValueId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            attribute_id: EavAttributeId(
                Uuid::parse_str(&m.attribute_id).unwrap_or_else(|_| Uuid::nil()),
            ),
            entity_type: m.entity_type,
            entity_id: m.entity_id,
            value_text: m.value_text,
            display_order: m.display_order,
            metadata: EntityMetadata::from_row(m.created_at, m.updated_at, false, m.version),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn models_into(models: Vec<Model>) -> Vec<EavValue> {
    models.into_iter().map(Into::into).collect()
}

pub async fn find(
    attribute_id: EavAttributeId,
    entity_type: &str,
    entity_id: &str,
) -> anyhow::Result<Option<EavValue>> {
    let result = Entity::find()
        .filter(Column::AttributeId.eq(attribute_id.value().to_string()))
        .filter(Column::EntityType.eq(entity_type))
        .filter(Column::EntityId.eq(entity_id))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

/// Значения одной сущности
pub async fn list_for_entity(entity_type: &str, entity_id: &str) -> anyhow::Result<Vec<EavValue>> {
    let models = Entity::find()
        .filter(Column::EntityType.eq(entity_type))
        .filter(Column::EntityId.eq(entity_id))
        .order_by_asc(Column::DisplayOrder)
        .all(conn())
        .await?;
    Ok(models_into(models))
}

/// Все значения сущностей данного типа
pub async fn list_for_entity_type(entity_type: &str) -> anyhow::Result<Vec<EavValue>> {
    let models = Entity::find()
        .filter(Column::EntityType.eq(entity_type))
        .all(conn())
        .await?;
    Ok(models_into(models))
}

/// Вставка или обновление по (attribute_id, entity_type, entity_id)
pub async fn upsert(value: &EavValue) -> anyhow::Result<EavValue> {
    let existing = find(value.attribute_id, &value.entity_type, &value.entity_id).await?;
    match existing {
        Some(current) => {
            let mut metadata = current.metadata.clone();
            metadata.increment_version();
            let active = ActiveModel {
                id: Set(current.to_string_id()),
                attribute_id: Set(value.attribute_id.value().to_string()),
                entity_type: Set(value.entity_type.clone()),
                entity_id: Set(value.entity_id.clone()),
                value_text: Set(value.value_text.clone()),
                display_order: Set(value.display_order),
                created_at: sea_orm::ActiveValue::NotSet,
                updated_at: Set(Some(value.metadata.updated_at)),
                version: Set(metadata.version),
            };
            Ok(active.update(conn()).await?.into())
        }
        None => {
            let active = ActiveModel {
                id: Set(value.to_string_id()),
                attribute_id: Set(value.attribute_id.value().to_string()),
                entity_type: Set(value.entity_type.clone()),
                entity_id: Set(value.entity_id.clone()),
                value_text: Set(value.value_text.clone()),
                display_order: Set(value.display_order),
                created_at: Set(Some(value.metadata.created_at)),
                updated_at: Set(Some(value.metadata.updated_at)),
                version: Set(value.metadata.version),
            };
            Ok(active.insert(conn()).await?.into())
        }
    }
}

pub async fn delete(
    attribute_id: EavAttributeId,
    entity_type: &str,
    entity_id: &str,
) -> anyhow::Result<bool> {
    let result = Entity::delete_many()
        .filter(Column::AttributeId.eq(attribute_id.value().to_string()))
        .filter(Column::EntityType.eq(entity_type))
        .filter(Column::EntityId.eq(entity_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
