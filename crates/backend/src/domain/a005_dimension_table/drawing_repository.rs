use contracts::domain::a005_dimension_table::{DimensionTableId, TableDrawing, TableDrawingId};
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_table_drawing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub table_id: String,
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub display_order: i32,
    /// JSON-массив кодов DN
    pub allowed_dn: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TableDrawing {
    fn from(m: Model) -> Self {
        let allowed_dn = serde_json::from_str::<Vec<String>>(&m.allowed_dn).unwrap_or_else(|e| {
            tracing::warn!("a005 drawing {}: некорректный список DN: {}", m.id, e);
            Vec::new()
        });
        TableDrawing {
            id: TableDrawingId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            table_id: DimensionTableId(Uuid::parse_str(&m.table_id).unwrap_or_else(|_| Uuid::nil())),
            title: m.title,
            description: m.description,
            media_url: m.media_url,
            display_order: m.display_order,
            allowed_dn,
            metadata: EntityMetadata::from_row(m.created_at, m.updated_at, false, 0),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(drawing: &TableDrawing) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(drawing.id.value().to_string()),
        table_id: Set(drawing.table_id.value().to_string()),
        title: Set(drawing.title.clone()),
        description: Set(drawing.description.clone()),
        media_url: Set(drawing.media_url.clone()),
        display_order: Set(drawing.display_order),
        allowed_dn: Set(serde_json::to_string(&drawing.allowed_dn)?),
        created_at: Set(Some(drawing.metadata.created_at)),
        updated_at: Set(Some(drawing.metadata.updated_at)),
    })
}

pub async fn list_for_table(table_id: DimensionTableId) -> anyhow::Result<Vec<TableDrawing>> {
    let items = Entity::find()
        .filter(Column::TableId.eq(table_id.value().to_string()))
        .order_by_asc(Column::DisplayOrder)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<TableDrawing>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(drawing: &TableDrawing) -> anyhow::Result<Uuid> {
    to_active(drawing)?.insert(conn()).await?;
    Ok(drawing.id.value())
}

pub async fn update(drawing: &TableDrawing) -> anyhow::Result<()> {
    let mut active = to_active(drawing)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
