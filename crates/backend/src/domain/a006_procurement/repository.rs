use chrono::Utc;
use contracts::domain::a006_procurement::{Procurement, ProcurementId, ProcurementStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a006_procurement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Номер закупки
    pub code: String,
    /// Предмет закупки
    pub description: String,
    pub comment: Option<String>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub link: Option<String>,
    pub specification_link: Option<String>,
    pub status: String,
    pub manager: String,
    pub rejection_reason: String,
    pub platform: String,
    pub customer: String,
    pub procurement_type: Option<String>,
    pub nmc: Option<f64>,
    pub application_guarantee: Option<f64>,
    pub contract_guarantee: Option<f64>,
    pub currency: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Procurement {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let status = m.status.parse().unwrap_or_else(|e| {
            tracing::warn!("a006 {}: {}", m.code, e);
            ProcurementStatus::default()
        });
        let procurement_type = m.procurement_type.as_deref().and_then(|t| t.parse().ok());

        Procurement {
            base: BaseAggregate::with_metadata(
                ProcurementId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            end_date: m.end_date,
            link: m.link,
            specification_link: m.specification_link,
            status,
            manager: m.manager,
            rejection_reason: m.rejection_reason,
            platform: m.platform,
            customer: m.customer,
            procurement_type,
            nmc: m.nmc,
            application_guarantee: m.application_guarantee,
            contract_guarantee: m.contract_guarantee,
            currency: m.currency,
            is_active: m.is_active,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Procurement) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        end_date: Set(aggregate.end_date),
        link: Set(aggregate.link.clone()),
        specification_link: Set(aggregate.specification_link.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        manager: Set(aggregate.manager.clone()),
        rejection_reason: Set(aggregate.rejection_reason.clone()),
        platform: Set(aggregate.platform.clone()),
        customer: Set(aggregate.customer.clone()),
        procurement_type: Set(aggregate.procurement_type.map(|t| t.as_str().to_string())),
        nmc: Set(aggregate.nmc),
        application_guarantee: Set(aggregate.application_guarantee),
        contract_guarantee: Set(aggregate.contract_guarantee),
        currency: Set(aggregate.currency.clone()),
        is_active: Set(aggregate.is_active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Procurement>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::EndDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Procurement>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Записи с тем же предметом и номером (любая дата окончания)
pub async fn find_by_subject_number(subject: &str, number: &str) -> anyhow::Result<Vec<Procurement>> {
    let items = Entity::find()
        .filter(Column::Description.eq(subject))
        .filter(Column::Code.eq(number))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::EndDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(aggregate: &Procurement) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Procurement) -> anyhow::Result<()> {
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
