//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub sessions_per_week: i32,
    // JSON 数组，如 [60,90]
    #[sea_orm(column_type = "Text")]
    pub durations: String,
    // JSON 对象，如 {"60":40}
    #[sea_orm(column_type = "Text")]
    pub price_per_duration: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::subjects::entities::Subject {
        use crate::models::subjects::entities::Subject;

        Subject {
            id: self.id,
            name: self.name,
            sessions_per_week: self.sessions_per_week,
            durations: serde_json::from_str(&self.durations).unwrap_or_default(),
            price_per_duration: serde_json::from_str(&self.price_per_duration)
                .unwrap_or_default(),
            is_active: self.is_active,
            created_at: super::timestamp_to_datetime(self.created_at),
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
