use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flashcard_sets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub total_cards_count: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::flashcards::Entity")]
    Flashcards,
    #[sea_orm(has_one = "super::source_texts::Entity")]
    SourceTexts,
}

impl Related<super::flashcards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flashcards.def()
    }
}

impl Related<super::source_texts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SourceTexts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
