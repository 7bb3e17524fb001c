use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// "manual", "ai", or "ai_edited"; see crate::review::CreationMode
pub type CreationModeTag = String;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flashcards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub set_id: String,
    pub front_content: String,
    pub back_content: String,
    pub creation_mode: CreationModeTag,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flashcard_sets::Entity",
        from = "Column::SetId",
        to = "super::flashcard_sets::Column::Id"
    )]
    FlashcardSets,
}

impl Related<super::flashcard_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlashcardSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
