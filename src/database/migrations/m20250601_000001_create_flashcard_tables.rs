use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FlashcardSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FlashcardSets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FlashcardSets::UserId).string().not_null())
                    .col(ColumnDef::new(FlashcardSets::Title).string().not_null())
                    .col(
                        ColumnDef::new(FlashcardSets::TotalCardsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(FlashcardSets::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // SQLite only accepts standalone CREATE INDEX statements
        manager
            .create_index(
                Index::create()
                    .name("idx_flashcard_sets_user")
                    .table(FlashcardSets::Table)
                    .col(FlashcardSets::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flashcards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Flashcards::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Flashcards::SetId).string().not_null())
                    .col(ColumnDef::new(Flashcards::FrontContent).text().not_null())
                    .col(ColumnDef::new(Flashcards::BackContent).text().not_null())
                    .col(ColumnDef::new(Flashcards::CreationMode).string().not_null())
                    .col(ColumnDef::new(Flashcards::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flashcards_set_id")
                            .from(Flashcards::Table, Flashcards::SetId)
                            .to(FlashcardSets::Table, FlashcardSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flashcards_set")
                    .table(Flashcards::Table)
                    .col(Flashcards::SetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SourceTexts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SourceTexts::SetId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SourceTexts::Content).text().not_null())
                    .col(ColumnDef::new(SourceTexts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_source_texts_set_id")
                            .from(SourceTexts::Table, SourceTexts::SetId)
                            .to(FlashcardSets::Table, FlashcardSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GenerationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GenerationLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GenerationLogs::UserId).string().not_null())
                    .col(ColumnDef::new(GenerationLogs::SetId).string())
                    .col(ColumnDef::new(GenerationLogs::SetTitle).string().not_null())
                    .col(
                        ColumnDef::new(GenerationLogs::GeneratedCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::AcceptedCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::RejectedCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::GeneratedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generation_logs_user_generated")
                    .table(GenerationLogs::Table)
                    .col(GenerationLogs::UserId)
                    .col(GenerationLogs::GeneratedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GenerationLimits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GenerationLimits::UserId).string().not_null())
                    .col(ColumnDef::new(GenerationLimits::Date).string().not_null())
                    .col(
                        ColumnDef::new(GenerationLimits::UsedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(GenerationLimits::UserId)
                            .col(GenerationLimits::Date),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GenerationLimits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GenerationLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SourceTexts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Flashcards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FlashcardSets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FlashcardSets {
    Table,
    Id,
    UserId,
    Title,
    TotalCardsCount,
    CreatedAt,
}

#[derive(Iden)]
enum Flashcards {
    Table,
    Id,
    SetId,
    FrontContent,
    BackContent,
    CreationMode,
    CreatedAt,
}

#[derive(Iden)]
enum SourceTexts {
    Table,
    SetId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum GenerationLogs {
    Table,
    Id,
    UserId,
    SetId,
    SetTitle,
    GeneratedCount,
    AcceptedCount,
    RejectedCount,
    GeneratedAt,
}

#[derive(Iden)]
enum GenerationLimits {
    Table,
    UserId,
    Date,
    UsedCount,
}
