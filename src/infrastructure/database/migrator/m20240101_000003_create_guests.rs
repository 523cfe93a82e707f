//! Create guests table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guests::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Guests::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Guests::Email).string_len(100).not_null())
                    .col(ColumnDef::new(Guests::Phone).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Guests::PassportNumber)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Guests::DateOfBirth).date().not_null())
                    .col(
                        ColumnDef::new(Guests::Address)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Guests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Guests::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guests_is_active")
                    .table(Guests::Table)
                    .col(Guests::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Guests {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    PassportNumber,
    DateOfBirth,
    Address,
    CreatedAt,
    IsActive,
}
