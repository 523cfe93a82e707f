//! Create bookings table
//!
//! Guests and rooms referenced by a booking cannot be deleted.
//! The (room_id, status) index serves the overlap check.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_rooms::Rooms;
use super::m20240101_000003_create_guests::Guests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::GuestId).integer().not_null())
                    .col(ColumnDef::new(Bookings::RoomId).integer().not_null())
                    .col(ColumnDef::new(Bookings::CheckIn).date().not_null())
                    .col(ColumnDef::new(Bookings::CheckOut).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::NumberOfGuests)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("Confirmed"),
                    )
                    .col(
                        ColumnDef::new(Bookings::BookedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::SpecialRequests).string_len(500))
                    .col(ColumnDef::new(Bookings::CheckedInAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::CheckedOutAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_guest")
                            .from(Bookings::Table, Bookings::GuestId)
                            .to(Guests::Table, Guests::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_room")
                            .from(Bookings::Table, Bookings::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_room_status")
                    .table(Bookings::Table)
                    .col(Bookings::RoomId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_guest")
                    .table(Bookings::Table)
                    .col(Bookings::GuestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    GuestId,
    RoomId,
    CheckIn,
    CheckOut,
    NumberOfGuests,
    TotalPriceCents,
    Status,
    BookedAt,
    SpecialRequests,
    CheckedInAt,
    CheckedOutAt,
}
