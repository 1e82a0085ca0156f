//! Create `leave_slips` table.
//!
//! `national_id` is free text; there is deliberately no foreign key to `users`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeaveSlips::Table)
                    .if_not_exists()
                    .col(uuid(LeaveSlips::Id).primary_key())
                    .col(string_len(LeaveSlips::EmployeeName, 100))
                    .col(string_len(LeaveSlips::NationalId, 8))
                    .col(string_len(LeaveSlips::EmployeeCode, 20))
                    .col(string_len(LeaveSlips::Area, 100))
                    .col(string_len(LeaveSlips::Position, 100))
                    .col(string_len(LeaveSlips::Reason, 200))
                    .col(string_len(LeaveSlips::OfficeEntity, 100))
                    .col(text(LeaveSlips::Justification))
                    .col(date(LeaveSlips::Date))
                    .col(time(LeaveSlips::DepartureTime))
                    .col(time_null(LeaveSlips::ReturnTime))
                    .col(string_len(LeaveSlips::Regime, 50))
                    .col(timestamp_with_time_zone(LeaveSlips::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LeaveSlips::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LeaveSlips {
    Table,
    Id,
    EmployeeName,
    NationalId,
    EmployeeCode,
    Area,
    Position,
    Reason,
    OfficeEntity,
    Justification,
    Date,
    DepartureTime,
    ReturnTime,
    Regime,
    CreatedAt,
}
