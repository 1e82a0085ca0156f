use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: unique username and national id
        manager
            .create_index(
                Index::create()
                    .name("uq_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_users_national_id")
                    .table(Users::Table)
                    .col(Users::NationalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // LeaveSlips: unique employee code, lookup by national id, latest-by-national-id
        manager
            .create_index(
                Index::create()
                    .name("uq_leave_slips_employee_code")
                    .table(LeaveSlips::Table)
                    .col(LeaveSlips::EmployeeCode)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_leave_slips_national_id")
                    .table(LeaveSlips::Table)
                    .col(LeaveSlips::NationalId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_leave_slips_national_id_created_at")
                    .table(LeaveSlips::Table)
                    .col(LeaveSlips::NationalId)
                    .col(LeaveSlips::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_users_username").table(Users::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uq_users_national_id").table(Users::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uq_leave_slips_employee_code").table(LeaveSlips::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_leave_slips_national_id").table(LeaveSlips::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_leave_slips_national_id_created_at").table(LeaveSlips::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Username, NationalId }

#[derive(DeriveIden)]
enum LeaveSlips { Table, EmployeeCode, NationalId, CreatedAt }
