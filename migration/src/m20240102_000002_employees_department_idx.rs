use sea_orm_migration::prelude::*;

use crate::m20240101_000001_employees::Employees;

const INDEX_NAME: &str = "idx_employees_department";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEX_NAME)
                    .table(Employees::Table)
                    .col(Employees::Department)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name(INDEX_NAME)
                    .table(Employees::Table)
                    .to_owned(),
            )
            .await
    }
}
