use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Employees {
    Table,
    Id,
    Name,
    Department,
    Salary,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Employees::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::Salary)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}
