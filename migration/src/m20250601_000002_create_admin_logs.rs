use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only log of privileged mutations
        manager
            .create_table(
                Table::create()
                    .table(AdminLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminLogs::Timestamp).string().not_null())
                    .col(ColumnDef::new(AdminLogs::Action).string().not_null())
                    .col(ColumnDef::new(AdminLogs::AdminId).string().not_null())
                    .col(ColumnDef::new(AdminLogs::TargetUserId).string().null())
                    .col(ColumnDef::new(AdminLogs::IpAddress).string().null())
                    .col(ColumnDef::new(AdminLogs::Data).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_admin_logs_admin_id")
                    .table(AdminLogs::Table)
                    .col(AdminLogs::AdminId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminLogs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AdminLogs {
    Table,
    Id,
    Timestamp,
    Action,
    AdminId,
    TargetUserId,
    IpAddress,
    Data,
}
