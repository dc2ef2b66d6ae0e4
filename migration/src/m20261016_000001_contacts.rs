use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Contact {
    Table,
    Id,
    OwnerId,
    FirstName,
    LastName,
    Address,
    City,
    State,
    Zip,
    Email,
    Status,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contact::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contact::OwnerId).string_len(450).not_null())
                    .col(ColumnDef::new(Contact::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Contact::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Contact::Address).string_len(100).not_null())
                    .col(ColumnDef::new(Contact::City).string_len(100))
                    .col(ColumnDef::new(Contact::State).string_len(100))
                    .col(ColumnDef::new(Contact::Zip).string_len(16).not_null())
                    .col(ColumnDef::new(Contact::Email).string_len(320).not_null())
                    .col(
                        ColumnDef::new(Contact::Status)
                            .string_len(16)
                            .not_null()
                            .default("SUBMITTED"),
                    )
                    .col(
                        ColumnDef::new(Contact::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Contact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contact::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contact_owner_id")
                    .table(Contact::Table)
                    .col(Contact::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contact_status")
                    .table(Contact::Table)
                    .col(Contact::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contact::Table).if_exists().to_owned())
            .await
    }
}
