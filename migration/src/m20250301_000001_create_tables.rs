use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学校表
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Schools::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Schools::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schools::Address).string().null())
                    .col(ColumnDef::new(Schools::Phone).string().null())
                    .col(ColumnDef::new(Schools::Email).string().null())
                    .col(ColumnDef::new(Schools::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Schools::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建用户（账号资料）表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teachers::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Teachers::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::StaffNumber).string().null())
                    .col(ColumnDef::new(Teachers::Phone).string().null())
                    .col(ColumnDef::new(Teachers::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Level).integer().not_null())
                    .col(ColumnDef::new(Classes::ClassTeacherId).big_integer().null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::ClassTeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_school_name")
                    .table(Classes::Table)
                    .col(Classes::SchoolId)
                    .col(Classes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建分班（Stream）表
        manager
            .create_table(
                Table::create()
                    .table(Streams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Streams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Streams::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Streams::Name).string().not_null())
                    .col(ColumnDef::new(Streams::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Streams::Table, Streams::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_streams_class_name")
                    .table(Streams::Table)
                    .col(Streams::ClassId)
                    .col(Streams::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Students::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(Students::AdmissionNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string().null())
                    .col(ColumnDef::new(Students::DateOfBirth).string().null())
                    .col(ColumnDef::new(Students::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Students::StreamId).big_integer().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::StreamId)
                            .to(Streams::Table, Streams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_school_admission")
                    .table(Students::Table)
                    .col(Students::SchoolId)
                    .col(Students::AdmissionNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subjects_school_code")
                    .table(Subjects::Table)
                    .col(Subjects::SchoolId)
                    .col(Subjects::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建教师任课表
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teacher_subjects_unique")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::TeacherId)
                    .col(TeacherSubjects::SubjectId)
                    .col(TeacherSubjects::ClassId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建学期表
        manager
            .create_table(
                Table::create()
                    .table(Terms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Terms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Terms::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Terms::Name).string().not_null())
                    .col(ColumnDef::new(Terms::Year).integer().not_null())
                    .col(ColumnDef::new(Terms::StartDate).string().not_null())
                    .col(ColumnDef::new(Terms::EndDate).string().not_null())
                    .col(
                        ColumnDef::new(Terms::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Terms::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Terms::Table, Terms::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_terms_school_year_name")
                    .table(Terms::Table)
                    .col(Terms::SchoolId)
                    .col(Terms::Year)
                    .col(Terms::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Terms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Streams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
    Name,
    Code,
    Address,
    Phone,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    SchoolId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    SchoolId,
    UserId,
    StaffNumber,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    SchoolId,
    Name,
    Level,
    ClassTeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Streams {
    #[sea_orm(iden = "streams")]
    Table,
    Id,
    ClassId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    SchoolId,
    UserId,
    AdmissionNumber,
    FirstName,
    LastName,
    Gender,
    DateOfBirth,
    ClassId,
    StreamId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    SchoolId,
    Name,
    Code,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeacherSubjects {
    #[sea_orm(iden = "teacher_subjects")]
    Table,
    Id,
    TeacherId,
    SubjectId,
    ClassId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Terms {
    #[sea_orm(iden = "terms")]
    Table,
    Id,
    SchoolId,
    Name,
    Year,
    StartDate,
    EndDate,
    IsCurrent,
    CreatedAt,
}
