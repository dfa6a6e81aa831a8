use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 考试表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Examinations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Examinations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Examinations::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Examinations::TermId).big_integer().not_null())
                    .col(ColumnDef::new(Examinations::Name).string().not_null())
                    .col(ColumnDef::new(Examinations::Year).integer().not_null())
                    .col(ColumnDef::new(Examinations::ClassId).big_integer().null())
                    .col(ColumnDef::new(Examinations::MaxScore).double().not_null())
                    .col(ColumnDef::new(Examinations::StartDate).string().null())
                    .col(ColumnDef::new(Examinations::EndDate).string().null())
                    .col(
                        ColumnDef::new(Examinations::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Examinations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Examinations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Examinations::Table, Examinations::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Examinations::Table, Examinations::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Examinations::Table, Examinations::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考试成绩表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Results::SubjectId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Results::ExaminationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Results::Score).double().not_null())
                    .col(ColumnDef::new(Results::Remarks).text().null())
                    .col(ColumnDef::new(Results::EnteredBy).big_integer().null())
                    .col(ColumnDef::new(Results::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Results::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::ExaminationId)
                            .to(Examinations::Table, Examinations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::EnteredBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个学生每科每场考试只有一条成绩
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_student_subject_exam")
                    .table(Results::Table)
                    .col(Results::StudentId)
                    .col(Results::SubjectId)
                    .col(Results::ExaminationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_examination")
                    .table(Results::Table)
                    .col(Results::ExaminationId)
                    .to_owned(),
            )
            .await?;

        // ==================== 随堂测验表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Tests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tests::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Tests::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Tests::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Tests::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Tests::TermId).big_integer().null())
                    .col(ColumnDef::new(Tests::Title).string().not_null())
                    .col(ColumnDef::new(Tests::TestType).string().not_null())
                    .col(ColumnDef::new(Tests::MaxScore).double().not_null())
                    .col(ColumnDef::new(Tests::TestDate).string().null())
                    .col(ColumnDef::new(Tests::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tests::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 测验成绩表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TestResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestResults::TestId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TestResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestResults::Score).double().not_null())
                    .col(ColumnDef::new(TestResults::Remarks).text().null())
                    .col(
                        ColumnDef::new(TestResults::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestResults::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::TestId)
                            .to(Tests::Table, Tests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TestResults::Table, TestResults::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_test_results_test_student")
                    .table(TestResults::Table)
                    .col(TestResults::TestId)
                    .col(TestResults::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ==================== 课程表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TimetableEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimetableEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::StreamId).big_integer().null())
                    .col(
                        ColumnDef::new(TimetableEntries::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::StartMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::EndMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::Room).string().null())
                    .col(
                        ColumnDef::new(TimetableEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::StreamId)
                            .to(Streams::Table, Streams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timetable_teacher_day")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::TeacherId)
                    .col(TimetableEntries::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timetable_class_day")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::ClassId)
                    .col(TimetableEntries::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimetableEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TestResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Examinations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Streams {
    #[sea_orm(iden = "streams")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Terms {
    #[sea_orm(iden = "terms")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Examinations {
    #[sea_orm(iden = "examinations")]
    Table,
    Id,
    SchoolId,
    TermId,
    Name,
    Year,
    ClassId,
    MaxScore,
    StartDate,
    EndDate,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Results {
    #[sea_orm(iden = "results")]
    Table,
    Id,
    StudentId,
    SubjectId,
    ExaminationId,
    Score,
    Remarks,
    EnteredBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tests {
    #[sea_orm(iden = "tests")]
    Table,
    Id,
    SchoolId,
    TeacherId,
    ClassId,
    SubjectId,
    TermId,
    Title,
    TestType,
    MaxScore,
    TestDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TestResults {
    #[sea_orm(iden = "test_results")]
    Table,
    Id,
    TestId,
    StudentId,
    Score,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimetableEntries {
    #[sea_orm(iden = "timetable_entries")]
    Table,
    Id,
    SchoolId,
    ClassId,
    StreamId,
    SubjectId,
    TeacherId,
    DayOfWeek,
    StartMinute,
    EndMinute,
    Room,
    CreatedAt,
}
