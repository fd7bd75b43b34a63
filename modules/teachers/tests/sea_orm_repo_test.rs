use std::sync::Arc;

use anyhow::Result;

use teachers::{
    contract::model::{NewTeacher, Teacher, TeacherUpdate},
    domain::{error::DomainError, repo::TeachersRepository, service::Service},
    infra::storage::{
        sea_orm_repo::{connect, ensure_schema},
        SeaOrmTeachersRepository,
    },
    TeachersConfig, TeachersModule,
};

async fn create_test_repo() -> SeaOrmTeachersRepository<sea_orm::DatabaseConnection> {
    let db = connect("sqlite::memory:", None)
        .await
        .expect("Failed to connect to test database");
    ensure_schema(&db).await.expect("Failed to create schema");
    SeaOrmTeachersRepository::new(db)
}

fn new_teacher(firstname: &str, lastname: &str) -> NewTeacher {
    NewTeacher {
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
    }
}

#[tokio::test]
async fn insert_assigns_sequential_ids() -> Result<()> {
    let repo = create_test_repo().await;

    let a = repo.insert(new_teacher("Ann", "Lee")).await?;
    let b = repo.insert(new_teacher("Bob", "Stone")).await?;
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);

    assert_eq!(repo.find_by_id(1).await?, Some(a));
    assert_eq!(repo.find_by_id(99).await?, None);
    // Out of column range is simply absent.
    assert_eq!(repo.find_by_id(i64::MAX).await?, None);
    Ok(())
}

#[tokio::test]
async fn prefix_search_is_case_sensitive_and_literal() -> Result<()> {
    let repo = create_test_repo().await;
    repo.insert(new_teacher("Ann", "Smith")).await?;
    repo.insert(new_teacher("Bob", "smith")).await?;
    repo.insert(new_teacher("Cleo", "Smythe")).await?;
    repo.insert(new_teacher("Dan", "S_mith")).await?;

    let found: Vec<String> = repo
        .find_by_lastname_prefix("Sm")
        .await?
        .into_iter()
        .map(|t| t.lastname)
        .collect();
    assert_eq!(found, vec!["Smith", "Smythe"]);

    let underscore = repo.find_by_lastname_prefix("S_").await?;
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].lastname, "S_mith");
    Ok(())
}

#[tokio::test]
async fn update_and_delete() -> Result<()> {
    let repo = create_test_repo().await;
    let t = repo.insert(new_teacher("Ann", "Lee")).await?;

    let changed = Teacher {
        firstname: "Anna".into(),
        ..t.clone()
    };
    assert!(repo.update(changed.clone()).await?);
    assert_eq!(repo.find_by_id(t.id).await?, Some(changed.clone()));

    assert!(
        !repo
            .update(Teacher {
                id: 42,
                ..changed.clone()
            })
            .await?
    );

    assert_eq!(repo.delete(t.id).await?, Some(changed));
    assert_eq!(repo.delete(t.id).await?, None);
    Ok(())
}

#[tokio::test]
async fn service_over_database() -> Result<()> {
    let service = Service::new(Arc::new(create_test_repo().await));

    let t = service.insert_teacher(new_teacher(" Ann ", "Lee")).await?;
    assert_eq!(t.firstname, "Ann");

    let updated = service
        .update_teacher(
            t.id,
            TeacherUpdate {
                firstname: "Ann".into(),
                lastname: "Lee-Park".into(),
            },
        )
        .await?;
    assert_eq!(service.get_teachers_by_lastname("Lee").await?, vec![updated]);

    let err = service.get_teachers_by_lastname("X").await.unwrap_err();
    assert!(matches!(err, DomainError::NoTeachersWithLastname { .. }));

    service.delete_teacher(t.id).await?;
    let err = service.get_teacher_by_id(t.id).await.unwrap_err();
    assert!(matches!(err, DomainError::TeacherNotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn module_with_database_creates_schema() -> Result<()> {
    let module =
        TeachersModule::with_database("sqlite::memory:", Some(4), &TeachersConfig::default())
            .await?;
    let client = module.client();

    let t = client.insert_teacher(new_teacher("Ann", "Lee")).await?;
    assert_eq!(client.get_teacher(t.id).await?, t);
    Ok(())
}
