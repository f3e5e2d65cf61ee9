use common::types::Id;
use models::{User, UserChanges, UserFilter};

use super::*;

async fn prepare() -> Result<DB> {
    common::init_test_logger();

    const DIR: &str = "target/test-db";
    const REL_PATH: &str = "../..";
    std::fs::create_dir_all(format!("{REL_PATH}/{DIR}")).unwrap();
    let path_fmt = |id| format!("{REL_PATH}/{DIR}/{id}.db");

    // in hope that no single test can call this at the same time
    let mut id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let mut file = path_fmt(id);
    while std::fs::exists(&file).unwrap() {
        id += 1;
        file = path_fmt(id);
    }

    log::debug!("using db at {DIR}/{id}.db");
    let db = DB::init(&file, 2).await?;
    db.build(false).await?;
    Ok(db)
}

async fn count_users(uow: &UnitOfWork, user_id: Id) -> Result<usize> {
    let mut session = uow.begin().await?;
    let users = session.users().get_all(&UserFilter::by_user_id(user_id)).await?;
    Ok(users.len())
}

#[tokio::test]
async fn test_add_user_twice() -> Result<()> {
    const USER_ID: Id = 1;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    assert!(UserService::add_user(&uow, User::new(USER_ID)).await?);
    assert!(!UserService::add_user(&uow, User::new(USER_ID)).await?);
    assert_eq!(count_users(&uow, USER_ID).await?, 1);

    let user = UserService::get_user(&uow, USER_ID).await?.unwrap();
    assert_eq!(user.username(), models::DEFAULT_USERNAME);
    assert_eq!(user.balance(), Some(models::DEFAULT_BALANCE));

    Ok(())
}

#[tokio::test]
async fn test_run_rolls_back_on_error() -> Result<()> {
    const USER_ID: Id = 2;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    let res: Result<()> = uow
        .run(|s| {
            Box::pin(async move {
                s.users().add_one(&User::new(USER_ID)).await?;
                Err(Error::Sqlx(sqlx::Error::RowNotFound))
            })
        })
        .await;
    assert!(res.is_err());
    assert_eq!(count_users(&uow, USER_ID).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_session_dropped_without_commit() -> Result<()> {
    const USER_ID: Id = 3;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    {
        let mut session = uow.begin().await?;
        session.users().add_one(&User::new(USER_ID)).await?;
    }
    assert_eq!(count_users(&uow, USER_ID).await?, 0);

    let mut session = uow.begin().await?;
    session.users().add_one(&User::new(USER_ID)).await?;
    session.commit().await?;
    assert_eq!(count_users(&uow, USER_ID).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_unique_user_id_violation_propagates() -> Result<()> {
    const USER_ID: Id = 4;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    let res: Result<()> = uow
        .run(|s| {
            Box::pin(async move {
                let mut users = s.users();
                users.add_one(&User::new(USER_ID)).await?;
                users.add_one(&User::new(USER_ID)).await?;
                Ok(())
            })
        })
        .await;
    assert!(matches!(res, Err(Error::Sqlx(_))));
    assert_eq!(count_users(&uow, USER_ID).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_edit_one() -> Result<()> {
    const USER_ID: Id = 5;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    let mut session = uow.begin().await?;
    let id = session.users().add_one(&User::new(USER_ID)).await?;
    session
        .users()
        .edit_one(id, UserChanges::builder().username("alice").build())
        .await?;
    // no-op
    session.users().edit_one(id, UserChanges::default()).await?;
    session.commit().await?;

    let mut session = uow.begin().await?;
    let user = session.users().get_by_id(id).await?.unwrap();
    assert_eq!(user.user_id(), USER_ID);
    assert_eq!(user.username(), "alice");

    let by_name = session
        .users()
        .get_by_filter(&UserFilter::builder().username("alice").build())
        .await?;
    assert_eq!(by_name, Some(user));
    assert_eq!(session.users().get_by_id(id + 100).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_change_balance() -> Result<()> {
    const USER_ID: Id = 6;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    assert_eq!(UserService::change_balance(&uow, USER_ID, 10.0).await?, None);

    UserService::add_user(&uow, User::builder().user_id(USER_ID).balance(1.5).build()).await?;
    assert_eq!(UserService::change_balance(&uow, USER_ID, 10.0).await?, Some(11.5));
    assert_eq!(UserService::change_balance(&uow, USER_ID, -1.5).await?, Some(10.0));

    let user = UserService::get_user(&uow, USER_ID).await?.unwrap();
    assert_eq!(user.balance(), Some(10.0));

    Ok(())
}

#[tokio::test]
async fn test_build_drops_existing() -> Result<()> {
    const USER_ID: Id = 7;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    UserService::add_user(&uow, User::new(USER_ID)).await?;
    db.build(false).await?;
    assert_eq!(count_users(&uow, USER_ID).await?, 1);

    db.build(true).await?;
    assert_eq!(count_users(&uow, USER_ID).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_add_user() -> Result<()> {
    const FIRST: Id = 8;
    const SECOND: Id = 9;
    const SAME: Id = 10;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    let (first, second) = tokio::join!(
        UserService::add_user(&uow, User::new(FIRST)),
        UserService::add_user(&uow, User::new(SECOND)),
    );
    assert!(first?);
    assert!(second?);

    let (a, b) = tokio::join!(
        UserService::add_user(&uow, User::new(SAME)),
        UserService::add_user(&uow, User::new(SAME)),
    );
    let mut added = [a?, b?];
    added.sort();
    assert_eq!(added, [false, true]);

    for user_id in [FIRST, SECOND, SAME] {
        assert_eq!(count_users(&uow, user_id).await?, 1, "user {user_id}");
    }

    Ok(())
}

#[tokio::test]
async fn test_spend() -> Result<()> {
    const USER_ID: Id = 11;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    assert_eq!(UserService::spend(&uow, USER_ID, 1.0).await?, Spend::NotRegistered);

    UserService::add_user(&uow, User::builder().user_id(USER_ID).balance(100.0).build()).await?;
    assert_eq!(
        UserService::spend(&uow, USER_ID, 150.0).await?,
        Spend::NotEnough { balance: 100.0 }
    );
    assert_eq!(
        UserService::spend(&uow, USER_ID, 100.0).await?,
        Spend::Done { balance: 0.0 }
    );

    let user = UserService::get_user(&uow, USER_ID).await?.unwrap();
    assert_eq!(user.balance(), Some(0.0));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_spend() -> Result<()> {
    const USER_ID: Id = 12;

    let db = prepare().await?;
    let uow = db.unit_of_work();

    UserService::add_user(&uow, User::builder().user_id(USER_ID).balance(100.0).build()).await?;

    let (a, b) = tokio::join!(
        UserService::spend(&uow, USER_ID, 60.0),
        UserService::spend(&uow, USER_ID, 60.0),
    );
    let done = [a?, b?]
        .into_iter()
        .filter(|s| matches!(s, Spend::Done { .. }))
        .count();
    assert_eq!(done, 1);

    let user = UserService::get_user(&uow, USER_ID).await?.unwrap();
    assert_eq!(user.balance(), Some(40.0));

    Ok(())
}
