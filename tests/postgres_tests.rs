//! Runs against a real PostgreSQL database.
//!
//! Ignored by default. Point `DATABASE_URL` at a scratch database and run
//! `cargo test --test postgres_tests -- --ignored`.

use std::{sync::Arc, time::Duration};

use account_transfer_server::{
    config::Config,
    db,
    error::AppError,
    models::{account::AccountUpdate, money::Money},
    repository::{AccountRepository, PgAccountRepository},
    services::{
        AccountService,
        number_generator::{DEFAULT_ACCOUNT_NUMBER_RANGE, SeededAccountNumbers},
    },
};

/// Connects and migrates, or returns `None` when `DATABASE_URL` is unset.
async fn connect() -> Option<(AccountService, PgAccountRepository)> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = Config::from_vars([("DATABASE_URL".to_string(), url)]).unwrap();

    let pool = db::create_pool(&config).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let repository = PgAccountRepository::new(pool);
    let service = AccountService::new(
        Arc::new(repository.clone()),
        Arc::new(SeededAccountNumbers::new(11, DEFAULT_ACCOUNT_NUMBER_RANGE)),
    )
    .with_retry_backoff(Duration::from_millis(5));
    Some((service, repository))
}

async fn funded(service: &AccountService, name: &str, cents: i64) -> i32 {
    let account = service.create_account(name, "Postgres").await.unwrap();
    let changed = service
        .update_account(AccountUpdate {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: Money::from_cents(cents),
        })
        .await
        .unwrap();
    assert_eq!(changed, 1);
    account.id
}

async fn cents(service: &AccountService, id: i32) -> i64 {
    service.get_account(id).await.unwrap().balance.cents()
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_account_crud_round_trip() {
    let Some((service, _)) = connect().await else {
        return;
    };

    let created = service.create_account("Ada", "Lovelace").await.unwrap();
    let fetched = service.get_account(created.id).await.unwrap();
    assert_eq!(fetched, created);

    assert!(service.list_accounts().await.unwrap().contains(&created));

    assert_eq!(service.delete_account(created.id).await.unwrap(), 1);
    assert!(matches!(
        service.get_account(created.id).await,
        Err(AppError::AccountNotFound(id)) if id == created.id
    ));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_check_constraint_rejects_negative_balance() {
    let Some((service, repository)) = connect().await else {
        return;
    };
    let id = funded(&service, "Negative", 100).await;
    let account = service.get_account(id).await.unwrap();

    // Straight to the repository, past the service's own validation
    let result = repository
        .update_account(&AccountUpdate {
            id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: Money::from_cents(-1),
        })
        .await;

    match result {
        Err(AppError::Database(sqlx::Error::Database(err))) => {
            assert_eq!(err.code().as_deref(), Some("23514"));
        }
        other => panic!("expected check violation, got {other:?}"),
    }
    assert_eq!(cents(&service, id).await, 100);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_insufficient_balance_changes_nothing() {
    let Some((service, _)) = connect().await else {
        return;
    };
    let a = funded(&service, "Poor", 100).await;
    let b = funded(&service, "Rich", 0).await;

    let result = service.transfer(a, b, Money::from_cents(101)).await;

    assert!(matches!(result, Err(AppError::InsufficientBalance(_))));
    assert_eq!(cents(&service, a).await, 100);
    assert_eq!(cents(&service, b).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs DATABASE_URL"]
async fn test_opposite_direction_transfers_conserve_total() {
    let Some((service, _)) = connect().await else {
        return;
    };
    let a = funded(&service, "East", 5_000).await;
    let b = funded(&service, "West", 5_000).await;

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let service = service.clone();
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            tokio::spawn(async move {
                (from, service.transfer(from, to, Money::from_cents(125)).await)
            })
        })
        .collect();

    // Under contention a transfer may still lose its retry; it must then
    // leave both rows alone
    let mut net_a_to_b = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            (from, Ok(_)) if from == a => net_a_to_b += 125,
            (_, Ok(_)) => net_a_to_b -= 125,
            (_, Err(AppError::TransactionConflict)) => {}
            (_, Err(other)) => panic!("unexpected error: {other}"),
        }
    }

    let (after_a, after_b) = (cents(&service, a).await, cents(&service, b).await);
    assert_eq!(after_a + after_b, 10_000);
    assert_eq!(after_a, 5_000 - net_a_to_b);
    assert!(after_a >= 0 && after_b >= 0);
}
