//! In-memory integration tests for task store operations.

use std::sync::Arc;

use super::helpers::{TestStore, create_request, store};
use rstest::rstest;
use taskledger::task::{
    domain::{TaskFilter, TaskPatch, TaskPriority, TaskStatus},
    services::TaskStoreError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_listed_and_retrievable(store: TestStore) -> Result<(), eyre::Report> {
    let created = store.create(create_request("Tidy desk", TaskPriority::Low)).await?;

    let fetched = store.get(created.id()).await?;
    let listed = store.list(&TaskFilter::all()).await?;

    eyre::ensure!(fetched == created, "fetched task differs from created task");
    eyre::ensure!(listed == vec![created], "listing should contain only the new task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_combine_status_and_priority(store: TestStore) -> Result<(), eyre::Report> {
    let high_pending = store.create(create_request("a", TaskPriority::High)).await?;
    let high_done = store.create(create_request("b", TaskPriority::High)).await?;
    store.create(create_request("c", TaskPriority::Low)).await?;
    store
        .update(
            high_done.id(),
            TaskPatch::new().with_status(TaskStatus::Completed),
        )
        .await?;

    let filter = TaskFilter::all()
        .with_status(TaskStatus::Pending)
        .with_priority(TaskPriority::High);
    let found = store.list(&filter).await?;

    eyre::ensure!(found.len() == 1, "expected one task, found {}", found.len());
    eyre::ensure!(
        found.first().map(|task| task.id()) == Some(high_pending.id()),
        "unexpected task matched the filter"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_is_gone_from_every_read(store: TestStore) -> Result<(), eyre::Report> {
    let created = store.create(create_request("Old chore", TaskPriority::Medium)).await?;

    store.delete(created.id()).await?;

    eyre::ensure!(
        matches!(store.get(created.id()).await, Err(TaskStoreError::NotFound(_))),
        "deleted task should not be retrievable"
    );
    eyre::ensure!(
        store.list(&TaskFilter::all()).await?.is_empty(),
        "deleted task should not be listed"
    );
    eyre::ensure!(
        matches!(store.delete(created.id()).await, Err(TaskStoreError::NotFound(_))),
        "second delete should report not found"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_each_record_one_entry(store: TestStore) -> Result<(), eyre::Report> {
    let shared = Arc::new(store);
    let handles: Vec<_> = (0..16)
        .map(|index| {
            let worker = Arc::clone(&shared);
            tokio::spawn(async move {
                worker
                    .create(create_request(&format!("task {index}"), TaskPriority::Medium))
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    for handle in handles {
        created.push(handle.await??);
    }

    let listed = shared.list(&TaskFilter::all()).await?;
    eyre::ensure!(listed.len() == 16, "expected 16 tasks, found {}", listed.len());
    for task in &created {
        let history = shared.recorder().list_for_task(task.id()).await?;
        eyre::ensure!(history.len() == 1, "each task should have one entry");
    }
    Ok(())
}
