//! Task store lifecycle tests over the `PostgreSQL` adapters.

use crate::postgres::helpers::{
    create_request, prepare_database, shared_test_cluster, test_runtime,
};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::rstest;
use taskledger::activity::domain::{ActivityAction, ActivityChange};
use taskledger::task::{
    domain::{TaskFilter, TaskPatch, TaskPriority, TaskStatus},
    services::TaskStoreError,
};

#[rstest]
fn created_task_equals_what_a_later_read_returns(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "store_create_get")?;
    let store = db.store();
    let rt = test_runtime()?;

    let created = rt.block_on(store.create(create_request("Water plants", TaskPriority::Low)))?;
    let fetched = rt.block_on(store.get(created.id()))?;
    let history = rt.block_on(store.recorder().list_for_task(created.id()))?;

    eyre::ensure!(fetched == created, "get returned {fetched:?}, create returned {created:?}");
    let [entry] = history.as_slice() else {
        return Err(eyre::eyre!("expected one entry, got {history:?}"));
    };
    eyre::ensure!(
        entry.change().new_value() == Some(&fetched),
        "snapshot disagrees with the stored row"
    );
    Ok(())
}

#[rstest]
fn full_lifecycle_is_recorded_newest_first(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "store_lifecycle")?;
    let store = db.store();
    let rt = test_runtime()?;

    let created = rt.block_on(store.create(create_request("Draft", TaskPriority::Medium)))?;
    let id = created.id();
    rt.block_on(store.update(id, TaskPatch::new().with_status(TaskStatus::InProgress)))?;
    let renamed = rt.block_on(store.update(id, TaskPatch::new().with_title("Final")))?;
    let removed = rt.block_on(store.delete(id))?;
    let lookup = rt.block_on(store.get(id));
    let history = rt.block_on(store.recorder().list_for_task(id))?;

    eyre::ensure!(removed == renamed, "delete returned {removed:?}");
    eyre::ensure!(
        matches!(lookup, Err(TaskStoreError::NotFound(missing)) if missing == id),
        "deleted task still readable: {lookup:?}"
    );
    let actions: Vec<ActivityAction> = history.iter().map(|entry| entry.action()).collect();
    eyre::ensure!(
        actions
            == [
                ActivityAction::Deleted,
                ActivityAction::Updated,
                ActivityAction::StatusChanged,
                ActivityAction::Created,
            ],
        "unexpected actions {actions:?}"
    );
    let [deleted, updated, ..] = history.as_slice() else {
        return Err(eyre::eyre!("expected four entries"));
    };
    eyre::ensure!(
        matches!(deleted.change(), ActivityChange::Deleted { old_value } if **old_value == renamed),
        "deleted entry should hold the last stored state"
    );
    eyre::ensure!(
        updated.change().old_value().map(|task| task.title()) == Some("Draft")
            && updated.change().new_value() == Some(&renamed),
        "updated entry should hold both snapshots"
    );
    Ok(())
}

#[rstest]
fn listing_reflects_updates_made_through_the_store(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "store_listing")?;
    let store = db.store();
    let rt = test_runtime()?;
    let first = rt.block_on(store.create(create_request("first", TaskPriority::High)))?;
    rt.block_on(store.create(create_request("second", TaskPriority::High)))?;
    rt.block_on(store.update(first.id(), TaskPatch::new().with_status(TaskStatus::Completed)))?;

    let completed = rt.block_on(store.list(&TaskFilter::all().with_status(TaskStatus::Completed)))?;
    let everything = rt.block_on(store.list(&TaskFilter::all()))?;

    let completed_titles: Vec<&str> = completed.iter().map(|task| task.title()).collect();
    let all_titles: Vec<&str> = everything.iter().map(|task| task.title()).collect();
    eyre::ensure!(completed_titles == ["first"], "completed: {completed_titles:?}");
    eyre::ensure!(all_titles == ["second", "first"], "all: {all_titles:?}");
    Ok(())
}
