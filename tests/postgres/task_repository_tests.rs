//! Task repository tests against `PostgreSQL`.

use crate::postgres::helpers::{
    at, due_date, persisted_task, prepare_database, shared_test_cluster, test_runtime,
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::rstest;
use taskledger::task::{
    domain::{Task, TaskCategory, TaskDetails, TaskFilter, TaskId, TaskPriority, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};

fn new_task(title: &str) -> eyre::Result<Task> {
    let details = TaskDetails::new(
        title,
        "stored through diesel",
        TaskCategory::Shopping,
        TaskPriority::Medium,
        due_date(),
    )?;
    Ok(Task::create(details, &DefaultClock))
}

#[rstest]
fn stored_task_reads_back_identically(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_round_trip")?;
    let rt = test_runtime()?;
    let task = new_task("Buy paint")?;

    rt.block_on(db.tasks.store(&task))?;
    let fetched = rt
        .block_on(db.tasks.find_by_id(task.id()))?
        .ok_or_else(|| eyre::eyre!("stored task should be found"))?;

    eyre::ensure!(fetched == task, "read back {fetched:?}, stored {task:?}");
    eyre::ensure!(
        fetched.created_at() == task.created_at(),
        "timestamps must survive TIMESTAMPTZ storage unchanged"
    );
    Ok(())
}

#[rstest]
fn find_by_id_returns_none_for_missing(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_missing")?;
    let rt = test_runtime()?;

    let found = rt.block_on(db.tasks.find_by_id(TaskId::new()))?;

    eyre::ensure!(found.is_none(), "unexpected row {found:?}");
    Ok(())
}

#[rstest]
fn storing_the_same_id_twice_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_duplicate")?;
    let rt = test_runtime()?;
    let task = new_task("Buy brushes")?;
    rt.block_on(db.tasks.store(&task))?;

    let result = rt.block_on(db.tasks.store(&task));

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "unexpected result {result:?}"
    );
    Ok(())
}

#[rstest]
fn updating_a_missing_task_reports_not_found(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_update_missing")?;
    let rt = test_runtime()?;
    let task = new_task("Never stored")?;

    let result = rt.block_on(db.tasks.update(&task));

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == task.id()),
        "unexpected result {result:?}"
    );
    Ok(())
}

#[rstest]
fn list_is_newest_first_with_ties_broken_by_insertion(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_ordering")?;
    let rt = test_runtime()?;
    let oldest = persisted_task("oldest", TaskStatus::Pending, TaskPriority::Low, at(0));
    let tied_first = persisted_task("tied first", TaskStatus::Pending, TaskPriority::Low, at(60));
    let tied_second = persisted_task("tied second", TaskStatus::Pending, TaskPriority::Low, at(60));
    for task in [&tied_first, &oldest, &tied_second] {
        rt.block_on(db.tasks.store(task))?;
    }

    let listed = rt.block_on(db.tasks.list(&TaskFilter::all()))?;

    let titles: Vec<&str> = listed.iter().map(Task::title).collect();
    eyre::ensure!(
        titles == ["tied second", "tied first", "oldest"],
        "unexpected order {titles:?}"
    );
    Ok(())
}

#[rstest]
#[case::status(TaskFilter::all().with_status(TaskStatus::Completed), &["done high", "done low"])]
#[case::priority(TaskFilter::all().with_priority(TaskPriority::High), &["done high", "open high"])]
#[case::both(
    TaskFilter::all()
        .with_status(TaskStatus::Completed)
        .with_priority(TaskPriority::High),
    &["done high"]
)]
fn list_applies_filters_in_sql(
    shared_test_cluster: &'static TestCluster,
    #[case] filter: TaskFilter,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_filters")?;
    let rt = test_runtime()?;
    let seeded = [
        persisted_task("open high", TaskStatus::InProgress, TaskPriority::High, at(0)),
        persisted_task("done low", TaskStatus::Completed, TaskPriority::Low, at(10)),
        persisted_task("done high", TaskStatus::Completed, TaskPriority::High, at(20)),
    ];
    for task in &seeded {
        rt.block_on(db.tasks.store(task))?;
    }

    let listed = rt.block_on(db.tasks.list(&filter))?;

    let titles: Vec<&str> = listed.iter().map(Task::title).collect();
    eyre::ensure!(titles == expected, "unexpected titles {titles:?}");
    Ok(())
}

#[rstest]
fn delete_returns_the_removed_row(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let db = prepare_database(shared_test_cluster, "task_delete")?;
    let rt = test_runtime()?;
    let task = new_task("Return ladder")?;
    rt.block_on(db.tasks.store(&task))?;

    let removed = rt.block_on(db.tasks.delete(task.id()))?;
    let second_attempt = rt.block_on(db.tasks.delete(task.id()));
    let remaining = rt.block_on(db.tasks.find_by_id(task.id()))?;

    eyre::ensure!(removed == task, "delete returned {removed:?}");
    eyre::ensure!(
        matches!(second_attempt, Err(TaskRepositoryError::NotFound(id)) if id == task.id()),
        "second delete returned {second_attempt:?}"
    );
    eyre::ensure!(remaining.is_none(), "row still present");
    Ok(())
}
