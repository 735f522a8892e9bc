//! Then steps for audit trail BDD scenarios.

use super::world::{AuditTrailWorld, run_async};
use rstest_bdd_macros::then;
use taskledger::activity::domain::{ActivityAction, ActivityLogEntry};
use taskledger::task::{domain::TaskStatus, services::TaskStoreError};

fn latest_entry(world: &AuditTrailWorld) -> Result<ActivityLogEntry, eyre::Report> {
    world
        .history()?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("history is empty"))
}

#[then("the history count is {count:usize}")]
fn history_count(world: &AuditTrailWorld, count: usize) -> Result<(), eyre::Report> {
    let history = world.history()?;
    eyre::ensure!(
        history.len() == count,
        "expected {count} entries, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the latest entry action is "{action}""#)]
fn latest_action(world: &AuditTrailWorld, action: String) -> Result<(), eyre::Report> {
    let expected = ActivityAction::try_from(action.as_str())
        .map_err(|err| eyre::eyre!("invalid expected action in scenario: {err}"))?;
    let latest = latest_entry(world)?;
    eyre::ensure!(
        latest.action() == expected,
        "expected {expected}, found {}",
        latest.action()
    );
    Ok(())
}

#[then(r#"the latest entry records a status change from "{old}" to "{new}""#)]
fn latest_status_change(
    world: &AuditTrailWorld,
    old: String,
    new: String,
) -> Result<(), eyre::Report> {
    let old_status = TaskStatus::try_from(old.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let new_status = TaskStatus::try_from(new.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let change = latest_entry(world)?.change().clone();
    eyre::ensure!(
        change.old_status() == Some(old_status) && change.new_status() == Some(new_status),
        "unexpected latest change {change:?}"
    );
    Ok(())
}

#[then("the update is rejected")]
fn update_rejected(world: &AuditTrailWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_rejection.is_some(),
        "expected the update to be rejected"
    );
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &AuditTrailWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let id = world.current_task()?.id();
    let stored = run_async(world.store.get(id))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the task can no longer be fetched")]
fn task_gone(world: &AuditTrailWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let result = run_async(world.store.get(id));
    eyre::ensure!(
        matches!(result, Err(TaskStoreError::NotFound(_))),
        "expected the task to be gone, got {result:?}"
    );
    Ok(())
}
