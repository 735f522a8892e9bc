//! Successful request flows over HTTP.

use super::helpers::{read, spawn_server, task_body, task_id};
use reqwest::StatusCode;
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() -> Result<(), eyre::Report> {
    let server = spawn_server(&[]).await?;

    let (status, body) = read(server.client.get(server.url("/health")).send().await?).await?;

    eyre::ensure!(status == StatusCode::OK, "unexpected status {status}");
    eyre::ensure!(body == json!({"status": "ok"}), "unexpected body {body}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_ignores_requested_status() -> Result<(), eyre::Report> {
    let server = spawn_server(&[]).await?;
    let mut body = task_body("Pay rent", "High");
    body["status"] = json!("Completed");

    let response = server.client.post(server.url("/tasks")).json(&body).send().await?;
    let (status, envelope) = read(response).await?;

    eyre::ensure!(status == StatusCode::CREATED, "unexpected status {status}");
    eyre::ensure!(envelope["success"] == json!(true), "success flag missing");
    eyre::ensure!(envelope["data"]["status"] == "Pending", "status was not forced");
    eyre::ensure!(envelope["data"]["title"] == "Pay rent", "title not echoed");
    eyre::ensure!(envelope["data"]["dueDate"] == "2025-10-01", "due date not echoed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_counts_and_filters_tasks() -> Result<(), eyre::Report> {
    let server = spawn_server(&[]).await?;
    let first = server.create_task(&task_body("first", "High")).await?;
    server.create_task(&task_body("second", "Low")).await?;
    let third = server.create_task(&task_body("third", "High")).await?;

    let (status, all) = read(server.client.get(server.url("/tasks")).send().await?).await?;
    eyre::ensure!(status == StatusCode::OK, "unexpected status {status}");
    eyre::ensure!(all["count"] == 3, "unexpected count {}", all["count"]);
    eyre::ensure!(all["data"][0]["title"] == "third", "newest task should come first");

    let response = server
        .client
        .get(server.url("/tasks"))
        .query(&[("priority", "High"), ("status", "")])
        .send()
        .await?;
    let (_, high) = read(response).await?;
    let ids: Vec<&str> = high["data"]
        .as_array()
        .map(|tasks| tasks.iter().filter_map(|task| task["id"].as_str()).collect())
        .unwrap_or_default();
    eyre::ensure!(
        ids == vec![task_id(&third)?, task_id(&first)?],
        "unexpected filtered ids {ids:?}"
    );
    eyre::ensure!(high["count"] == 2, "unexpected count {}", high["count"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_is_reflected_in_logs() -> Result<(), eyre::Report> {
    let server = spawn_server(&[]).await?;
    let created = server.create_task(&task_body("A", "Medium")).await?;
    let id = task_id(&created)?;
    let task_url = server.url(&format!("/tasks/{id}"));
    let logs_url = server.url(&format!("/tasks/{id}/logs"));

    let response = server
        .client
        .put(&task_url)
        .json(&json!({"status": "In Progress"}))
        .send()
        .await?;
    let (status, updated) = read(response).await?;
    eyre::ensure!(status == StatusCode::OK, "status change returned {status}");
    eyre::ensure!(updated["data"]["status"] == "In Progress", "status not applied");

    let response = server
        .client
        .put(&task_url)
        .json(&json!({"title": "B"}))
        .send()
        .await?;
    eyre::ensure!(response.status() == StatusCode::OK, "rename failed");

    let (status, fetched) = read(server.client.get(&task_url).send().await?).await?;
    eyre::ensure!(status == StatusCode::OK, "get returned {status}");
    eyre::ensure!(fetched["data"]["title"] == "B", "rename not persisted");

    let (status, deleted) = read(server.client.delete(&task_url).send().await?).await?;
    eyre::ensure!(status == StatusCode::OK, "delete returned {status}");
    eyre::ensure!(
        deleted["message"] == "Task deleted successfully",
        "unexpected delete body {deleted}"
    );

    let (status, logs) = read(server.client.get(&logs_url).send().await?).await?;
    eyre::ensure!(status == StatusCode::OK, "logs returned {status}");
    eyre::ensure!(logs["count"] == 4, "unexpected log count {}", logs["count"]);
    let actions: Vec<&str> = logs["data"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["action"].as_str())
                .collect()
        })
        .unwrap_or_default();
    eyre::ensure!(
        actions == ["Deleted", "Updated", "Status Changed", "Created"],
        "unexpected actions {actions:?}"
    );
    let status_entry: &Value = &logs["data"][2];
    eyre::ensure!(
        status_entry["oldStatus"] == "Pending" && status_entry["newStatus"] == "In Progress",
        "unexpected status entry {status_entry}"
    );
    eyre::ensure!(logs["data"][0]["oldValue"]["title"] == "B", "deleted snapshot stale");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_origin_receives_cors_header() -> Result<(), eyre::Report> {
    let origin = "http://localhost:3000";
    let server = spawn_server(&[origin.to_owned()]).await?;

    let response = server
        .client
        .get(server.url("/tasks"))
        .header(ORIGIN, origin)
        .send()
        .await?;

    let allowed = response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok());
    eyre::ensure!(allowed == Some(origin), "unexpected CORS header {allowed:?}");
    Ok(())
}
