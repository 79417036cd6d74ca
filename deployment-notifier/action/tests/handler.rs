mod common;

use std::time::Duration;

use deployment_notifier_action::{api_client, handle, process, Error, Settings, StaticSecrets};
use deployment_notifier_core::poll::PollPolicy;
use notification::smtp::Connection;
use serde_json::json;

use self::common::{deployment, inputs, now, request, secrets, FakeApi, RecordingMailer};

#[tokio::test]
async fn test_deleted_deployment_notification() {
    let api = FakeApi::new(deployment("UNDEPLOYED", json!([])));
    let mailer = RecordingMailer::default();

    let report = process(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("DESTROY_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    let html = &report.email.html;
    assert!(html.contains("Your request to delete the deployment <strong>web-01</strong>"));
    assert!(html.contains("Deployment created at: <strong> 2021-12-22 14:15:30 </strong>"));
    assert!(html.contains("Deployment deleted at: <strong> 2021-12-23 12:00:00 </strong>"));
    assert!(html.contains("Deployment status: <strong> UNDEPLOYED </strong>"));
    assert!(!html.contains("Resources Details:"));

    assert_eq!(
        report.outputs.message_subject,
        "UNDEPLOYED - Status of deployment web-01 by Cloud Portal"
    );
    assert_eq!(report.email.to, "jane@example.com");
    assert_eq!(report.email.from, "noreply@example.com");
    assert_eq!(report.delivered, Some(true));

    assert_eq!(mailer.servers(), vec![("smtp.example.com".to_string(), 465)]);
    assert_eq!(
        mailer.attempts(),
        vec![(Connection::ImplicitTls, false), (Connection::Plaintext, false)]
    );
    assert!(mailer.messages().iter().all(|message| message.contains("jane@example.com")));

    assert_eq!(
        api.calls(),
        vec![
            "about",
            "project proj-1",
            "property-groups notifications",
            "deployment dep-1",
            "request req-1",
            "user 8c2f org-1",
        ]
    );
}

#[tokio::test]
async fn test_completed_deployment_lists_resources() {
    let mut api = FakeApi::new(deployment(
        "CREATE_SUCCESSFUL",
        json!([
            {
                "id": "net-1",
                "name": "Cloud_NSX_Network_1",
                "type": "Cloud.NSX.Network",
                "state": "OK",
                "createdAt": "2021-12-22T10:16:00.000Z",
                "properties": { "resourceName": "provider-net-0042" }
            },
            {
                "id": "vm-1",
                "name": "Cloud_vSphere_Machine_1",
                "type": "Cloud.vSphere.Machine",
                "state": "OK",
                "createdAt": "2021-12-22T10:17:00.000Z",
                "properties": { "resourceName": "web-01-mcm" }
            }
        ]),
    ));
    let _unused = api.resources.insert(
        "vm-1".to_string(),
        json!({
            "properties": {
                "address": "10.0.0.12",
                "cpuCount": 2,
                "totalMemoryMB": 4096,
                "storage": {
                    "disks": [
                        { "name": "boot", "type": "HDD", "capacityGb": 40 },
                        { "name": "data", "type": "HDD", "capacityGb": 100 },
                        { "name": "logs", "type": "HDD", "capacityGb": 20 }
                    ]
                }
            }
        }),
    );
    let mailer = RecordingMailer::default();

    let outputs = handle(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
    )
    .await
    .unwrap();

    let outputs = serde_json::to_value(&outputs).unwrap();
    let resources = &outputs["depInfoAndRes"]["Resources"];
    assert_eq!(resources["Cloud_NSX_Network_1"]["Name"], "Cloud_NSX_Network_1");
    assert_eq!(resources["Cloud_NSX_Network_1"]["started At"], "2021-12-22 14:16:00");
    assert!(resources["Cloud_NSX_Network_1"].get("IP Address").is_none());

    let machine = &resources["web-01-mcm"];
    assert_eq!(machine["IP Address"], "10.0.0.12");
    assert_eq!(machine["CPU count"], 2);
    assert_eq!(machine["Operating System"], "");
    assert_eq!(machine["disk 0"]["Name"], "boot");
    assert_eq!(machine["disk 2"]["Capacity GB"], 20);
    assert!(machine.get("disk 3").is_none());

    assert_eq!(outputs["depInfoAndRes"]["requestDetails"], "No additional details.");
    assert_eq!(outputs["depInfoAndRes"]["requestStatus"], "SUCCESSFUL");
    assert_eq!(outputs["depInfoAndRes"]["leaseExpireAt"], "2022-01-22 14:15:30");
    assert_eq!(outputs["depInfoAndRes"]["lastUpdatedAt"], "2021-12-22 14:45:00");
    assert_eq!(
        outputs["depInfoAndRes"]["proGrpContent"]["platform_name"]["const"],
        "Cloud Portal"
    );
    assert_eq!(
        outputs["messageSubject"],
        "CREATE_SUCCESSFUL - Status of deployment web-01 by Cloud Portal"
    );
    assert_eq!(api.count("resource vm-1"), 1);
    assert_eq!(api.count("resource net-1"), 0);
}

#[tokio::test]
async fn test_failed_request_keeps_deployment_status() {
    let api = FakeApi::new(deployment("CREATE_FAILED", json!([])));
    *api.requests.lock().unwrap() =
        [json!({ "completedTasks": 3, "status": "FAILED", "details": "Quota exceeded" })].into();

    let report = process(
        &api,
        &secrets(),
        &RecordingMailer::default(),
        &inputs(Some("UPDATE_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    assert!(report.email.html.contains("has failed."));
    assert!(report.email.html.contains("Deployment status: <strong> CREATE_FAILED </strong>"));
    assert!(report.email.html.contains("Request details: <strong> Quota exceeded </strong>"));
    assert_eq!(report.outputs.record.request_status, "FAILED");
}

#[tokio::test]
async fn test_unrecognized_event_fails_without_side_effects() {
    let api = FakeApi::new(deployment("CREATE_SUCCESSFUL", json!([])));
    let mailer = RecordingMailer::default();

    let error = handle(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("DESTROY_DEPLOYMENT"), "deployment.request.pre"),
        &Settings::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, Error::UnrecognizedEvent { .. }));
    assert!(error.to_string().starts_with("Unrecognized event type!"));
    assert!(api.calls().is_empty());
    assert!(mailer.attempts().is_empty());
}

#[tokio::test]
async fn test_unreachable_api_stops_the_invocation() {
    let mut api = FakeApi::new(deployment("CREATE_SUCCESSFUL", json!([])));
    api.reachable = false;
    let mailer = RecordingMailer::default();

    let error = handle(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        error,
        Error::AutomationApi { source: api_client::Error::ApiUnreachable { .. } }
    ));
    assert!(error.to_string().contains("maintenance"));
    assert_eq!(api.calls(), vec!["about"]);
    assert!(mailer.attempts().is_empty());
}

#[tokio::test]
async fn test_request_received_waits_for_pending_approval() {
    let api = FakeApi::new(deployment("CREATE_INPROGRESS", json!([])));
    *api.requests.lock().unwrap() =
        [request(1, "IN_PROGRESS"), request(2, "IN_PROGRESS"), request(2, "APPROVAL_PENDING")]
            .into();

    let report = process(
        &api,
        &secrets(),
        &RecordingMailer::default(),
        &inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.pre"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    assert_eq!(api.count("request req-1"), 3);
    assert_eq!(report.outputs.record.status, "APPROVAL_PENDING");
    assert!(report.email.html.contains("is pending for approval."));
    assert!(report.email.html.contains("<tr><th>Node Size</th><td>medium</td></tr>"));
    assert!(report.email.html.contains("<tr><th>Operating System</th><td>Ubuntu 20.04</td></tr>"));
    assert!(report.email.html.contains("<tr><th>costCenter</th><td>CC-42</td></tr>"));
    assert!(!report.email.html.contains("Daily Price Estimate"));
    assert!(report.outputs.message_subject.starts_with("APPROVAL_PENDING - "));
}

#[tokio::test]
async fn test_request_received_past_approval_is_in_progress() {
    let api = FakeApi::new(deployment("CREATE_INPROGRESS", json!([])));
    *api.requests.lock().unwrap() = [request(1, "IN_PROGRESS"), request(4, "IN_PROGRESS")].into();

    let report = process(
        &api,
        &secrets(),
        &RecordingMailer::default(),
        &inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.pre"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    assert_eq!(api.count("request req-1"), 2);
    assert_eq!(report.outputs.record.status, "CREATE_INPROGRESS");
    assert!(report.email.html.contains("has been received and is in progress."));
}

#[tokio::test]
async fn test_bounded_approval_wait_gives_up() {
    let api = FakeApi::new(deployment("CREATE_INPROGRESS", json!([])));
    *api.requests.lock().unwrap() = [request(1, "IN_PROGRESS")].into();

    let mut settings = Settings::default();
    settings.config.polling.approval = PollPolicy::new(Some(3), Duration::from_millis(1));

    let error = handle(
        &api,
        &secrets(),
        &RecordingMailer::default(),
        &inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.pre"),
        &settings,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, Error::PollingExhausted { attempts: 3, .. }));
    assert_eq!(api.count("request req-1"), 4);
}

#[tokio::test]
async fn test_catalog_request_adds_daily_price() {
    let api = FakeApi::new(deployment("CREATE_INPROGRESS", json!([])));
    *api.requests.lock().unwrap() = [request(5, "IN_PROGRESS")].into();
    *api.prices.lock().unwrap() = [
        json!({ "status": "IN_PROGRESS" }),
        json!({ "status": "SUCCESS", "dailyTotalPrice": 12.3456 }),
    ]
    .into();

    let mut inputs = inputs(Some("CREATE_DEPLOYMENT"), "deployment.request.pre");
    inputs.request_type = Some("CATALOG".to_string());
    inputs.catalog_item_id = Some("item-7".to_string());
    inputs.catalog_item_version = Some("3".to_string());

    let mut settings = Settings::default();
    settings.config.render.price_currency = "EUR".to_string();

    let report =
        process(&api, &secrets(), &RecordingMailer::default(), &inputs, &settings, now())
            .await
            .unwrap();

    assert!(report
        .email
        .html
        .contains("<tr><th>Daily Price Estimate</th><td>EUR 12.34</td></tr>"));
    assert_eq!(api.count("upfront-price item-7 price-1"), 2);

    let price_requests = api.price_requests.lock().unwrap();
    assert_eq!(price_requests.len(), 1);
    assert_eq!(price_requests[0].bulk_request_count, "1");
    assert_eq!(price_requests[0].deployment_name, "web-01 - Daily Price Estimate");
    assert_eq!(price_requests[0].project_id, "proj-1");
    assert_eq!(price_requests[0].version.as_deref(), Some("3"));
    assert_eq!(price_requests[0].inputs["costCenter"], "CC-42");
}

#[tokio::test]
async fn test_lease_expiry_is_reported_for_the_creator() {
    let api = FakeApi::new(deployment("CREATE_SUCCESSFUL", json!([])));

    let mut inputs = inputs(None, "deployment.action.pre");
    inputs.user_name = "system-user".to_string();
    inputs.action_name = Some("Expire".to_string());

    let settings = Settings::default();
    let report =
        process(&api, &secrets(), &RecordingMailer::default(), &inputs, &settings, now())
            .await
            .unwrap();

    assert_eq!(report.outputs.record.status, "LEASE_EXPIRED");
    assert_eq!(report.outputs.record.requestor_name.as_deref(), Some("jane"));
    assert!(report.email.html.contains("Your deployment <strong>web-01</strong> has expired."));
    assert!(report
        .email
        .html
        .contains("Deployment lease expires: <strong> 2022-01-22 14:15:30 </strong>"));
    assert_eq!(
        report.outputs.message_subject,
        "LEASE_EXPIRED - Status of deployment web-01 by Cloud Portal"
    );
}

#[tokio::test]
async fn test_authentication_failure_does_not_fail_the_invocation() {
    let mut api = FakeApi::new(deployment("UNDEPLOYED", json!([])));
    let _unused = api
        .property_group
        .as_object_mut()
        .unwrap()
        .insert("smtp_authenticated".to_string(), json!({ "const": "yes" }));
    let mailer = RecordingMailer::failing(notification::Error::Authentication {
        message: "535 5.7.8 authentication failed".to_string(),
    });

    let report = process(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("DESTROY_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    assert_eq!(report.delivered, Some(false));
    assert_eq!(mailer.attempts(), vec![(Connection::ImplicitTls, true)]);
}

#[tokio::test]
async fn test_ssl_delivery_counts_despite_plaintext_followup_failure() {
    let api = FakeApi::new(deployment("UNDEPLOYED", json!([])));
    let mailer = RecordingMailer::failing_on(
        Connection::Plaintext,
        notification::Error::Disconnected { message: "connection closed".to_string() },
    );

    let report = process(
        &api,
        &secrets(),
        &mailer,
        &inputs(Some("DESTROY_DEPLOYMENT"), "deployment.request.post"),
        &Settings::default(),
        now(),
    )
    .await
    .unwrap();

    assert_eq!(report.delivered, Some(true));
    assert_eq!(
        mailer.attempts(),
        vec![(Connection::ImplicitTls, false), (Connection::Plaintext, false)]
    );
}

#[tokio::test]
async fn test_dry_run_does_not_mail() {
    let api = FakeApi::new(deployment("UNDEPLOYED", json!([])));
    let mailer = RecordingMailer::default();
    let settings = Settings { dry_run: true, ..Settings::default() };

    let report = process(
        &api,
        &StaticSecrets::default(),
        &mailer,
        &inputs(Some("DESTROY_DEPLOYMENT"), "deployment.request.post"),
        &settings,
        now(),
    )
    .await
    .unwrap();

    assert_eq!(report.delivered, None);
    assert!(mailer.attempts().is_empty());
    assert!(mailer.servers().is_empty());
}
