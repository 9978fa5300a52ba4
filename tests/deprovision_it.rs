mod common;

// std
use std::time::{Duration as StdDuration, Instant};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use idp_broker::{
	_preludet::*,
	auth::InstanceId,
	config::Configuration,
	credentials::DeprovisionOutcome,
};

fn instance(value: &str) -> InstanceId {
	InstanceId::new(value).expect("Instance fixture should be valid.")
}

#[tokio::test]
async fn deletes_only_clients_owned_by_the_instance() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let list = mock_list_agents(&server, &["abc-1", "abc-2", "abcx-1", "xabc-1", "abc"]).await;
	let owned_1 = mock_delete_agent(&server, "abc-1", 204).await;
	let owned_2 = mock_delete_agent(&server, "abc-2", 200).await;
	let foreign_1 = mock_delete_agent(&server, "abcx-1", 204).await;
	let foreign_2 = mock_delete_agent(&server, "xabc-1", 204).await;
	let foreign_3 = mock_delete_agent(&server, "abc", 204).await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::Ok);

	list.assert_calls_async(1).await;
	owned_1.assert_calls_async(1).await;
	owned_2.assert_calls_async(1).await;
	foreign_1.assert_calls_async(0).await;
	foreign_2.assert_calls_async(0).await;
	foreign_3.assert_calls_async(0).await;
}

#[tokio::test]
async fn one_failure_fails_the_whole_but_every_deletion_runs() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let _list = mock_list_agents(&server, &["abc-1", "abc-2", "abc-3"]).await;
	let first = mock_delete_agent(&server, "abc-1", 204).await;
	let second = mock_delete_agent(&server, "abc-2", 500).await;
	let third = mock_delete_agent(&server, "abc-3", 400).await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::InternalError);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
}

#[tokio::test]
async fn capped_fan_out_still_attempts_every_deletion() {
	let server = MockServer::start_async().await;
	let configuration = Configuration { fan_out_limit: Some(1), ..configuration(&server) };
	let gateway = build_reqwest_test_gateway(configuration);
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let _list = mock_list_agents(&server, &["abc-1", "abc-2", "abc-3"]).await;
	let first = mock_delete_agent(&server, "abc-1", 500).await;
	let second = mock_delete_agent(&server, "abc-2", 204).await;
	let third = mock_delete_agent(&server, "abc-3", 204).await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::InternalError);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deletions_are_in_flight_together() {
	const CLIENTS: usize = 12;
	const DELAY: StdDuration = StdDuration::from_millis(400);

	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let usernames = (0..CLIENTS).map(|idx| format!("abc-{idx}")).collect::<Vec<_>>();
	let _list =
		mock_list_agents(&server, &usernames.iter().map(String::as_str).collect::<Vec<_>>()).await;
	let mut deletions = Vec::with_capacity(CLIENTS);

	for username in &usernames {
		deletions.push(mock_delete_agent_delayed(&server, username, 204, DELAY).await);
	}

	let started = Instant::now();

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::Ok);

	let elapsed = started.elapsed();

	assert!(
		elapsed < DELAY * 4,
		"{CLIENTS} deletions of {DELAY:?} each took {elapsed:?}; they did not overlap."
	);

	for deletion in &deletions {
		deletion.assert_calls_async(1).await;
	}
}

#[tokio::test]
async fn already_removed_clients_count_as_success() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let _list = mock_list_agents(&server, &["abc-1", "abc-2"]).await;
	let first = mock_delete_agent(&server, "abc-1", 400).await;
	let second = mock_delete_agent(&server, "abc-2", 204).await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::Ok);

	first.assert_async().await;
	second.assert_async().await;
}

#[tokio::test]
async fn no_owned_clients_means_no_deletions() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let list = mock_list_agents(&server, &["other-1"]).await;
	let deletions = server
		.mock_async(|when, then| {
			when.method(DELETE);
			then.status(204);
		})
		.await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::Ok);

	list.assert_async().await;
	deletions.assert_calls_async(0).await;
}

#[tokio::test]
async fn listing_failures_abort_before_any_deletion() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate(&server).await;
	let _info = mock_server_info(&server).await;
	let mut list = server
		.mock_async(|when, then| {
			when.method(GET).path("/openam/json/agents");
			then.status(500);
		})
		.await;
	let deletions = server
		.mock_async(|when, then| {
			when.method(DELETE);
			then.status(204);
		})
		.await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::InternalError);

	list.delete_async().await;

	let _garbled = server
		.mock_async(|when, then| {
			when.method(GET).path("/openam/json/agents");
			then.status(200).header("content-type", "application/json").body(r#"{"items":[]}"#);
		})
		.await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::InternalError);

	deletions.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_admin_session_fails_deprovisioning() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(configuration(&server));
	let _auth = mock_authenticate_rejected(&server).await;
	let list = mock_list_agents(&server, &["abc-1"]).await;

	assert_eq!(gateway.deprovision(&instance("abc")).await, DeprovisionOutcome::InternalError);

	list.assert_calls_async(0).await;
}
