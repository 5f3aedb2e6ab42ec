// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::credentials::Credentials;

fn client() -> (FakeTransport, DideWebClient<FakeTransport>) {
    let transport = FakeTransport::new();
    let client = DideWebClient::new(transport.clone(), Credentials::new("bob", "secret"));
    (transport, client)
}

#[test]
fn base64_encoding() {
    assert_eq!(encode64("login"), "bG9naW4=");
    assert_eq!(encode64(""), "");
    assert_eq!(decode64("bG9naW4=").unwrap(), "login");
}

#[test]
fn login_body_is_encoded() {
    let body = body_login(&Credentials::new("bob", "secret"));
    assert_eq!(
        body,
        vec![
            ("us".to_string(), encode64("bob")),
            ("pw".to_string(), encode64("secret")),
            ("hpcfunc".to_string(), encode64("login")),
        ]
    );
}

#[test]
fn submit_body_with_cores() {
    let resources = TaskResources::default().queue("AllNodes").cores(4);
    let body = body_submit(r"\\wpia-hn\share\task_run.bat", "abc", &resources, "wpia-hn");
    let get = |k: &str| body.iter().find(|(n, _)| n == k).map(|(_, v)| v.clone()).unwrap();
    assert_eq!(get("cluster"), encode64("wpia-hn"));
    assert_eq!(get("template"), encode64("AllNodes"));
    assert_eq!(get("jn"), encode64("abc"));
    assert_eq!(get("jobs"), encode64(r"call \\wpia-hn\share\task_run.bat"));
    assert_eq!(get("hpcfunc"), "submit");
    assert_eq!(get("rc"), encode64("4"));
    assert_eq!(get("rt"), encode64("Cores"));
    assert_eq!(get("wd"), "");
    assert!(!body.iter().any(|(n, _)| n == "mem"));
}

#[test]
fn submit_body_exclusive_requests_a_node() {
    let resources = TaskResources::default().queue("AllNodes").cores(8).exclusive(true);
    let body = body_submit("x.bat", "abc", &resources, "wpia-hn");
    assert!(body.contains(&("rc".to_string(), encode64("1"))));
    assert!(body.contains(&("rt".to_string(), encode64("Nodes"))));
}

#[test]
fn submit_body_quotes_paths_with_spaces() {
    let resources = TaskResources::default().queue("AllNodes");
    let body = body_submit(r"\\host\my share\run.bat", "abc", &resources, "wpia-hn");
    assert!(body.contains(&("jobs".to_string(), encode64(r#"call "\\host\my share\run.bat""#))));
}

#[test]
fn cancel_body_lists_ids() {
    let body = body_cancel(&["10".to_string(), "11".to_string()], "wpia-hn");
    assert_eq!(
        body,
        vec![
            ("cluster".to_string(), encode64("wpia-hn")),
            ("hpcfunc".to_string(), encode64("cancel")),
            ("c10".to_string(), "10".to_string()),
            ("c11".to_string(), "11".to_string()),
        ]
    );
}

#[yare::parameterized(
    plain = { r"\\host\share\x.bat", r"\\host\share\x.bat" },
    space = { r"a b", r#""a b""# },
    trailing_backslash = { r"a b\", r#""a b\\""# },
    embedded_quote = { r#"a"b"#, r#"a\"b"# },
    empty = { "", r#""""# },
)]
fn windows_quoting(arg: &str, expected: &str) {
    assert_eq!(windows_quote(arg), expected);
}

#[test]
fn parse_submit_success() {
    assert_eq!(parse_submit("Job has been submitted. ID: 497979.\n").unwrap(), "497979");
}

#[test]
fn parse_submit_failure() {
    let err = parse_submit("<html>login</html>").unwrap_err();
    assert_eq!(err.to_string(), "job submission has failed; could be a login error");
}

#[test]
fn parse_cancel_lines() {
    let map = parse_cancel("10\tOK\n11\tWRONG_STATE\n").unwrap();
    assert_eq!(map.get("10").map(String::as_str), Some("OK"));
    assert_eq!(map.get("11").map(String::as_str), Some("WRONG_STATE"));
}

#[test]
fn parse_log_strips_banner() {
    let value = encode64("Output :\n\nhello\nworld\n");
    let html = format!(r#"<html><input type="hidden" id="res" value="{value}"/></html>"#);
    assert_eq!(parse_log(&html).unwrap(), "hello\nworld\n");
}

#[test]
fn parse_log_ignores_data_attributes() {
    let value = encode64("real output");
    let html = format!(
        r#"<input type="hidden" data-id="res" id="other" value="x"/><input data-value="decoy" id="res" value="{value}"/>"#
    );
    assert_eq!(parse_log(&html).unwrap(), "real output");
}

#[test]
fn parse_log_without_element_fails() {
    assert!(matches!(parse_log("<html></html>"), Err(WebError::Parse { .. })));
}

#[yare::parameterized(
    running = { "Running", TaskStatus::Running },
    finished = { "Finished", TaskStatus::Success },
    queued = { "Queued", TaskStatus::Submitted },
    failed = { "Failed", TaskStatus::Failure },
    canceled = { "Canceled", TaskStatus::Cancelled },
    cancelled = { "Cancelled", TaskStatus::Cancelled },
)]
fn dide_status_words(word: &str, expected: TaskStatus) {
    assert_eq!(parse_dide_status(word).unwrap(), expected);
}

#[test]
fn unknown_dide_status() {
    assert!(matches!(parse_dide_status("Paused"), Err(WebError::UnknownStatus(_))));
}

#[test]
fn parse_status_user_rows() {
    let txt = "489365\tabc\tFinished\t1 core\tDIDE\\bob\t20220926160623\t20220926160624\t20220926160622\tAllNodes\n";
    let rows = parse_status_user(txt).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.dide_id, "489365");
    assert_eq!(row.status, TaskStatus::Success);
    assert_eq!(row.user, "bob");
    assert_eq!(row.template, "AllNodes");
    let expected = Local
        .with_ymd_and_hms(2022, 9, 26, 16, 6, 23)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(row.time_start, expected);
}

#[test]
fn parse_status_user_rejects_short_rows() {
    assert!(parse_status_user("1\t2\t3\n").is_err());
}

#[yare::parameterized(
    none = { &[], "You do not have access to any cluster" },
    one = { &["wpia-hn2"], "You do not have access to 'wpia-hn'; try 'wpia-hn2'" },
    many = { &["a", "b"], "You do not have access to 'wpia-hn'; try one of a, b" },
)]
fn access_messages(valid: &[&str], expected: &str) {
    let valid: Vec<String> = valid.iter().map(|s| s.to_string()).collect();
    assert_eq!(check_access("wpia-hn", &valid).unwrap_err().to_string(), expected);
}

#[test]
fn access_granted() {
    assert!(check_access("wpia-hn", &["wpia-hn".to_string()]).is_ok());
}

#[test]
fn parse_software_both_shapes() {
    let legacy = serde_json::json!({
        "linuxsoftware": [{"name": "R", "version": "4.2.1", "call": "r"}],
        "software": [],
    });
    let sw = parse_software(&legacy).unwrap();
    assert!(sw.linux["r"]["4.2.1"].contains_key("call"));
    assert!(sw.windows.is_empty());

    let current = serde_json::json!({
        "linux": [],
        "windows": [{"name": "Python", "version": "3.11"}, {"name": "python", "version": "3.12"}],
    });
    let sw = parse_software(&current).unwrap();
    assert_eq!(sw.windows["python"].len(), 2);
}

#[tokio::test]
async fn first_request_logs_in() {
    let (transport, mut client) = client();
    transport.respond("_listheadnodes.php", "wpia-hn\n");
    assert_eq!(client.headnodes().await.unwrap(), vec!["wpia-hn"]);
    assert_eq!(transport.paths(), vec!["index.php", "_listheadnodes.php"]);

    client.headnodes().await.unwrap();
    assert_eq!(transport.paths().len(), 3);
    assert!(client.logged_in());
}

#[tokio::test]
async fn submit_returns_job_id() {
    let (transport, mut client) = client();
    transport.respond("submit_1.php", "Job has been submitted. ID: 42.\n");
    let resources = TaskResources::default().queue("AllNodes");
    let id = client.submit(r"\\wpia-hn\x\run.bat", "abc", &resources).await.unwrap();
    assert_eq!(id, "42");
    let requests = transport.requests();
    assert_eq!(requests[1].field("jn"), Some(encode64("abc").as_str()));
}

#[tokio::test]
async fn status_job_uses_query() {
    let (transport, mut client) = client();
    transport.respond("api/v1/get_job_status/", "Running");
    assert_eq!(client.status_job("42").await.unwrap(), TaskStatus::Running);
    let request = &transport.requests()[1];
    assert_eq!(request.method, HttpMethod::Get);
    assert!(request.query.contains(&("jobid".to_string(), "42".to_string())));
}

#[tokio::test]
async fn software_skips_login() {
    let (transport, client) = client();
    transport.respond("api/v1/cluster_software", r#"{"linux": [], "windows": []}"#);
    client.software().await.unwrap();
    assert_eq!(transport.paths(), vec!["api/v1/cluster_software"]);
}

#[tokio::test]
async fn http_errors_propagate() {
    let (transport, mut client) = client();
    transport.respond_with("index.php", HttpResponse { status: 403, body: "no".into() });
    let err = client.headnodes().await.unwrap_err();
    assert!(matches!(err, WebError::Status { status: 403, .. }));
    assert!(!client.logged_in());
}

#[tokio::test]
async fn check_access_against_headnodes() {
    let (transport, mut client) = client();
    transport.respond("_listheadnodes.php", "other\n");
    let err = client.check_access().await.unwrap_err();
    assert_eq!(err.to_string(), "You do not have access to 'wpia-hn'; try 'other'");
}

#[tokio::test]
async fn status_user_lists_jobs_for_state() {
    let (transport, mut client) = client();
    transport.respond(
        "_listalljobs.php",
        "7\tjob\tQueued\t1 core\tDIDE\\bob\t20220926160623\t20220926160624\t20220926160622\tAllNodes\n",
    );
    let rows = client.status_user("*").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, TaskStatus::Submitted);
    assert_eq!(transport.requests()[1].field("state"), Some(encode64("*").as_str()));
}
