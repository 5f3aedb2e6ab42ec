// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the DIDE cluster web portal.
//!
//! The portal is a set of PHP pages that take base64-encoded form fields and
//! answer with ad-hoc plain text, HTML fragments or JSON. Request bodies are
//! built and responses parsed by pure functions, so the exact wire format is
//! testable without a network.

mod transport;

pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_BASE_URL,
};
#[cfg(any(test, feature = "test-support"))]
pub use transport::FakeTransport;

use crate::credentials::Credentials;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use hc_core::{TaskResources, TaskStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Cluster (head node) jobs are submitted to
pub const DEFAULT_CLUSTER: &str = "wpia-hn";

/// Version tag reported to the portal with each submission
pub const CLIENT_TAG: &str = "hipercow-rs";

#[derive(Debug, Error)]
pub enum WebError {
    #[error("http request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("request to '{path}' failed with status {status}")]
    Status { path: String, status: u16, body: String },
    #[error("job submission has failed; could be a login error")]
    SubmitFailed { response: String },
    #[error("unknown job status '{0}'")]
    UnknownStatus(String),
    #[error("failed to parse {what} response: {detail}")]
    Parse { what: &'static str, detail: String },
    #[error("{0}")]
    Access(String),
}

impl WebError {
    fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        WebError::Parse { what, detail: detail.into() }
    }
}

pub fn encode64(x: &str) -> String {
    STANDARD.encode(x.as_bytes())
}

pub fn decode64(x: &str) -> Result<String, WebError> {
    let bytes = STANDARD.decode(x.trim()).map_err(|e| WebError::parse("base64", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| WebError::parse("base64", e.to_string()))
}

/// One row of the per-user job listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DideTaskStatus {
    pub dide_id: String,
    pub name: String,
    pub status: TaskStatus,
    pub resources: String,
    pub user: String,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub time_submit: DateTime<Utc>,
    pub template: String,
}

/// Software catalogue: platform → lowercase name → version → details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Software {
    pub linux: SoftwareList,
    pub windows: SoftwareList,
}

pub type SoftwareList = BTreeMap<String, BTreeMap<String, serde_json::Map<String, serde_json::Value>>>;

/// Session with the portal.
///
/// Every request except login, logout and the software catalogue logs in
/// first if this session has not done so yet.
pub struct DideWebClient<T: HttpTransport> {
    transport: T,
    credentials: Credentials,
    cluster: String,
    logged_in: bool,
}

impl<T: HttpTransport> DideWebClient<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self { transport, credentials, cluster: DEFAULT_CLUSTER.to_string(), logged_in: false }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    async fn request(&mut self, request: HttpRequest) -> Result<String, WebError> {
        if !self.logged_in {
            self.login().await?;
        }
        Ok(self.transport.send(request).await?.body)
    }

    pub async fn login(&mut self) -> Result<(), WebError> {
        let form = body_login(&self.credentials);
        self.transport.send(HttpRequest::post("index.php", form)).await?;
        self.logged_in = true;
        tracing::debug!(user = %self.credentials.username, "logged in to portal");
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), WebError> {
        self.transport.send(HttpRequest::get("logout.php", Vec::new())).await?;
        self.logged_in = false;
        Ok(())
    }

    /// Clusters this user may submit to
    pub async fn headnodes(&mut self) -> Result<Vec<String>, WebError> {
        let form = vec![field("user", &encode64(""))];
        let body = self.request(HttpRequest::post("_listheadnodes.php", form)).await?;
        Ok(parse_headnodes(&body))
    }

    pub async fn check_access(&mut self) -> Result<(), WebError> {
        let valid = self.headnodes().await?;
        check_access(&self.cluster, &valid)
    }

    /// Submit the batch file at `path` (a UNC path); returns the job id
    pub async fn submit(
        &mut self,
        path: &str,
        name: &str,
        resources: &TaskResources,
    ) -> Result<String, WebError> {
        let form = body_submit(path, name, resources, &self.cluster);
        let body = self.request(HttpRequest::post("submit_1.php", form)).await?;
        let id = parse_submit(&body)?;
        tracing::info!(dide_id = %id, job_name = name, "submitted job to cluster");
        Ok(id)
    }

    /// Cancel jobs; returns each id's outcome message
    pub async fn cancel(&mut self, dide_ids: &[String]) -> Result<BTreeMap<String, String>, WebError> {
        let form = body_cancel(dide_ids, &self.cluster);
        let body = self.request(HttpRequest::post("cancel.php", form)).await?;
        parse_cancel(&body)
    }

    /// Scheduler-side log of a job
    pub async fn log(&mut self, dide_id: &str) -> Result<String, WebError> {
        let form = body_log(dide_id, &self.cluster);
        let body = self.request(HttpRequest::post("showjobfail.php", form)).await?;
        parse_log(&body)
    }

    /// All of this user's jobs in `state` (`*` for any)
    pub async fn status_user(&mut self, state: &str) -> Result<Vec<DideTaskStatus>, WebError> {
        let form = body_status_user(state, &self.credentials.username, &self.cluster);
        let body = self.request(HttpRequest::post("_listalljobs.php", form)).await?;
        parse_status_user(&body)
    }

    pub async fn status_job(&mut self, dide_id: &str) -> Result<TaskStatus, WebError> {
        let query = vec![field("scheduler", &self.cluster), field("jobid", dide_id)];
        let body = self.request(HttpRequest::get("api/v1/get_job_status/", query)).await?;
        parse_status_job(&body)
    }

    /// Software catalogue; needs no login
    pub async fn software(&self) -> Result<Software, WebError> {
        let response = self.transport.send(HttpRequest::get("api/v1/cluster_software", Vec::new())).await?;
        let json: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| WebError::parse("software", e.to_string()))?;
        parse_software(&json)
    }
}

fn field(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

pub fn body_login(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        field("us", &encode64(&credentials.username)),
        field("pw", &encode64(&credentials.password)),
        field("hpcfunc", &encode64("login")),
    ]
}

/// Form for `submit_1.php`. `resources` must already be validated, so that
/// its queue is a concrete template name.
pub fn body_submit(
    path: &str,
    name: &str,
    resources: &TaskResources,
    cluster: &str,
) -> Vec<(String, String)> {
    let template = resources.queue.as_deref().unwrap_or("AllNodes");
    let call = format!("call {}", windows_quote(path));
    let mut form = vec![
        field("cluster", &encode64(cluster)),
        field("template", &encode64(template)),
        field("jn", &encode64(name)),
        field("wd", &encode64("")),
        field("se", &encode64("")),
        field("so", &encode64("")),
        field("jobs", &encode64(&call)),
        field("dep", &encode64("")),
        field("hpcfunc", "submit"),
        field("ver", &encode64(CLIENT_TAG)),
    ];
    if resources.exclusive {
        form.push(field("rc", &encode64("1")));
        form.push(field("rt", &encode64("Nodes")));
    } else {
        form.push(field("rc", &encode64(&resources.cores.to_string())));
        form.push(field("rt", &encode64("Cores")));
    }
    if let Some(mem) = resources.memory_per_node {
        form.push(field("mem", &encode64(&mem.to_string())));
    }
    if let Some(ram) = resources.memory_per_task {
        form.push(field("ram", &encode64(&ram.to_string())));
    }
    if let Some(runtime) = resources.max_runtime {
        form.push(field("rnt", &encode64(&runtime.to_string())));
    }
    form
}

pub fn body_cancel(dide_ids: &[String], cluster: &str) -> Vec<(String, String)> {
    let mut form = vec![field("cluster", &encode64(cluster)), field("hpcfunc", &encode64("cancel"))];
    form.extend(dide_ids.iter().map(|id| (format!("c{id}"), id.clone())));
    form
}

pub fn body_log(dide_id: &str, cluster: &str) -> Vec<(String, String)> {
    vec![field("cluster", &encode64(cluster)), field("hpcfunc", "showfail"), field("id", dide_id)]
}

pub fn body_status_user(state: &str, username: &str, cluster: &str) -> Vec<(String, String)> {
    vec![
        field("user", &encode64(username)),
        field("scheduler", &encode64(cluster)),
        field("state", &encode64(state)),
        field("jobs", &encode64("-1")),
    ]
}

/// Quote one argument the way the Windows C runtime parses command lines
pub fn windows_quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty() || arg.contains([' ', '\t']);
    let mut out = String::new();
    if needs_quotes {
        out.push('"');
    }
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.push_str(&"\\".repeat(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            c => {
                out.push_str(&"\\".repeat(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    if needs_quotes {
        out.push_str(&"\\".repeat(backslashes * 2));
        out.push('"');
    } else {
        out.push_str(&"\\".repeat(backslashes));
    }
    out
}

pub fn parse_headnodes(txt: &str) -> Vec<String> {
    txt.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect()
}

pub fn check_access(cluster: &str, valid: &[String]) -> Result<(), WebError> {
    if valid.iter().any(|v| v == cluster) {
        return Ok(());
    }
    let msg = match valid {
        [] => "You do not have access to any cluster".to_string(),
        [only] => format!("You do not have access to '{cluster}'; try '{only}'"),
        many => format!("You do not have access to '{cluster}'; try one of {}", many.join(", ")),
    };
    Err(WebError::Access(msg))
}

#[allow(clippy::expect_used)]
static SUBMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Job has been submitted\. ID: +([0-9]+)\.$").expect("constant regex pattern is valid")
});

pub fn parse_submit(txt: &str) -> Result<String, WebError> {
    SUBMIT_PATTERN
        .captures(txt.trim())
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| WebError::SubmitFailed { response: txt.to_string() })
}

pub fn parse_cancel(txt: &str) -> Result<BTreeMap<String, String>, WebError> {
    txt.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| {
            line.split_once('\t')
                .map(|(id, msg)| (id.to_string(), msg.to_string()))
                .ok_or_else(|| WebError::parse("cancel", line))
        })
        .collect()
}

#[allow(clippy::expect_used)]
static LOG_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input\b[^>]*\sid\s*=\s*"res"[^>]*>"#).expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static VALUE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\svalue\s*=\s*"([^"]*)""#).expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static OUTPUT_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Output\s*:\s*?\n+").expect("constant regex pattern is valid"));

/// Extract the log text from the hidden `res` input of `showjobfail.php`
pub fn parse_log(txt: &str) -> Result<String, WebError> {
    let input = LOG_INPUT.find(txt).ok_or_else(|| WebError::parse("log", "no 'res' element"))?;
    let value = VALUE_ATTR
        .captures(input.as_str())
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| WebError::parse("log", "'res' element has no value"))?;
    let output = decode64(&value)?;
    Ok(OUTPUT_BANNER.replace(&output, "").into_owned())
}

pub fn parse_status_user(txt: &str) -> Result<Vec<DideTaskStatus>, WebError> {
    txt.lines().map(str::trim).filter(|l| !l.is_empty()).map(parse_status_row).collect()
}

fn parse_status_row(row: &str) -> Result<DideTaskStatus, WebError> {
    let els: Vec<&str> = row.split('\t').collect();
    let [dide_id, name, status, resources, user, start, end, submit, template] = els.as_slice() else {
        return Err(WebError::parse("job status", format!("expected 9 columns: '{row}'")));
    };
    Ok(DideTaskStatus {
        dide_id: dide_id.to_string(),
        name: name.to_string(),
        status: parse_dide_status(status)?,
        resources: resources.to_string(),
        user: user.strip_prefix("DIDE\\").unwrap_or(user).to_string(),
        time_start: parse_dide_timestamp(start)?,
        time_end: parse_dide_timestamp(end)?,
        time_submit: parse_dide_timestamp(submit)?,
        template: template.to_string(),
    })
}

pub fn parse_status_job(txt: &str) -> Result<TaskStatus, WebError> {
    parse_dide_status(txt.trim())
}

/// Map the scheduler's status vocabulary onto task statuses
pub fn parse_dide_status(word: &str) -> Result<TaskStatus, WebError> {
    match word {
        "Running" => Ok(TaskStatus::Running),
        "Finished" => Ok(TaskStatus::Success),
        "Queued" => Ok(TaskStatus::Submitted),
        "Failed" => Ok(TaskStatus::Failure),
        "Canceled" | "Cancelled" => Ok(TaskStatus::Cancelled),
        other => Err(WebError::UnknownStatus(other.to_string())),
    }
}

/// `YYYYMMDDHHMMSS` in local time, normalised to UTC
pub fn parse_dide_timestamp(s: &str) -> Result<DateTime<Utc>, WebError> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y%m%d%H%M%S")
        .map_err(|e| WebError::parse("timestamp", format!("'{s}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| WebError::parse("timestamp", format!("'{s}' does not exist in local time")))
}

/// Accepts both the legacy (`linuxsoftware`/`software`) and current
/// (`linux`/`windows`) catalogue shapes.
pub fn parse_software(json: &serde_json::Value) -> Result<Software, WebError> {
    let (linux, windows) = if json.get("linuxsoftware").is_some() {
        (&json["linuxsoftware"], &json["software"])
    } else {
        (&json["linux"], &json["windows"])
    };
    Ok(Software { linux: software_list(linux)?, windows: software_list(windows)? })
}

fn software_list(entries: &serde_json::Value) -> Result<SoftwareList, WebError> {
    let entries = entries.as_array().ok_or_else(|| WebError::parse("software", "expected a list"))?;
    let mut ret = SoftwareList::new();
    for entry in entries {
        let mut fields = entry.as_object().cloned().ok_or_else(|| WebError::parse("software", "expected an object"))?;
        let name = fields.remove("name").and_then(|v| v.as_str().map(str::to_lowercase));
        let version = fields.remove("version").and_then(|v| v.as_str().map(String::from));
        let (Some(name), Some(version)) = (name, version) else {
            return Err(WebError::parse("software", "entry without name or version"));
        };
        ret.entry(name).or_default().insert(version, fields);
    }
    Ok(ret)
}

#[cfg(test)]
#[path = "web_tests.rs"]
mod tests;
