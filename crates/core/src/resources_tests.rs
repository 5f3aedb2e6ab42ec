// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn cluster() -> ClusterResources {
    ClusterResources {
        queues: Queues::new(["AllNodes", "BuildQueue", "Testing"], "AllNodes", "BuildQueue", "Testing")
            .unwrap(),
        max_cores: 32,
        max_memory: 512,
    }
}

#[yare::parameterized(
    unset = { None, "AllNodes" },
    explicit = { Some("Testing"), "Testing" },
    default_alias = { Some(".default"), "AllNodes" },
    test_alias = { Some(".test"), "Testing" },
    build_alias = { Some(".build"), "BuildQueue" },
)]
fn queue_resolution(requested: Option<&str>, expected: &str) {
    assert_eq!(cluster().queues.validate_queue(requested).unwrap(), expected);
}

#[test]
fn unknown_queue_is_rejected() {
    let err = cluster().queues.validate_queue(Some("Gpu")).unwrap_err();
    assert_eq!(err.to_string(), "Queue 'Gpu' is not in valid queue list");
    let err = cluster().queues.validate_queue(Some(".fast")).unwrap_err();
    assert_eq!(err, ResourceError::InvalidSpecialQueue(".fast".into()));
}

#[test]
fn queues_new_checks_aliases() {
    let err = Queues::new(["a"], "a", "b", "a").unwrap_err();
    assert_eq!(err.to_string(), "Build queue 'b' is not in valid queue list");
}

#[test]
fn simple_queues_use_one_name_everywhere() {
    let q = Queues::simple("default");
    assert_eq!(q.validate_queue(Some(".build")).unwrap(), "default");
    assert_eq!(q.valid.len(), 1);
}

#[test]
fn validate_resources_fills_queue() {
    let res = cluster().validate_resources(&TaskResources::default().cores(4)).unwrap();
    assert_eq!(res.queue.as_deref(), Some("AllNodes"));
    assert_eq!(res.cores, 4);
}

#[yare::parameterized(
    zero_cores = { TaskResources::default().cores(0), "'cores' must be positive" },
    too_many_cores = { TaskResources::default().cores(33), "33 is too many cores for this cluster" },
    zero_runtime = { TaskResources::default().max_runtime(0u32), "'max_runtime' must be positive" },
    node_memory = { TaskResources::default().memory_per_node(1024u32), "1024Gb per node is too large for this cluster" },
    task_memory = { TaskResources::default().memory_per_task(513u32), "513Gb per task is too large for this cluster" },
)]
fn validate_resources_rejects(resources: TaskResources, message: &str) {
    let err = cluster().validate_resources(&resources).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn resources_serialize_compactly() {
    let json = serde_json::to_value(TaskResources::default()).unwrap();
    assert_eq!(json, serde_json::json!({"cores": 1, "exclusive": false}));
}
