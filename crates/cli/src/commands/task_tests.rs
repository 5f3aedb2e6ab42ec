// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    command: TaskCommand,
}

fn parse(args: &[&str]) -> TaskCommand {
    let argv = std::iter::once("task").chain(args.iter().copied());
    TestCli::try_parse_from(argv).unwrap().command
}

#[test]
fn no_resource_flags_means_cluster_defaults() {
    assert_eq!(ResourceFlags::default().into_resources(), None);
}

#[test]
fn resource_flags_fill_in_defaults() {
    let flags = ResourceFlags {
        queue: Some(".test".to_string()),
        max_runtime: Some(Duration::from_secs(5400)),
        ..ResourceFlags::default()
    };
    let resources = flags.into_resources().unwrap();
    assert_eq!(resources.queue.as_deref(), Some(".test"));
    assert_eq!(resources.cores, 1);
    assert!(!resources.exclusive);
    assert_eq!(resources.max_runtime, Some(5400));
    assert_eq!(resources.memory_per_node, None);
}

#[test]
fn create_takes_command_after_options() {
    let TaskCommand::Create { cmd, envvars, resources, wait, .. } =
        parse(&["create", "--env", "A=1", "--cores", "4", "--wait", "echo", "-n", "hi"])
    else {
        panic!("expected create");
    };
    assert_eq!(cmd, vec!["echo", "-n", "hi"]);
    assert_eq!(envvars, vec![("A".to_string(), "1".to_string())]);
    assert_eq!(resources.cores, Some(4));
    assert!(wait);
}

#[test]
fn create_requires_a_command() {
    let argv = ["task", "create", "--environment", "default"];
    assert!(TestCli::try_parse_from(argv).is_err());
}

#[test]
fn list_combines_repeated_statuses() {
    let TaskCommand::List { with_status } = parse(&["list", "--with-status", "success", "--with-status", "failure"])
    else {
        panic!("expected list");
    };
    let mask = with_status.into_iter().reduce(|a, b| a | b).unwrap();
    assert!(mask.contains(TaskStatus::Success));
    assert!(mask.contains(TaskStatus::Failure));
    assert!(!mask.contains(TaskStatus::Running));
}

#[test]
fn task_ids_are_validated_when_parsing() {
    let argv = ["task", "status", "not-an-id"];
    assert!(TestCli::try_parse_from(argv).is_err());
}

#[test]
fn wait_flags_build_options() {
    let TaskCommand::Wait { wait, .. } =
        parse(&["wait", "0123456789abcdef0123456789abcdef", "--poll", "5s", "--timeout", "1m", "--no-show-log"])
    else {
        panic!("expected wait");
    };
    let options = wait.options();
    assert_eq!(options.interval, Duration::from_secs(5));
    assert_eq!(options.timeout, Some(Duration::from_secs(60)));
    assert!(!options.allow_created);
    assert!(wait.no_show_log);
}
