// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn codes_have_expected_values() {
    assert_eq!(codes::HEADER, 74);
    assert_eq!(codes::LITERAL, 250);
    assert_eq!(codes::CONTEXT, 245);
    assert_eq!(codes::MUTED, 240);
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    let debug = format!("{:?}", styles());
    assert_eq!(debug, format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let result = header("foo");
    assert!(result.contains("\x1b[38;5;74m"), "expected ANSI header color");
    assert!(result.contains("foo"));
    assert!(result.contains("\x1b[0m"), "expected ANSI reset");
}

#[test]
#[serial]
fn status_colors_by_outcome() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    assert!(status(TaskStatus::Success).contains("\x1b[38;5;114m"));
    assert!(status(TaskStatus::Failure).contains("\x1b[38;5;174m"));
    assert!(status(TaskStatus::Running).contains("running"));
}

#[test]
#[serial]
fn no_color_returns_plain_text() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    assert_eq!(context("ctx"), "ctx");
    assert_eq!(muted("quiet"), "quiet");
    assert_eq!(status(TaskStatus::Cancelled), "cancelled");
}
