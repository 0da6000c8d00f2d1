//! Tests for rewrite and serve.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_rewrite() {
    match parse(&["uecap-shell", "rewrite", "http://localhost:8080/app/"]) {
        CliCommand::Rewrite { url, host } => {
            assert_eq!(url, "http://localhost:8080/app/");
            assert!(host.is_none());
        }
        _ => panic!("expected Rewrite"),
    }
}

#[test]
fn cli_parse_rewrite_host() {
    match parse(&["uecap-shell", "rewrite", "http://127.0.0.1/", "--host", "127.0.0.1"]) {
        CliCommand::Rewrite { host, .. } => assert_eq!(host.as_deref(), Some("127.0.0.1")),
        _ => panic!("expected Rewrite with --host"),
    }
}

#[test]
fn cli_parse_serve_defaults() {
    match parse(&["uecap-shell", "serve"]) {
        CliCommand::Serve {
            host,
            port,
            assets,
            backend,
        } => {
            assert!(host.is_none());
            assert!(port.is_none());
            assert!(assets.is_none());
            assert!(backend.is_none());
        }
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_serve_options() {
    match parse(&[
        "uecap-shell",
        "serve",
        "--port",
        "8080",
        "--assets",
        "./assets",
        "--backend",
        "http://127.0.0.1:9000",
    ]) {
        CliCommand::Serve {
            port,
            assets,
            backend,
            ..
        } => {
            assert_eq!(port, Some(8080));
            assert_eq!(assets.as_deref(), Some(std::path::Path::new("./assets")));
            assert_eq!(backend.as_deref(), Some("http://127.0.0.1:9000"));
        }
        _ => panic!("expected Serve with options"),
    }
}

#[test]
fn cli_parse_serve_rejects_bad_port() {
    assert!(Cli::try_parse_from(["uecap-shell", "serve", "--port", "70000"]).is_err());
}

#[test]
fn cli_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["uecap-shell"]).is_err());
}
