use super::parse;
use crate::cli::Cli;
use crate::cli::CliCommand;
use clap::Parser;

#[test]
fn cli_parse_resolve() {
    match parse(&["xmd", "resolve", "https://x.com/u/status/1234567890"]) {
        CliCommand::Resolve { input } => assert_eq!(input, "https://x.com/u/status/1234567890"),
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["xmd", "download", "1234567890"]) {
        CliCommand::Download {
            input,
            dir,
            filename,
        } => {
            assert_eq!(input, "1234567890");
            assert!(dir.is_none());
            assert!(filename.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_options() {
    match parse(&[
        "xmd",
        "download",
        "1234567890",
        "--dir",
        "/tmp/media",
        "--filename",
        "clip",
    ]) {
        CliCommand::Download { dir, filename, .. } => {
            assert_eq!(dir.as_deref(), Some(std::path::Path::new("/tmp/media")));
            assert_eq!(filename.as_deref(), Some("clip"));
        }
        _ => panic!("expected Download with options"),
    }
}

#[test]
fn cli_parse_extract() {
    match parse(&["xmd", "extract", "page.html"]) {
        CliCommand::Extract { path, id } => {
            assert_eq!(path, std::path::PathBuf::from("page.html"));
            assert_eq!(id, "0");
        }
        _ => panic!("expected Extract"),
    }
    match parse(&["xmd", "extract", "page.html", "--id", "42"]) {
        CliCommand::Extract { id, .. } => assert_eq!(id, "42"),
        _ => panic!("expected Extract with --id"),
    }
}

#[test]
fn cli_parse_serve() {
    assert!(matches!(parse(&["xmd", "serve"]), CliCommand::Serve));
}

#[test]
fn cli_rejects_missing_input() {
    assert!(Cli::try_parse_from(["xmd", "resolve"]).is_err());
    assert!(Cli::try_parse_from(["xmd", "bogus"]).is_err());
}
