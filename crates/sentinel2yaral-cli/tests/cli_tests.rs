//! Tests for the cli crate

use clap::Parser;
use sentinel2yaral_cli::commands::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_cli_parsing_info() {
    let args = vec!["sentinel2yaral", "info"];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Info => {} // Expected
        _ => panic!("Expected Info command"),
    }
}

#[test]
fn test_cli_parsing_serve() {
    let args = vec!["sentinel2yaral", "serve", "--host", "127.0.0.1", "--port", "8080"];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Serve { host, port } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 8080);
        }
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_cli_parsing_convert_with_file() {
    let args = vec![
        "sentinel2yaral",
        "convert",
        "--file",
        "rule.yaml",
        "--format",
        "json",
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Convert {
            file,
            example,
            format,
            ..
        } => {
            assert_eq!(file, Some(PathBuf::from("rule.yaml")));
            assert_eq!(example, None);
            assert_eq!(format, OutputFormat::Json);
        }
        _ => panic!("Expected Convert command"),
    }
}

#[test]
fn test_cli_parsing_convert_with_example_and_params() {
    let args = vec![
        "sentinel2yaral",
        "convert",
        "--example",
        "failed_logins.yaml",
        "--model",
        "gemini-1.5-pro-002",
        "--temperature",
        "0.5",
        "--max-tokens",
        "4000",
        "--top-p",
        "0.9",
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Convert {
            example,
            model,
            temperature,
            max_tokens,
            top_p,
            format,
            ..
        } => {
            assert_eq!(example, Some("failed_logins.yaml".to_string()));
            assert_eq!(model, Some("gemini-1.5-pro-002".to_string()));
            assert_eq!(temperature, Some(0.5));
            assert_eq!(max_tokens, Some(4000));
            assert_eq!(top_p, Some(0.9));
            assert_eq!(format, OutputFormat::Text); // Default
        }
        _ => panic!("Expected Convert command"),
    }
}

#[test]
fn test_cli_parsing_convert_output_path() {
    let args = vec![
        "sentinel2yaral",
        "convert",
        "--file",
        "rule.yaml",
        "--output",
        "converted.yaral",
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Convert { output, .. } => {
            assert_eq!(output, Some(PathBuf::from("converted.yaral")));
        }
        _ => panic!("Expected Convert command"),
    }
}

#[test]
fn test_cli_parsing_examples() {
    let args = vec!["sentinel2yaral", "examples", "--format", "json"];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Examples { format } => {
            assert_eq!(format, OutputFormat::Json);
        }
        _ => panic!("Expected Examples command"),
    }
}

#[test]
fn test_cli_parsing_models() {
    let args = vec!["sentinel2yaral", "models"];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Models { format } => {
            assert_eq!(format, OutputFormat::Text);
        }
        _ => panic!("Expected Models command"),
    }
}

#[test]
fn test_cli_global_project_flag() {
    let args = vec!["sentinel2yaral", "--project", "my-project", "info"];
    let cli = Cli::try_parse_from(args).unwrap();

    assert_eq!(cli.project, Some("my-project".to_string()));
    assert_eq!(cli.rules_dir, "rules");
}

#[test]
fn test_cli_requires_subcommand() {
    let args = vec!["sentinel2yaral"];
    assert!(Cli::try_parse_from(args).is_err());
}
