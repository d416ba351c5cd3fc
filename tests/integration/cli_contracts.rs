use std::fs;

use clap::Parser;
use dfs_console::config::DfsConfig;
use dfs_console::error::ApiError;
use dfs_console::registry::FileRecord;
use dfs_console::tooling::cli::{Cli, CliContext, Commands, FilesCommands, UsersCommands};
use tempfile::TempDir;

fn context_in(temp_dir: &TempDir) -> CliContext {
    let mut config = DfsConfig::default();
    config.storage.data_dir = Some(temp_dir.path().join("data"));
    config.simulation.tick_interval_ms = 1;
    config.simulation.seed = Some(3);
    CliContext::new(config).unwrap()
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["dfs-console", "dashboard"],
        vec!["dfs-console", "dashboard", "--format", "json"],
        vec!["dfs-console", "files", "list"],
        vec!["dfs-console", "files", "list", "--search", "csv", "--format", "json"],
        vec!["dfs-console", "files", "show", "1"],
        vec!["dfs-console", "files", "delete", "1"],
        vec!["dfs-console", "files", "download", "1", "--output", "/tmp/x"],
        vec!["dfs-console", "users", "list"],
        vec!["dfs-console", "users", "add", "priya"],
        vec!["dfs-console", "upload", "./report.pdf", "--user", "kanish"],
        vec!["dfs-console", "analytics"],
        vec!["dfs-console", "nodes", "--log-level", "debug"],
        vec!["dfs-console", "--data-dir", "/tmp/dfs", "config"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["dfs-console"],
        vec!["dfs-console", "files"],
        vec!["dfs-console", "files", "show"],
        vec!["dfs-console", "users", "add"],
        vec!["dfs-console", "nodes", "--format", "yaml"],
        vec!["dfs-console", "replicate"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_err(), "expected parse failure for args: {args:?}");
    }
}

#[test]
fn upload_then_list_show_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("quarterly.csv");
    fs::write(&source, "a,b\n1,2\n").unwrap();

    let ctx = context_in(&temp_dir);
    let output = ctx
        .execute(&Commands::Upload {
            path: Some(source),
            user: Some("Kanish".to_string()),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["task"]["status"], "completed");
    assert_eq!(parsed["file"]["filename"], "quarterly.csv");
    assert_eq!(parsed["file"]["user"], "kanish");
    assert_eq!(parsed["file"]["size"], 8);
    assert_eq!(parsed["file"]["mimeType"], "text/csv");
    assert_eq!(parsed["file"]["chunks"], 1);
    let id = parsed["file"]["id"].as_str().unwrap().to_string();

    let listed = ctx
        .execute(&Commands::Files {
            command: FilesCommands::List {
                search: None,
                format: "json".to_string(),
            },
        })
        .unwrap();
    let listed: Vec<FileRecord> = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed.len(), 6);
    assert_eq!(listed[0].id, id);

    let shown = ctx
        .execute(&Commands::Files {
            command: FilesCommands::Show {
                id: id.clone(),
                format: "text".to_string(),
            },
        })
        .unwrap();
    assert!(shown.contains("quarterly.csv"));
    assert!(shown.contains("Chunks: 1"));

    let deleted = ctx
        .execute(&Commands::Files {
            command: FilesCommands::Delete { id: id.clone() },
        })
        .unwrap();
    assert!(deleted.contains("Deleted"));
    assert!(ctx.store().get_file(&id).is_none());
}

#[test]
fn registry_survives_context_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = context_in(&temp_dir);
        ctx.execute(&Commands::Users {
            command: UsersCommands::Add {
                name: "Priya".to_string(),
            },
        })
        .unwrap();
        ctx.execute(&Commands::Files {
            command: FilesCommands::Delete {
                id: "5".to_string(),
            },
        })
        .unwrap();
    }

    let ctx = context_in(&temp_dir);
    let users = ctx
        .execute(&Commands::Users {
            command: UsersCommands::List {
                format: "json".to_string(),
            },
        })
        .unwrap();
    let users: serde_json::Value = serde_json::from_str(&users).unwrap();
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["user"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["aditya", "kanish", "ganesh", "priya"]);
    assert_eq!(ctx.store().file_count(), 4);
}

#[test]
fn download_writes_placeholder_and_reports_missing() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    let target = temp_dir.path().join("out.csv");

    ctx.execute(&Commands::Files {
        command: FilesCommands::Download {
            id: "1".to_string(),
            output: Some(target.clone()),
        },
    })
    .unwrap();
    let body = fs::read_to_string(&target).unwrap();
    assert!(body.starts_with("Filename: sales_data_2024.csv\nDownloaded: "));

    let missing = ctx.execute(&Commands::Files {
        command: FilesCommands::Download {
            id: "999".to_string(),
            output: Some(temp_dir.path().join("never")),
        },
    });
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
    assert!(!temp_dir.path().join("never").exists());
}

#[test]
fn dashboard_and_analytics_json_contracts() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);

    let dashboard = ctx
        .execute(&Commands::Dashboard {
            format: "json".to_string(),
        })
        .unwrap();
    let dashboard: serde_json::Value = serde_json::from_str(&dashboard).unwrap();
    assert_eq!(dashboard["summary"]["total_files"], 5);
    assert_eq!(dashboard["summary"]["active_nodes"], 4);
    assert_eq!(dashboard["recentFiles"].as_array().unwrap().len(), 3);
    assert_eq!(dashboard["nodes"].as_array().unwrap().len(), 5);

    let analytics = ctx
        .execute(&Commands::Analytics {
            format: "json".to_string(),
        })
        .unwrap();
    let analytics: serde_json::Value = serde_json::from_str(&analytics).unwrap();
    assert_eq!(analytics["uploadsPerUser"][0]["user"], "aditya");
    assert_eq!(analytics["uploadsPerUser"][0]["uploads"], 3);
    assert_eq!(analytics["fileSizes"].as_array().unwrap().len(), 5);
    let per_node = analytics["storagePerNode"].as_array().unwrap();
    assert_eq!(per_node.len(), 5);
    assert_eq!(per_node[2]["node"], "Storage Node 3");
    assert_eq!(per_node[2]["used_gib"], 4.0);
    assert_eq!(per_node[2]["free_gib"], 6.0);
}
