//! Format registry, node, and upload views as text.

use crate::nodes::{NodeStatus, StorageNode};
use crate::registry::FileRecord;
use crate::upload::{UploadStatus, UploadTask};
use crate::views::{
    format_bytes, format_date, DashboardSummary, FileSizeEntry, NodeStorageEntry, UserUploadCount,
};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_node_status(status: NodeStatus) -> String {
    match status {
        NodeStatus::Online => format!("{}", status.green()),
        NodeStatus::Degraded => format!("{}", status.yellow()),
        NodeStatus::Offline => format!("{}", status.red()),
    }
}

fn files_table<'a>(files: impl IntoIterator<Item = &'a FileRecord>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Filename", "Size", "Owner", "Uploaded", "Node", "Chunks"]);
    for file in files {
        table.add_row(vec![
            file.id.clone(),
            file.filename.clone(),
            format_bytes(file.size_bytes),
            file.owner.clone(),
            format_date(&file.uploaded_at),
            file.primary_node.clone(),
            file.chunk_count.to_string(),
        ]);
    }
    table
}

/// File listing, with a hint when the search matched nothing.
pub fn format_files_text(files: &[&FileRecord], query: Option<&str>) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Files"));
    if files.is_empty() {
        match query {
            Some(q) if !q.trim().is_empty() => {
                out.push_str(&format!("No files match \"{}\".\n", q.trim()))
            }
            _ => out.push_str("No files uploaded yet.\n"),
        }
        return out;
    }
    out.push_str(&format!("{}\n", files_table(files.iter().copied())));
    out.push_str(&format!("\n{} file(s)\n", files.len()));
    out
}

pub fn format_file_detail_text(file: &FileRecord) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&file.filename));
    out.push_str(&format!("  ID: {}\n", file.id));
    out.push_str(&format!(
        "  Size: {} ({} bytes)\n",
        format_bytes(file.size_bytes),
        file.size_bytes
    ));
    out.push_str(&format!("  Owner: {}\n", file.owner));
    out.push_str(&format!("  Uploaded: {}\n", format_date(&file.uploaded_at)));
    out.push_str(&format!("  Type: {}\n", file.mime_type));
    out.push_str(&format!("  Primary node: {}\n", file.primary_node));
    out.push_str(&format!("  Replicas: {}\n", file.replica_nodes.join(", ")));
    out.push_str(&format!("  Chunks: {}\n", file.chunk_count));
    out
}

pub fn format_users_text(users: &[String], counts: &[UserUploadCount]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Users"));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["User", "Uploads"]);
    for user in users {
        let uploads = counts
            .iter()
            .find(|c| &c.user == user)
            .map(|c| c.uploads)
            .unwrap_or(0);
        table.add_row(vec![user.clone(), uploads.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

fn nodes_table(nodes: &[StorageNode]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Location", "Status", "Used", "Capacity", "Utilization"]);
    for node in nodes {
        table.add_row(vec![
            format!("{} ({})", node.name, node.id),
            node.location.clone(),
            format_node_status(node.status),
            format_bytes(node.used_bytes),
            format_bytes(node.capacity_bytes),
            format!("{:.1}%", node.utilization_percent()),
        ]);
    }
    table
}

pub fn format_nodes_text(nodes: &[StorageNode]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Storage Nodes"));
    out.push_str(&format!("{}\n", nodes_table(nodes)));
    out
}

pub fn format_dashboard_text(
    summary: &DashboardSummary,
    nodes: &[StorageNode],
    recent: &[FileRecord],
) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Dashboard"));
    out.push_str(&format!("  Total files: {}\n", summary.total_files));
    out.push_str(&format!(
        "  Storage used: {} of {} ({:.1}%)\n",
        format_bytes(summary.used_bytes),
        format_bytes(summary.capacity_bytes),
        summary.utilization_percent
    ));
    out.push_str(&format!("  Free: {}\n", format_bytes(summary.free_bytes)));
    out.push_str(&format!(
        "  Active nodes: {}/{}\n\n",
        summary.active_nodes, summary.total_nodes
    ));

    out.push_str(&format!("{}\n\n", format_section_heading("Recent files")));
    if recent.is_empty() {
        out.push_str("  No files uploaded yet.\n\n");
    } else {
        out.push_str(&format!("{}\n\n", files_table(recent)));
    }

    out.push_str(&format!("{}\n\n", format_section_heading("Nodes")));
    out.push_str(&format!("{}\n", nodes_table(nodes)));
    out
}

pub fn format_analytics_text(
    summary: &DashboardSummary,
    per_node: &[NodeStorageEntry],
    per_user: &[UserUploadCount],
    sizes: &[FileSizeEntry],
) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Analytics"));
    out.push_str(&format!(
        "  Storage: {} used, {} free\n\n",
        format_bytes(summary.used_bytes),
        format_bytes(summary.free_bytes)
    ));

    out.push_str(&format!("{}\n\n", format_section_heading("Storage per node")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Used (GB)", "Free (GB)"]);
    for entry in per_node {
        table.add_row(vec![
            entry.node.clone(),
            format!("{:.2}", entry.used_gib),
            format!("{:.2}", entry.free_gib),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Uploads per user")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["User", "Uploads"]);
    for entry in per_user {
        table.add_row(vec![entry.user.clone(), entry.uploads.to_string()]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("File sizes")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Size (GB)"]);
    for entry in sizes {
        table.add_row(vec![entry.label.clone(), format!("{:.2}", entry.size_gib)]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Single status line for an in-flight or finished upload
pub fn format_upload_progress(task: &UploadTask) -> String {
    let filled = ((task.progress_percent / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}] {:>5.1}% {} ({})",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled),
        task.progress_percent,
        task.filename,
        task.status
    )
}

pub fn format_upload_result_text(task: &UploadTask, record: Option<&FileRecord>) -> String {
    match (task.status, record) {
        (UploadStatus::Completed, Some(record)) => {
            let mut out = format!("Uploaded {} as {}\n\n", task.filename, record.id);
            out.push_str(&format_file_detail_text(record));
            out
        }
        _ => format!("Upload of {} ended with status {}\n", task.filename, task.status),
    }
}
