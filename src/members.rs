//! Member list loading
//!
//! The chart takes a fully hydrated list; here it comes from a JSON file,
//! either a bare array or `{ "members": [...] }`.

use org_chart_core::model::{MemberId, OrgChartNode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read member list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid member list {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MemberFile {
    List(Vec<OrgChartNode>),
    Wrapped { members: Vec<OrgChartNode> },
}

pub fn parse_members(json: &str, path: &Path) -> Result<Vec<OrgChartNode>, DataError> {
    let file: MemberFile = serde_json::from_str(json).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match file {
        MemberFile::List(members) | MemberFile::Wrapped { members } => members,
    })
}

pub fn load_members(path: impl AsRef<Path>) -> Result<Arc<[OrgChartNode]>, DataError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let members = parse_members(&json, path)?;
    tracing::info!(count = members.len(), "Loaded members from {}", path.display());
    Ok(members.into())
}

/// New list with `member` reporting to `manager` (or to nobody)
///
/// Returns a fresh allocation so the chart's forest cache rebuilds.
pub fn with_manager(
    members: &[OrgChartNode],
    member: &MemberId,
    manager: Option<MemberId>,
) -> Arc<[OrgChartNode]> {
    members
        .iter()
        .map(|node| {
            if &node.id == member {
                OrgChartNode {
                    reports_to: manager.clone(),
                    ..node.clone()
                }
            } else {
                node.clone()
            }
        })
        .collect()
}
