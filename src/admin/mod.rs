//! Admin console: fetch the member list, filter it in memory, export it.

mod export;
mod filter;

pub use export::*;
pub use filter::*;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::client::{ClientError, TytcClient};
use crate::models::Member;

/// Admin dashboard state over a fetched member list.
pub struct AdminConsole {
    client: TytcClient,
    members: Vec<Member>,
    pub filter: MemberFilter,
}

impl AdminConsole {
    pub fn new(client: TytcClient) -> Self {
        Self {
            client,
            members: Vec::new(),
            filter: MemberFilter::default(),
        }
    }

    /// Fetch the full member list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<usize, ClientError> {
        match self.client.list_members().await {
            Ok(members) => {
                self.members = members;
                Ok(self.members.len())
            }
            Err(e) => {
                tracing::warn!("Error fetching members: {}", e);
                Err(e)
            }
        }
    }

    pub fn client(&self) -> &TytcClient {
        &self.client
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Members matching the current filter.
    pub fn filtered(&self) -> Vec<&Member> {
        self.filter.apply(&self.members)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> MemberStats {
        MemberStats::compute(&self.members, now)
    }

    /// "All N members" without a filter, otherwise "Showing X of N members".
    pub fn summary(&self) -> String {
        if !self.filter.is_active() {
            return format!("All {} members", self.members.len());
        }
        format!(
            "Showing {} of {} members",
            self.filtered().len(),
            self.members.len()
        )
    }

    /// CSV of the currently filtered members.
    pub fn export(&self, now: DateTime<Utc>) -> CsvExport {
        export_csv(self.filtered(), now)
    }

    /// Write the filtered export into `dir` and return the file path.
    pub async fn write_export(&self, dir: &Path, now: DateTime<Utc>) -> std::io::Result<PathBuf> {
        let export = self.export(now);
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&export.filename);
        tokio::fs::write(&path, export.contents.as_bytes()).await?;
        tracing::info!("Exported members to {}", path.display());
        Ok(path)
    }
}
