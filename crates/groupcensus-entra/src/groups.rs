//! Mail-enabled group listing and transitive member counts from Graph.

use async_trait::async_trait;
use groupcensus_core::{
    CensusError, CensusResult, DirectoryReader, GroupQuery, GroupType, LookupError, RawGroup,
    UNIFIED_MARKER,
};
use std::ops::ControlFlow;
use tracing::{debug, info, instrument};

use crate::{EntraConfig, EntraCredentials, EntraError, EntraResult, GraphClient};

const GROUP_SELECT: &str = "id,displayName,mail,proxyAddresses,groupTypes";

/// Builds the `$filter` expression for a listing.
fn group_filter(type_filter: Option<GroupType>) -> String {
    let unified = format!("groupTypes/any(c:c eq '{UNIFIED_MARKER}')");
    match type_filter {
        None => "mailEnabled eq true".to_string(),
        Some(GroupType::M365Group) => format!("mailEnabled eq true and {unified}"),
        Some(GroupType::DistributionList) => format!("mailEnabled eq true and NOT {unified}"),
    }
}

/// Parses a `$count` body: a bare integer, possibly with a BOM or whitespace.
fn parse_count(body: &str) -> EntraResult<u64> {
    body.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .parse::<u64>()
        .map_err(|_| EntraError::InvalidCount(body.to_string()))
}

/// Graph-backed [`DirectoryReader`].
#[derive(Debug)]
pub struct EntraDirectory {
    client: GraphClient,
    page_size: usize,
}

impl EntraDirectory {
    /// Creates a directory reader for the configured tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &EntraConfig, credentials: EntraCredentials) -> EntraResult<Self> {
        Ok(Self::with_client(GraphClient::new(config, credentials)?, config.page_size))
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: GraphClient, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    fn group_list_url(&self, query: &GroupQuery) -> String {
        let top = query
            .limit
            .map_or(self.page_size, |limit| limit.clamp(1, self.page_size));
        format!(
            "{}/groups?$filter={}&$select={}&$count=true&$top={}",
            self.client.base_url(),
            urlencoding::encode(&group_filter(query.type_filter)),
            GROUP_SELECT,
            top
        )
    }

    fn member_count_url(&self, group_id: &str) -> String {
        format!(
            "{}/groups/{}/transitiveMembers/$count",
            self.client.base_url(),
            urlencoding::encode(group_id)
        )
    }

    /// Lists mail-enabled groups, stopping once `query.limit` are collected.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self))]
    pub async fn list_groups(&self, query: &GroupQuery) -> EntraResult<Vec<RawGroup>> {
        let url = self.group_list_url(query);
        let mut groups: Vec<RawGroup> = Vec::new();

        self.client
            .get_paginated(&url, |page: Vec<RawGroup>| {
                groups.extend(page);
                match query.limit {
                    Some(limit) if groups.len() >= limit => {
                        groups.truncate(limit);
                        ControlFlow::Break(())
                    }
                    _ => ControlFlow::Continue(()),
                }
            })
            .await?;

        info!(count = groups.len(), "Listed mail-enabled groups");
        Ok(groups)
    }

    /// Counts a group's transitive members.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an integer.
    #[instrument(skip(self))]
    pub async fn count_transitive_members(&self, group_id: &str) -> EntraResult<u64> {
        let body = self.client.get_text(&self.member_count_url(group_id)).await?;
        let count = parse_count(&body)?;
        debug!(count, "Counted transitive members");
        Ok(count)
    }
}

#[async_trait]
impl DirectoryReader for EntraDirectory {
    async fn verify_connection(&self) -> CensusResult<()> {
        self.client
            .authenticate()
            .await
            .map_err(|e| CensusError::ConnectionFailure(e.to_string()))?;
        info!("Connected to Microsoft Graph");
        Ok(())
    }

    async fn list_mail_enabled_groups(&self, query: &GroupQuery) -> CensusResult<Vec<RawGroup>> {
        self.list_groups(query)
            .await
            .map_err(|e| CensusError::ConnectionFailure(format!("failed to list groups: {e}")))
    }

    async fn transitive_member_count(&self, group_id: &str) -> Result<u64, LookupError> {
        self.count_transitive_members(group_id)
            .await
            .map_err(|e| LookupError::LookupFailure(e.to_string()))
    }
}
