use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("request to the status API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status API returned an unexpected body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("status API did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    pub online: bool,
    #[serde(default)]
    pub players: Players,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Players {
    #[serde(default)]
    pub online: u32,
    #[serde(default)]
    pub list: Vec<Player>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
}

impl ServerStatus {
    pub fn parse(body: &str) -> Result<Self, StatusError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The reply shown by the `status` command.
    pub fn summary(&self) -> String {
        if !self.online {
            return "The Minecraft server is currently offline.".to_string();
        }

        let online = self.players.online;
        if online == 0 {
            return "The Minecraft server has nobody online :(.".to_string();
        }

        let player_list = self
            .players
            .list
            .iter()
            .map(|player| format!("- {}", player.name))
            .collect::<Vec<_>>()
            .join("\n");
        format!("The Minecraft server has {online} players online:\n{player_list}")
    }
}

/// Fetches the live status of `address` from the status API at `api`.
pub async fn query_status(api: &str, address: &str) -> Result<ServerStatus, StatusError> {
    debug!("Querying server status - {}", address);
    let start = std::time::Instant::now();

    let request = async {
        let client = reqwest::Client::new();
        client
            .get(format!("{}/{}", api, address))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    };

    let body = timeout(QUERY_TIMEOUT, request)
        .await
        .map_err(|_| StatusError::Timeout(QUERY_TIMEOUT))??;

    debug!("Query time: {:?}", start.elapsed());
    ServerStatus::parse(&body)
}
