//! Player (customer) endpoints

use serde::Serialize;

use crate::client::{ApiClient, RequestDescriptor, query_pairs};
use crate::error::{Error, Result, require};
use crate::models::{Player, PlayerInfo, PlayerUpdate};
use crate::pagination::{Page, decode};

/// Filters for `GET /players`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Matches player name or email
    pub search: Option<String>,
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| Error::Validation(format!("invalid request body: {e}")))
}

impl ApiClient {
    pub async fn list_players(&self, params: &PlayerListParams) -> Result<Page<Player>> {
        let request = RequestDescriptor::get("/players").with_query(query_pairs(params)?);
        Page::from_response(self.execute(request).await?)
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Player> {
        let player_id = require(player_id, "player id")?;
        decode(
            self.execute(RequestDescriptor::get(format!("/players/{player_id}")))
                .await?,
        )
    }

    /// Create a player. First name, last name and email are required.
    pub async fn create_player(&self, player: &PlayerInfo) -> Result<Player> {
        require(&player.first_name, "player first name")?;
        require(&player.last_name, "player last name")?;
        require(&player.email, "player email")?;
        decode(
            self.execute(RequestDescriptor::post("/players", to_body(player)?))
                .await?,
        )
    }

    pub async fn update_player(&self, player_id: &str, update: &PlayerUpdate) -> Result<Player> {
        let player_id = require(player_id, "player id")?;
        if update.is_empty() {
            return Err(Error::Validation("player data is required".into()));
        }
        decode(
            self.execute(RequestDescriptor::put(
                format!("/players/{player_id}"),
                to_body(update)?,
            ))
            .await?,
        )
    }
}
