//! Board storage over the board-CRUD HTTP API.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::board::Board;
use reqwest::{Client, Response, StatusCode};

/// Talks to `{base_url}/api/boards`.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    client: Client,
    base_url: String,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn boards_url(&self) -> String {
        format!("{}/api/boards", self.base_url)
    }

    fn board_url(&self, id: &str) -> String {
        format!("{}/api/boards/{}", self.base_url, id)
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    StorageError::Transport(e.to_string())
}

fn check_status(response: Response, id: Option<&str>) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(StorageError::NotFound(id.to_string())),
        _ => Err(StorageError::Status(status.as_u16())),
    }
}

async fn read_board(response: Response) -> StorageResult<Board> {
    let body = response.text().await.map_err(transport)?;
    Board::from_json(&body).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl Storage for HttpStorage {
    fn create(&self) -> BoxFuture<'_, StorageResult<Board>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.boards_url())
                .send()
                .await
                .map_err(transport)?;
            let board = read_board(check_status(response, None)?).await?;
            log::debug!("Server created board {:?}", board.id);
            Ok(board)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Board>> {
        let id = id.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(self.board_url(&id))
                .send()
                .await
                .map_err(transport)?;
            read_board(check_status(response, Some(&id))?).await
        })
    }

    fn save(&self, id: &str, board: &Board) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let board = board.clone();
        Box::pin(async move {
            let response = self
                .client
                .put(self.board_url(&id))
                .json(&board)
                .send()
                .await
                .map_err(transport)?;
            check_status(response, Some(&id))?;
            Ok(())
        })
    }
}
