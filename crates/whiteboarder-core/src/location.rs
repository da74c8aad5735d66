//! Board addressing in page paths (`/boards/{id}`).

const BOARDS_PREFIX: &str = "/boards/";

/// Extract the board id from a path like `/boards/abc`.
/// Returns `None` when the path carries no board id, which means a new board
/// should be created.
pub fn board_id_from_path(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let id = path.strip_prefix(BOARDS_PREFIX)?.trim_end_matches('/');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Path that addresses the given board.
pub fn board_path(id: &str) -> String {
    format!("{BOARDS_PREFIX}{id}")
}
