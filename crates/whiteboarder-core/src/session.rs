//! Per-board editing session.
//!
//! A [`Session`] owns everything one client knows about a board: the strokes,
//! the draft under the pointer, the undo stack, peer cursors and brush
//! settings. Every input goes through [`Session::handle`]; each handler runs
//! to completion and queues [`Effect`]s for the driver to carry out (paint,
//! save, send). Nothing here touches the network directly.

use crate::board::{Board, Point, Stroke, StrokeError, append_point, eraser_radius};
use crate::history::EditHistory;
use crate::identity::Identity;
use crate::location::{board_id_from_path, board_path};
use crate::presence::{CursorState, PresenceChange, PresenceTracker};
use crate::protocol::Message;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::sync::ChannelEvent;
use crate::throttle::CursorThrottle;
use std::time::{Duration, Instant};

/// Default pen color.
pub const DEFAULT_COLOR: &str = "#000000";
/// Default brush size in pixels.
pub const DEFAULT_SIZE: u32 = 4;

/// Active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

/// Current brush settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    pub tool: Tool,
    pub color: String,
    pub size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: DEFAULT_COLOR.to_string(),
            size: DEFAULT_SIZE,
        }
    }
}

/// Input fed to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Undo,
    Redo,
    Clear,
    SelectTool(Tool),
    SetColor(String),
    SetSize(u32),
    /// Local cursor moved over the canvas.
    CursorMoved { x: f64, y: f64, at: Instant },
    /// Timer tick; flushes a throttled cursor position.
    Tick(Instant),
    /// Decoded frame from the relay.
    Inbound(Message),
    ChannelOpened,
    ChannelClosed,
}

impl From<ChannelEvent> for SessionEvent {
    fn from(event: ChannelEvent) -> Self {
        match event {
            ChannelEvent::Joined { .. } => SessionEvent::ChannelOpened,
            ChannelEvent::Message(message) => SessionEvent::Inbound(message),
            ChannelEvent::Closed | ChannelEvent::Error { .. } => SessionEvent::ChannelClosed,
        }
    }
}

/// Work requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Repaint the whole board.
    Redraw,
    /// Paint the in-progress stroke on top of the board.
    DrawDraft(Stroke),
    /// Replace the stored board. Fire-and-forget.
    Persist { id: String, board: Board },
    /// Send a message on the board channel.
    Broadcast(Message),
    PeerJoined(CursorState),
    PeerMoved(CursorState),
    PeerLeft(String),
    /// Point the visible location at this path without navigating.
    RewriteLocation(String),
}

/// Editing session for one board.
pub struct Session {
    identity: Identity,
    board_id: Option<String>,
    board: Board,
    draft: Option<Stroke>,
    history: EditHistory,
    presence: PresenceTracker,
    brush: Brush,
    throttle: CursorThrottle,
    pointer_down: bool,
    channel_open: bool,
    effects: Vec<Effect>,
}

impl Session {
    /// Create a session around an already loaded board.
    pub fn new(identity: Identity, board: Board) -> Self {
        let presence = PresenceTracker::new(identity.as_str());
        Self {
            board_id: board.id.clone(),
            identity,
            board,
            draft: None,
            history: EditHistory::new(),
            presence,
            brush: Brush::default(),
            throttle: CursorThrottle::default(),
            pointer_down: false,
            channel_open: false,
            effects: Vec::new(),
        }
    }

    /// Replace the cursor throttle window.
    pub fn with_cursor_throttle(mut self, window: Duration) -> Self {
        self.throttle = CursorThrottle::new(window);
        self
    }

    /// Start a session for the board addressed by `path`.
    ///
    /// A path of the form `/boards/{id}` loads that board. Any other path
    /// creates a new board and queues [`Effect::RewriteLocation`] with its
    /// address.
    pub async fn open<S: Storage + ?Sized>(
        storage: &S,
        identity: Identity,
        path: &str,
    ) -> StorageResult<Self> {
        match board_id_from_path(path) {
            Some(id) => {
                let mut board = storage.load(&id).await?;
                board.id.get_or_insert_with(|| id.clone());
                log::info!("Loaded board {} ({} strokes)", id, board.len());
                let mut session = Self::new(identity, board);
                session.board_id = Some(id);
                session.effects.push(Effect::Redraw);
                Ok(session)
            }
            None => {
                let board = storage.create().await?;
                let id = board
                    .id
                    .clone()
                    .ok_or_else(|| StorageError::Other("created board has no id".to_string()))?;
                log::info!("Created board {}", id);
                let mut session = Self::new(identity, board);
                session.effects.push(Effect::RewriteLocation(board_path(&id)));
                session.effects.push(Effect::Redraw);
                Ok(session)
            }
        }
    }

    /// End the session and hand back the final board.
    pub fn close(mut self) -> Board {
        self.draft = None;
        self.presence.clear();
        self.throttle.reset();
        log::info!("Closed session for board {:?}", self.board_id);
        self.board
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn draft(&self) -> Option<&Stroke> {
        self.draft.as_ref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn is_channel_open(&self) -> bool {
        self.channel_open
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(&self.board)
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Take queued effects (drains the queue).
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Check if effects are waiting to be taken.
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PointerDown(point) => {
                self.pointer_down = true;
                match self.brush.tool {
                    Tool::Pen => {
                        if let Err(e) = self.begin_stroke(point) {
                            log::warn!("Cannot start stroke: {}", e);
                        }
                    }
                    Tool::Eraser => {
                        self.erase_near(point);
                    }
                }
            }
            SessionEvent::PointerMove(point) => match self.brush.tool {
                Tool::Pen => self.append_point(point),
                Tool::Eraser if self.pointer_down => {
                    self.erase_near(point);
                }
                Tool::Eraser => {}
            },
            SessionEvent::PointerUp => {
                self.pointer_down = false;
                self.commit_stroke();
            }
            SessionEvent::Undo => {
                self.undo();
            }
            SessionEvent::Redo => {
                self.redo();
            }
            SessionEvent::Clear => self.clear(),
            SessionEvent::SelectTool(tool) => self.brush.tool = tool,
            SessionEvent::SetColor(color) => self.brush.color = color,
            SessionEvent::SetSize(size) => {
                if size == 0 {
                    log::debug!("Ignoring brush size 0");
                } else {
                    self.brush.size = size;
                }
            }
            SessionEvent::CursorMoved { x, y, at } => self.update_local_cursor(x, y, at),
            SessionEvent::Tick(now) => self.tick(now),
            SessionEvent::Inbound(message) => self.apply_message(message),
            SessionEvent::ChannelOpened => {
                log::info!("Channel open, broadcasting cursor as {}", self.identity);
                self.channel_open = true;
            }
            SessionEvent::ChannelClosed => {
                log::info!("Channel closed, continuing locally");
                self.channel_open = false;
                self.throttle.reset();
                let peers: Vec<String> = self.presence.iter().map(|c| c.username.clone()).collect();
                self.presence.clear();
                self.effects.extend(peers.into_iter().map(Effect::PeerLeft));
            }
        }
    }

    /// Start a draft stroke with the current brush. A stroke still in
    /// progress is committed first.
    pub fn begin_stroke(&mut self, origin: Point) -> Result<(), StrokeError> {
        let stroke = Stroke::begin(self.brush.color.clone(), self.brush.size, origin)?;
        if self.draft.is_some() {
            log::debug!("Pointer pressed mid-stroke, committing the previous draft");
            self.commit_stroke();
        }
        self.effects.push(Effect::DrawDraft(stroke.clone()));
        self.draft = Some(stroke);
        Ok(())
    }

    /// Extend the draft. Does nothing while no stroke is in progress.
    pub fn append_point(&mut self, point: Point) {
        append_point(&mut self.draft, point);
        if let Some(draft) = &self.draft {
            self.effects.push(Effect::DrawDraft(draft.clone()));
        }
    }

    /// Move the draft onto the board.
    pub fn commit_stroke(&mut self) -> Option<Stroke> {
        let stroke = self.board.commit(&mut self.draft)?;
        log::debug!("Committed stroke with {} points", stroke.len());
        self.mutated();
        Some(stroke)
    }

    /// Remove every stroke within the eraser radius of `point`.
    ///
    /// Erased strokes do not go through the undo stack. A save is queued even
    /// when nothing was hit.
    pub fn erase_near(&mut self, point: Point) -> usize {
        let removed = self.board.erase_near(point, eraser_radius(self.brush.size));
        if removed > 0 {
            log::debug!("Erased {} strokes", removed);
        }
        self.mutated();
        removed
    }

    /// Undo the last stroke. Returns false (and queues nothing) on an empty board.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.board) {
            log::debug!("Nothing to undo");
            return false;
        }
        self.mutated();
        true
    }

    /// Redo the last undone stroke. Returns false (and queues nothing) if
    /// nothing was undone.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.board) {
            log::debug!("Nothing to redo");
            return false;
        }
        self.mutated();
        true
    }

    /// Remove all strokes from the board.
    pub fn clear(&mut self) {
        self.board.clear();
        self.mutated();
    }

    /// Take a remote snapshot as the new board.
    ///
    /// Local strokes are dropped; the undo stack is left as is, so a later
    /// redo may bring back a stroke the snapshot no longer has.
    pub fn replace_board(&mut self, board: Board) {
        log::debug!("Replacing board with snapshot ({} strokes)", board.len());
        self.board = board;
        self.effects.push(Effect::Redraw);
    }

    /// Apply a decoded relay message.
    pub fn apply_message(&mut self, message: Message) {
        match message {
            Message::Cursor(cursor) => {
                match self.presence.update_cursor(&cursor.username, cursor.x, cursor.y) {
                    PresenceChange::Joined => {
                        log::info!("Peer joined: {}", cursor.username);
                        let state = self.cursor_state(&cursor.username);
                        self.effects.push(Effect::PeerJoined(state));
                    }
                    PresenceChange::Moved => {
                        let state = self.cursor_state(&cursor.username);
                        self.effects.push(Effect::PeerMoved(state));
                    }
                    PresenceChange::Ignored => {}
                }
            }
            Message::Board(envelope) => self.replace_board(envelope.payload),
            Message::UserLeft(envelope) => {
                let peer = envelope.payload;
                if self.presence.remove_peer(&peer) {
                    log::info!("Peer left: {}", peer);
                    self.effects.push(Effect::PeerLeft(peer));
                } else {
                    log::debug!("Departure of unknown peer {}", peer);
                }
            }
        }
    }

    /// Offer the local cursor position for broadcast.
    ///
    /// Dropped while the channel is closed.
    pub fn update_local_cursor(&mut self, x: f64, y: f64, now: Instant) {
        if !self.channel_open {
            return;
        }
        if let Some((x, y)) = self.throttle.update(x, y, now) {
            self.broadcast_cursor(x, y);
        }
    }

    fn tick(&mut self, now: Instant) {
        if !self.channel_open {
            return;
        }
        if let Some((x, y)) = self.throttle.poll(now) {
            self.broadcast_cursor(x, y);
        }
    }

    fn broadcast_cursor(&mut self, x: f64, y: f64) {
        self.effects
            .push(Effect::Broadcast(Message::cursor(self.identity.as_str(), x, y)));
    }

    fn cursor_state(&self, peer: &str) -> CursorState {
        self.presence.get(peer).cloned().unwrap_or_else(|| CursorState {
            username: peer.to_string(),
            x: 0.0,
            y: 0.0,
        })
    }

    /// Queue redraw, then save.
    fn mutated(&mut self) {
        self.effects.push(Effect::Redraw);
        match &self.board_id {
            Some(id) => self.effects.push(Effect::Persist {
                id: id.clone(),
                board: self.board.clone(),
            }),
            None => log::debug!("Board has no id yet, not persisting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, block_on};

    fn session() -> Session {
        Session::new(Identity::from_name("LocalFox1"), Board::with_id("abc"))
    }

    fn stroke(points: &[(i32, i32)]) -> Stroke {
        Stroke {
            color: "#000".to_string(),
            size: 4,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            timestamp: 0,
        }
    }

    fn draw(session: &mut Session, points: &[(i32, i32)]) {
        let mut iter = points.iter().map(|&(x, y)| Point::new(x, y));
        if let Some(first) = iter.next() {
            session.handle(SessionEvent::PointerDown(first));
        }
        for p in iter {
            session.handle(SessionEvent::PointerMove(p));
        }
        session.handle(SessionEvent::PointerUp);
    }

    fn persist_count(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::Persist { .. }))
            .count()
    }

    fn ms(base: Instant, n: u64) -> Instant {
        base + Duration::from_millis(n)
    }

    #[test]
    fn test_draw_commits_points_in_order() {
        let mut s = session();
        draw(&mut s, &[(0, 0), (5, 5), (5, 5), (9, 1)]);

        assert_eq!(s.board().len(), 1);
        assert_eq!(
            s.board().strokes[0].points,
            vec![Point::new(0, 0), Point::new(5, 5), Point::new(5, 5), Point::new(9, 1)]
        );
        assert!(s.draft().is_none());
    }

    #[test]
    fn test_commit_emits_redraw_then_persist() {
        let mut s = session();
        draw(&mut s, &[(0, 0), (5, 5)]);

        let effects: Vec<Effect> = s
            .take_effects()
            .into_iter()
            .filter(|e| !matches!(e, Effect::DrawDraft(_)))
            .collect();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0], Effect::Redraw);
        let Effect::Persist { id, board } = &effects[1] else {
            panic!("expected persist");
        };
        assert_eq!(id, "abc");
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_pointer_up_without_draft_is_noop() {
        let mut s = session();
        s.handle(SessionEvent::PointerMove(Point::new(1, 1)));
        s.handle(SessionEvent::PointerUp);

        assert!(s.board().is_empty());
        assert!(!s.has_effects());
    }

    #[test]
    fn test_second_press_commits_previous_draft() {
        let mut s = session();
        s.handle(SessionEvent::PointerDown(Point::new(0, 0)));
        s.handle(SessionEvent::PointerMove(Point::new(1, 1)));
        s.handle(SessionEvent::PointerDown(Point::new(9, 9)));
        s.handle(SessionEvent::PointerUp);

        assert_eq!(s.board().len(), 2);
        assert_eq!(
            s.board().strokes[0].points,
            vec![Point::new(0, 0), Point::new(1, 1)]
        );
        assert_eq!(s.board().strokes[1].points, vec![Point::new(9, 9)]);
        assert_eq!(persist_count(&s.take_effects()), 2);
    }

    #[test]
    fn test_channel_events_map_to_session_events() {
        let mut s = session();
        s.handle(ChannelEvent::Joined { channel: "boards/abc".to_string() }.into());
        assert!(s.is_channel_open());

        s.handle(ChannelEvent::Message(Message::cursor("bob", 1.0, 2.0)).into());
        assert_eq!(s.presence().len(), 1);

        s.handle(ChannelEvent::Error { message: "reset".to_string() }.into());
        assert!(!s.is_channel_open());
        assert!(s.presence().is_empty());
    }

    #[test]
    fn test_invalid_brush_does_not_start_stroke() {
        let mut s = session();
        s.handle(SessionEvent::SetColor(String::new()));
        draw(&mut s, &[(0, 0), (1, 1)]);

        assert!(s.board().is_empty());
        assert!(!s.has_effects());
    }

    #[test]
    fn test_undo_redo_restores_board() {
        let mut s = session();
        draw(&mut s, &[(0, 0), (1, 1)]);
        draw(&mut s, &[(2, 2), (3, 3)]);
        let before = s.board().strokes.clone();

        assert!(s.undo());
        assert_eq!(s.board().len(), 1);
        assert!(s.redo());
        assert_eq!(s.board().strokes, before);
    }

    #[test]
    fn test_undo_redo_on_empty_emit_nothing() {
        let mut s = session();
        s.handle(SessionEvent::Undo);
        s.handle(SessionEvent::Redo);

        assert!(s.board().is_empty());
        assert!(s.take_effects().is_empty());
    }

    #[test]
    fn test_undo_persists_board() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        s.take_effects();

        s.handle(SessionEvent::Undo);
        let effects = s.take_effects();
        assert_eq!(effects[0], Effect::Redraw);
        assert_eq!(
            effects[1],
            Effect::Persist {
                id: "abc".to_string(),
                board: Board::with_id("abc"),
            }
        );
    }

    #[test]
    fn test_eraser_removes_touched_strokes() {
        let mut s = session();
        s.replace_board(Board {
            id: Some("abc".to_string()),
            strokes: vec![stroke(&[(0, 0), (100, 0)]), stroke(&[(50, 50)]), stroke(&[(500, 500)])],
        });
        s.take_effects();

        s.handle(SessionEvent::SelectTool(Tool::Eraser));
        // size 4 -> radius 12
        s.handle(SessionEvent::PointerDown(Point::new(45, 45)));
        s.handle(SessionEvent::PointerUp);

        assert_eq!(
            s.board().strokes,
            vec![stroke(&[(0, 0), (100, 0)]), stroke(&[(500, 500)])]
        );
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_eraser_drag_only_while_pressed() {
        let mut s = session();
        s.replace_board(Board {
            id: Some("abc".to_string()),
            strokes: vec![stroke(&[(10, 10)]), stroke(&[(200, 200)])],
        });
        s.handle(SessionEvent::SelectTool(Tool::Eraser));

        s.handle(SessionEvent::PointerMove(Point::new(10, 10)));
        assert_eq!(s.board().len(), 2);

        s.handle(SessionEvent::PointerDown(Point::new(400, 400)));
        s.handle(SessionEvent::PointerMove(Point::new(10, 10)));
        s.handle(SessionEvent::PointerMove(Point::new(200, 200)));
        s.handle(SessionEvent::PointerUp);
        assert!(s.board().is_empty());
    }

    #[test]
    fn test_erase_out_of_range_still_persists() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        s.take_effects();

        assert_eq!(s.erase_near(Point::new(1000, 1000)), 0);
        assert_eq!(s.board().len(), 1);
        let effects = s.take_effects();
        assert_eq!(effects[0], Effect::Redraw);
        assert_eq!(persist_count(&effects), 1);
    }

    #[test]
    fn test_clear_persists_empty_board() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        s.take_effects();

        s.handle(SessionEvent::Clear);
        assert!(s.board().is_empty());
        assert_eq!(persist_count(&s.take_effects()), 1);
    }

    #[test]
    fn test_snapshot_replaces_wholesale_and_keeps_undone() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        draw(&mut s, &[(1, 1)]);
        draw(&mut s, &[(2, 2)]);
        s.undo();
        let undone = s.history().undone().to_vec();
        s.take_effects();

        let c = stroke(&[(7, 7)]);
        s.handle(SessionEvent::Inbound(Message::board(Board {
            id: Some("abc".to_string()),
            strokes: vec![c.clone()],
        })));

        assert_eq!(s.board().strokes, vec![c]);
        assert_eq!(s.history().undone(), undone.as_slice());
        assert_eq!(s.take_effects(), vec![Effect::Redraw]);
    }

    #[test]
    fn test_redo_after_snapshot_reintroduces_stroke() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        s.undo();
        s.replace_board(Board::with_id("abc"));

        assert!(s.redo());
        assert_eq!(s.board().len(), 1);
    }

    #[test]
    fn test_cursor_from_self_is_ignored() {
        let mut s = session();
        s.handle(SessionEvent::Inbound(Message::cursor("LocalFox1", 1.0, 2.0)));

        assert!(s.presence().is_empty());
        assert!(!s.has_effects());
    }

    #[test]
    fn test_peer_cursor_join_move_leave() {
        let mut s = session();
        s.handle(SessionEvent::Inbound(Message::cursor("bob", 1.0, 2.0)));
        s.handle(SessionEvent::Inbound(Message::cursor("bob", 3.0, 4.0)));
        s.handle(SessionEvent::Inbound(Message::user_left("bob")));
        s.handle(SessionEvent::Inbound(Message::user_left("bob")));

        let bob = |x, y| CursorState {
            username: "bob".to_string(),
            x,
            y,
        };
        assert_eq!(
            s.take_effects(),
            vec![
                Effect::PeerJoined(bob(1.0, 2.0)),
                Effect::PeerMoved(bob(3.0, 4.0)),
                Effect::PeerLeft("bob".to_string()),
            ]
        );
        assert!(s.presence().is_empty());
    }

    #[test]
    fn test_cursor_throttled_while_channel_open() {
        let mut s = session();
        let t0 = Instant::now();
        s.handle(SessionEvent::ChannelOpened);
        for (n, x) in [(0, 1.0), (10, 2.0), (20, 3.0), (60, 4.0)] {
            s.handle(SessionEvent::CursorMoved {
                x,
                y: 0.0,
                at: ms(t0, n),
            });
        }

        assert_eq!(
            s.take_effects(),
            vec![
                Effect::Broadcast(Message::cursor("LocalFox1", 1.0, 0.0)),
                Effect::Broadcast(Message::cursor("LocalFox1", 4.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_tick_flushes_pending_cursor() {
        let mut s = session();
        let t0 = Instant::now();
        s.handle(SessionEvent::ChannelOpened);
        s.update_local_cursor(1.0, 1.0, t0);
        s.update_local_cursor(2.0, 2.0, ms(t0, 10));
        s.handle(SessionEvent::Tick(ms(t0, 30)));
        s.handle(SessionEvent::Tick(ms(t0, 50)));

        assert_eq!(
            s.take_effects(),
            vec![
                Effect::Broadcast(Message::cursor("LocalFox1", 1.0, 1.0)),
                Effect::Broadcast(Message::cursor("LocalFox1", 2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn test_cursor_dropped_while_channel_closed() {
        let mut s = session();
        s.update_local_cursor(1.0, 1.0, Instant::now());
        assert!(!s.has_effects());

        s.handle(SessionEvent::ChannelOpened);
        s.handle(SessionEvent::Inbound(Message::cursor("bob", 1.0, 1.0)));
        s.take_effects();
        s.handle(SessionEvent::ChannelClosed);
        assert_eq!(s.take_effects(), vec![Effect::PeerLeft("bob".to_string())]);
        assert!(!s.is_channel_open());
    }

    #[test]
    fn test_no_persist_without_board_id() {
        let mut s = Session::new(Identity::from_name("LocalFox1"), Board::new());
        draw(&mut s, &[(0, 0)]);

        let effects = s.take_effects();
        assert!(effects.contains(&Effect::Redraw));
        assert_eq!(persist_count(&effects), 0);
        assert_eq!(s.board().len(), 1);
    }

    #[test]
    fn test_snapshot_without_id_keeps_persisting() {
        let mut s = session();
        s.replace_board(Board::new());
        draw(&mut s, &[(0, 0)]);

        assert_eq!(persist_count(&s.take_effects()), 1);
    }

    #[test]
    fn test_open_creates_board_and_rewrites_location() {
        let storage = MemoryStorage::new();
        let mut s = block_on(Session::open(&storage, Identity::from_name("me"), "/")).unwrap();

        let id = s.board_id().unwrap().to_string();
        assert_eq!(
            s.take_effects(),
            vec![Effect::RewriteLocation(format!("/boards/{id}")), Effect::Redraw]
        );
        assert!(storage.get(&id).is_some());
    }

    #[test]
    fn test_open_loads_existing_board() {
        let storage = MemoryStorage::new();
        let mut board = block_on(storage.create()).unwrap();
        let id = board.id.clone().unwrap();
        board.push(stroke(&[(0, 0), (5, 5)]));
        block_on(storage.save(&id, &board)).unwrap();

        let mut s = block_on(Session::open(
            &storage,
            Identity::from_name("me"),
            &format!("/boards/{id}"),
        ))
        .unwrap();

        assert_eq!(s.board(), &board);
        assert_eq!(s.take_effects(), vec![Effect::Redraw]);
    }

    #[test]
    fn test_open_missing_board_fails() {
        let storage = MemoryStorage::new();
        let result = block_on(Session::open(&storage, Identity::from_name("me"), "/boards/nope"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_close_returns_board() {
        let mut s = session();
        draw(&mut s, &[(0, 0)]);
        s.handle(SessionEvent::PointerDown(Point::new(9, 9)));

        let board = s.close();
        assert_eq!(board.len(), 1);
    }
}
