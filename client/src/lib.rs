//! # Battle Arena Client
//!
//! Client for a real-time multiplayer top-down shooter. The server is
//! authoritative for everything that matters (movement validation, bullets,
//! hits, the room state machine); this crate is presentation, input capture,
//! and a thin state-synchronization layer over a binary socket protocol.
//!
//! ## Architecture
//!
//! - [`session`] — the facade everything else talks to: room create/join
//!   over HTTP, thin command emitters, and the single nullable local player
//!   id that is the only durable piece of client identity.
//! - [`network`] — one WebSocket per active room membership; binary frames
//!   in and out, fire-and-forget sends, teardown on any close.
//! - [`dispatch`] — single-slot-per-tag subscription registry. Envelopes
//!   that arrive before a subscriber exists are buffered (most recent one
//!   only) and replayed synchronously at subscribe time, bridging the race
//!   between socket connect and UI mount.
//! - [`game`] — the local snapshot reducer: folds Spawn/Move/Shoot/Hit/Kick
//!   into `{players, bullets, map}`. It mirrors server-announced truth and
//!   never predicts.
//! - [`lobby`] — pre-match roster and ready-state bookkeeping, including
//!   the host privilege rules.
//! - [`input`] — key polling for the fixed-rate movement and fire timers.
//! - [`rendering`] — paints the latest snapshot, camera locked to the local
//!   player.
//! - [`app`] — the lobby and match run loops tying the above together on a
//!   single cooperative task.
//!
//! The whole layer is single-threaded and event-driven: inbound frames,
//! outbound command timers, and the render cadence interleave on one task,
//! so shared state is plain `Rc<RefCell<_>>` slots with no locking.

pub mod app;
pub mod dispatch;
pub mod game;
pub mod input;
pub mod lobby;
pub mod network;
pub mod rendering;
pub mod session;
