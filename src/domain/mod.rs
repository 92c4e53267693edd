//! The consistent data model: boards, cards, reactions, sessions.
//!
//! DESIGN
//! ======
//! Pure types plus the small amount of logic that is a property of the type
//! itself (e.g. `Board::is_admin`). Business rules that span multiple
//! entities or a store live in `crate::services`, not here.

pub mod board;
pub mod card;
pub mod ids;
pub mod reaction;
pub mod session;
pub mod time;

pub use board::{Board, BoardLifecycle, BoardView, Column};
pub use card::{Card, CardType, CardView};
pub use ids::{BoardId, CardId, IdentityHash, ReactionId, ShareableLink};
pub use reaction::{Reaction, ReactionKind};
pub use session::{ActiveSession, Session, Subscriber};
pub use time::Timestamp;
