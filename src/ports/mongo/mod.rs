//! MongoDB-backed Persistence port adapters (component A, production side).
//!
//! DESIGN
//! ======
//! Domain types (`Board`, `Card`, `Reaction`, `Session`) are the document
//! shape verbatim (§6 "Persisted state layout" — field names and types
//! follow §3). Each store wraps one `mongodb::Collection<T>` and translates
//! the trait's preconditions into a Mongo filter, using
//! `UpdateOneConditional`-shaped `update_one` calls so a zero-`matched_count`
//! result (board not found / closed / caller not an admin) is
//! indistinguishable to Mongo and left for the service layer to reclassify
//! by re-reading, exactly as §4.1 specifies.

pub mod boards;
pub mod cards;
pub mod indexes;
pub mod reactions;
pub mod sessions;

pub use boards::MongoBoardStore;
pub use cards::MongoCardStore;
pub use reactions::MongoReactionStore;
pub use sessions::MongoSessionStore;

pub const BOARDS_COLLECTION: &str = "boards";
pub const CARDS_COLLECTION: &str = "cards";
pub const REACTIONS_COLLECTION: &str = "reactions";
pub const SESSIONS_COLLECTION: &str = "user_sessions";
