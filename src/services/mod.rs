//! Services (components G–J): the business-rule layer, each a plain struct
//! holding `Arc<dyn Store>` ports, a `Clock`, and — where it emits events —
//! an `Arc<dyn Broadcaster>` (§4 "Service construction").

pub mod board_service;
pub mod card_service;
pub mod presence_service;
pub mod reaction_service;

pub use board_service::{BoardService, CreateBoardInput, DeleteAuthorization};
pub use card_service::{CardFilter, CardListResult, CardQuota, CardService, CreateCardInput, LinkKind};
pub use presence_service::PresenceService;
pub use reaction_service::{ReactionQuota, ReactionService};
