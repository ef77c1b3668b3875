pub mod dto;
pub mod response;
mod roster;
mod router;
pub mod validation;

pub use roster::roster_router;
pub use router::{AppState, create_router};
