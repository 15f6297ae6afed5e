pub mod ids;
pub mod player;
pub mod price;
pub mod squad;

pub use ids::{ClubId, PlayerId, TourId};
pub use player::{Player, Position, Role};
pub use price::{InvalidPrice, Price};
pub use squad::SquadState;
