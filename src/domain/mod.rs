//! Доменная модель покера: карты, колода, игроки, столы, блайнды, турнир.

pub mod blinds;
pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;
pub mod tournament;

/// Адрес кошелька агента: его единственный идентификатор в движке.
pub type Wallet = String;
/// Индекс места за столом (0..9).
pub type SeatIndex = u8;
pub type TableId = String;
pub type TournamentId = String;
pub type HandId = String;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use blinds::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
pub use tournament::*;
