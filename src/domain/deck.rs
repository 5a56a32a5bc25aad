use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::{Card, Rank, Suit};
use crate::infra::{RandomSource, RngSeed};

/// Ошибки колоды. Обе означают баг в оркестраторе, а не в действиях игроков.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("Недостаточно карт: запрошено {requested}, осталось {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },

    #[error("Некорректное количество карт: {0}")]
    InvalidCount(i64),
}

/// Колода одной раздачи: перемешанные 52 карты и курсор выдачи.
///
/// Один экземпляр живёт ровно одну раздачу и не переиспользуется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    dealt: usize,
}

impl Deck {
    /// Нешафленная колода: масти s, h, d, c; внутри масти 2..A.
    pub fn ordered_52() -> Vec<Card> {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        cards
    }

    /// Перемешать колоду Fisher-Yates'ом из seed.
    ///
    /// 32-байтовый seed используется как есть, любой другой сначала хэшируется SHA256.
    pub fn new(seed: &[u8]) -> Self {
        let seed = match <[u8; 32]>::try_from(seed) {
            Ok(bytes) => RngSeed::from_bytes(bytes),
            Err(_) => RngSeed::hash_of(seed),
        };
        Self::from_seed(&seed)
    }

    pub fn from_seed(seed: &RngSeed) -> Self {
        let mut rng = seed.to_rng();
        let mut cards = Self::ordered_52();
        rng.shuffle(&mut cards);
        Deck { cards, dealt: 0 }
    }

    /// Колода для раздачи `hand_number` турнира `tournament_id`.
    pub fn for_hand(blockhash: &[u8], tournament_id: &str, hand_number: u64) -> Self {
        Self::from_seed(&RngSeed::for_hand(blockhash, tournament_id, hand_number))
    }

    /// Выдать следующие `n` карт.
    pub fn deal(&mut self, n: i64) -> Result<Vec<Card>, DeckError> {
        if n < 0 {
            return Err(DeckError::InvalidCount(n));
        }
        let n = n as usize;
        let remaining = self.remaining();
        if n > remaining {
            return Err(DeckError::InsufficientCards {
                requested: n,
                remaining,
            });
        }
        let out = self.cards[self.dealt..self.dealt + n].to_vec();
        self.dealt += n;
        Ok(out)
    }

    /// Сжечь одну карту перед выдачей борда.
    pub fn burn(&mut self) -> Result<(), DeckError> {
        self.deal(1).map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.dealt
    }

    pub fn dealt(&self) -> usize {
        self.dealt
    }
}
