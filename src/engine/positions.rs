//! Позиции внутри раздачи: индексы кнопки, блайндов и первого ходящего
//! в списке игроков, упорядоченном по местам.

use crate::domain::SeatIndex;

/// Индекс кнопки в списке мест (по возрастанию).
///
/// Если на месте кнопки никого нет, кнопкой считается игрок перед
/// первым занятым местом после неё.
pub fn button_index(seats: &[SeatIndex], button_seat: SeatIndex) -> usize {
    let n = seats.len();
    if n == 0 {
        return 0;
    }
    if let Some(idx) = seats.iter().position(|&s| s == button_seat) {
        return idx;
    }
    let after = seats.iter().position(|&s| s > button_seat).unwrap_or(0);
    (after + n - 1) % n
}

/// (SB, BB). В хедз-апе кнопка ставит SB. Иначе первые два слева от кнопки.
pub fn blind_indices(n: usize, button: usize) -> (usize, usize) {
    if n == 2 {
        (button, (button + 1) % 2)
    } else {
        ((button + 1) % n, (button + 2) % n)
    }
}

/// Кто ходит первым на префлопе (в хедз-апе кнопка, иначе слева от BB).
pub fn preflop_first_to_act(n: usize, button: usize) -> usize {
    if n == 2 {
        button
    } else {
        (button + 3) % n
    }
}

/// Кто ходит первым на постфлопе: первый слева от кнопки.
pub fn postflop_first_to_act(n: usize, button: usize) -> usize {
    (button + 1) % n
}
