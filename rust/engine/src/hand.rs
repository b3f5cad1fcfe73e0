use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Comparable strength of a five-card hand: category first, then the tie-break key.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks, zero padded
    pub kickers: [u8; 5],
}

/// Winning five cards out of a larger set, with a description for display.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BestHand {
    pub strength: HandStrength,
    pub cards: [Card; 5],
    pub description: String,
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Scores exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        rank_counts[rank_val(c.rank) as usize] += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut uniq: Vec<u8> = (2..=14u8).filter(|&r| rank_counts[r as usize] > 0).collect();
    let straight_high = if uniq.len() == 5 {
        detect_straight_high(&uniq)
    } else {
        None
    };

    if let (true, Some(high)) = (is_flush, straight_high) {
        let category = if high == 14 {
            Category::RoyalFlush
        } else {
            Category::StraightFlush
        };
        return HandStrength {
            category,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return HandStrength {
            category: Category::FourOfAKind,
            kickers: [quad, kicker, 0, 0, 0],
        };
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return HandStrength {
            category: Category::FullHouse,
            kickers: [trip, pair, 0, 0, 0],
        };
    }

    if is_flush {
        return HandStrength {
            category: Category::Flush,
            kickers: top_five(cards),
        };
    }

    if let Some(high) = straight_high {
        return HandStrength {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let (trip_ranks, pair_ranks, mut singles) = classify_multiples(&rank_counts);
    singles.sort_unstable_by(|a, b| b.cmp(a));
    if let Some(t) = trip_ranks.first().copied() {
        return HandStrength {
            category: Category::ThreeOfAKind,
            kickers: padded(&[t], &singles),
        };
    }
    if pair_ranks.len() >= 2 {
        let high = pair_ranks[pair_ranks.len() - 1];
        let low = pair_ranks[pair_ranks.len() - 2];
        return HandStrength {
            category: Category::TwoPair,
            kickers: padded(&[high, low], &singles),
        };
    }
    if let Some(p) = pair_ranks.first().copied() {
        return HandStrength {
            category: Category::OnePair,
            kickers: padded(&[p], &singles),
        };
    }

    uniq.reverse();
    HandStrength {
        category: Category::HighCard,
        kickers: padded(&[], &uniq),
    }
}

/// Best five-card hand among all combinations of `cards`. `None` below five cards.
///
/// When several combinations score the same, the first one enumerated is kept.
pub fn evaluate_best(cards: &[Card]) -> Option<BestHand> {
    let mut best: Option<(HandStrength, [Card; 5])> = None;
    for idx in combinations(cards.len()) {
        let five = idx.map(|i| cards[i]);
        let strength = evaluate_five(&five);
        let better = match &best {
            Some((s, _)) => compare_hands(&strength, s).is_gt(),
            None => true,
        };
        if better {
            best = Some((strength, five));
        }
    }
    best.map(|(strength, cards)| BestHand {
        description: strength.describe(),
        strength,
        cards,
    })
}

/// Hold'em convenience: two hole cards plus the board.
pub fn evaluate_holdem(hole: [Card; 2], board: &[Card]) -> Option<BestHand> {
    let mut all = Vec::with_capacity(board.len() + 2);
    all.extend_from_slice(board);
    all.extend_from_slice(&hole);
    evaluate_best(&all)
}

pub fn evaluate_hand(cards: &[Card; 7]) -> HandStrength {
    let first = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    combinations(7)
        .into_iter()
        .skip(1)
        .map(|idx| evaluate_five(&idx.map(|i| cards[i])))
        .fold(first, |best, s| if s > best { s } else { best })
}

impl HandStrength {
    /// Human description, e.g. "a full house (Kings full of 7s)".
    pub fn describe(&self) -> String {
        let name = |v: u8| Rank::from_u8(v).map(Rank::name).unwrap_or("?");
        let k = &self.kickers;
        match self.category {
            Category::RoyalFlush => "a royal flush".to_string(),
            Category::StraightFlush => format!("a straight flush (high card {})", name(k[0])),
            Category::FourOfAKind => format!("four of a kind ({}s)", name(k[0])),
            Category::FullHouse => {
                format!("a full house ({}s full of {}s)", name(k[0]), name(k[1]))
            }
            Category::Flush => format!("a flush (high card {})", name(k[0])),
            Category::Straight => format!("a straight to {}", name(k[0])),
            Category::ThreeOfAKind => format!("three of a kind ({}s)", name(k[0])),
            Category::TwoPair => format!("two pair ({}s and {}s)", name(k[0]), name(k[1])),
            Category::OnePair => format!("a pair of {}s", name(k[0])),
            Category::HighCard => format!("high card {}", name(k[0])),
        }
    }
}

/// Lexicographic 5-index combinations of `0..n`.
fn combinations(n: usize) -> Vec<[usize; 5]> {
    let mut out = Vec::new();
    if n < 5 {
        return out;
    }
    let mut idx = [0, 1, 2, 3, 4];
    loop {
        out.push(idx);
        // rightmost slot that can still move
        let Some(i) = (0..5).rev().find(|&i| idx[i] < n - 5 + i) else {
            return out;
        };
        idx[i] += 1;
        for j in i + 1..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

fn rank_val(r: Rank) -> u8 {
    r as u8
}

fn top_five(cards: &[Card; 5]) -> [u8; 5] {
    let mut k = cards.map(|c| rank_val(c.rank));
    k.sort_unstable_by(|a, b| b.cmp(a));
    k
}

fn padded(lead: &[u8], rest: &[u8]) -> [u8; 5] {
    let mut k = [0u8; 5];
    for (slot, v) in k.iter_mut().zip(lead.iter().chain(rest.iter())) {
        *slot = *v;
    }
    k
}

fn detect_straight_high(sorted_unique_ranks: &[u8]) -> Option<u8> {
    if sorted_unique_ranks.is_empty() {
        return None;
    }
    // Ensure ascending order
    let mut v = sorted_unique_ranks.to_vec();
    v.sort_unstable();
    // Ace-low straight support: treat Ace as 1 additionally
    if v.binary_search(&14).is_ok() {
        v.insert(0, 1);
    }

    let mut run = 1;
    let mut best_high = 0u8;
    for i in 1..v.len() {
        if v[i] == v[i - 1] + 1 {
            run += 1;
            if run >= 5 {
                best_high = v[i];
            }
        } else if v[i] != v[i - 1] {
            // break in sequence
            run = 1;
        }
    }
    if best_high == 0 {
        None
    } else {
        Some(best_high)
    }
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let trip = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 3)?;
    let pair = (2..=14u8)
        .rev()
        .find(|&r| r != trip && rank_counts[r as usize] >= 2)?;
    Some((trip, pair))
}

// ascending rank order within each group
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in 2..=14u8 {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_cards_give_twenty_one_combinations() {
        let combos = combinations(7);
        assert_eq!(combos.len(), 21);
        assert_eq!(combos[0], [0, 1, 2, 3, 4]);
        assert_eq!(combos[20], [2, 3, 4, 5, 6]);
        assert!(combinations(4).is_empty());
        assert_eq!(combinations(5).len(), 1);
    }

    #[test]
    fn wheel_is_five_high() {
        assert_eq!(detect_straight_high(&[2, 3, 4, 5, 14]), Some(5));
        assert_eq!(detect_straight_high(&[10, 11, 12, 13, 14]), Some(14));
        assert_eq!(detect_straight_high(&[2, 3, 4, 5, 13]), None);
    }

    #[test]
    fn padded_fills_from_lead_then_rest() {
        assert_eq!(padded(&[9], &[14, 7, 3]), [9, 14, 7, 3, 0]);
        assert_eq!(padded(&[], &[14, 13, 9, 5, 2]), [14, 13, 9, 5, 2]);
    }
}
