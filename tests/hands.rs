use std::collections::HashSet;

use preflop_trainer::cards::{Card, Rank, Suit, deal_hole_cards};
use preflop_trainer::hands::{HandClass, HandLabel, classify, enumerate_hands};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn enumeration_yields_169_unique_hands() {
    let hands: Vec<_> = enumerate_hands().collect();
    assert_eq!(hands.len(), 169);

    let unique: HashSet<String> = hands.iter().map(|(h, _)| h.to_string()).collect();
    assert_eq!(unique.len(), 169);

    let count = |class| hands.iter().filter(|(_, c)| *c == class).count();
    assert_eq!(count(HandClass::Pair), 13);
    assert_eq!(count(HandClass::Suited), 78);
    assert_eq!(count(HandClass::Offsuit), 78);
}

#[test]
fn enumeration_is_deterministic_and_row_major() {
    let first: Vec<String> = enumerate_hands().map(|(h, _)| h.to_string()).collect();
    let second: Vec<String> = enumerate_hands().map(|(h, _)| h.to_string()).collect();
    assert_eq!(first, second);

    assert_eq!(&first[..3], &["AA", "AKs", "AQs"]);
    assert_eq!(first[13], "AKo");
    assert_eq!(first[14], "KK");
    assert_eq!(first[168], "22");

    for (idx, (hand, _)) in enumerate_hands().enumerate() {
        assert_eq!(hand.index(), idx, "{hand}");
        assert_eq!(HandLabel::from_index(idx), Some(hand));
    }
    assert_eq!(HandLabel::from_index(169), None);
}

#[test]
fn canonical_labels_put_the_high_rank_first() {
    for (hand, class) in enumerate_hands() {
        if class != HandClass::Pair {
            assert!(hand.high().outranks(hand.low()), "{hand}");
        }
        assert_eq!(classify(&hand.to_string()), Ok(class));
    }
}

#[test]
fn classify_rejects_non_canonical_labels() {
    for bad in [
        "", "A", "KAs", "AKx", "AAs", "AK", "XYs", "AKso", "1Ks", "T9 ", "aks", "AKS", "kk", "AkO",
    ] {
        let err = classify(bad).expect_err(bad);
        assert_eq!(err.label, bad);
    }
}

#[test]
fn classify_accepts_each_form() {
    assert_eq!(classify("77"), Ok(HandClass::Pair));
    assert_eq!(classify("T9s"), Ok(HandClass::Suited));
    assert_eq!(classify("72o"), Ok(HandClass::Offsuit));
}

#[test]
fn constructor_refuses_wrong_order() {
    assert!(HandLabel::new(Rank::King, Rank::Ace, HandClass::Suited).is_err());
    assert!(HandLabel::new(Rank::Ace, Rank::Ace, HandClass::Offsuit).is_err());
    assert!(HandLabel::new(Rank::Ace, Rank::King, HandClass::Pair).is_err());
    let hand = HandLabel::new(Rank::Ace, Rank::King, HandClass::Offsuit).expect("canonical");
    assert_eq!(hand.to_string(), "AKo");
}

#[test]
fn dealt_cards_map_to_canonical_labels() {
    let suited = HandLabel::from_cards(
        Card::new(Rank::Seven, Suit::Hearts),
        Card::new(Rank::Jack, Suit::Hearts),
    );
    assert_eq!(suited.to_string(), "J7s");

    let offsuit = HandLabel::from_cards(
        Card::new(Rank::Two, Suit::Clubs),
        Card::new(Rank::Ace, Suit::Spades),
    );
    assert_eq!(offsuit.to_string(), "A2o");

    let pair = HandLabel::from_cards(
        Card::new(Rank::Nine, Suit::Clubs),
        Card::new(Rank::Nine, Suit::Diamonds),
    );
    assert_eq!(pair.to_string(), "99");
}

#[test]
fn dealing_gives_two_distinct_cards() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..200 {
        let [a, b] = deal_hole_cards(&mut rng);
        assert_ne!(a, b);
    }

    let mut left = ChaCha8Rng::seed_from_u64(99);
    let mut right = ChaCha8Rng::seed_from_u64(99);
    assert_eq!(deal_hole_cards(&mut left), deal_hole_cards(&mut right));
}

#[test]
fn combo_counts_cover_the_deck() {
    let total: u32 = enumerate_hands().map(|(h, _)| h.combos()).sum();
    assert_eq!(total, 1326);
}

#[test]
fn labels_round_trip_through_json() {
    let hand: HandLabel = "KQo".parse().expect("valid");
    let json = serde_json::to_string(&hand).expect("serialize");
    assert_eq!(json, "\"KQo\"");
    assert!(serde_json::from_str::<HandLabel>("\"QKo\"").is_err());
}
