use tilekit_core::config::CardinalPriority;
use tilekit_core::direction::Direction;
use tilekit_core::error::SpriteError;

#[test]
fn canonical_order_is_clockwise_from_down() {
    let names: Vec<String> = Direction::CANONICAL.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        names,
        [
            "down",
            "down_right",
            "right",
            "up_right",
            "up",
            "up_left",
            "left",
            "down_left"
        ]
    );
    for (i, d) in Direction::CANONICAL.iter().enumerate() {
        assert_eq!(d.canonical_index().unwrap(), i);
        assert_eq!(Direction::from_canonical_index(i), Some(*d));
    }
}

#[test]
fn clockwise_walk_wraps_around() {
    let mut d = Direction::DOWN;
    for _ in 0..8 {
        d = d.next_clockwise().unwrap();
    }
    assert_eq!(d, Direction::DOWN);
    assert_eq!(
        Direction::DOWN_LEFT.next_clockwise().unwrap(),
        Direction::DOWN
    );
}

#[test]
fn non_canonical_bits_are_rejected() {
    for bits in [0b0000, 0b0011, 0b1100, 0b0111, 0b1111] {
        let d = Direction::from_bits(bits);
        match d.canonical_index() {
            Err(SpriteError::InvalidDirection(b)) => assert_eq!(b, bits),
            other => panic!("expected InvalidDirection for {:#06b}, got {:?}", bits, other),
        }
        assert!(d.name().is_none());
    }
    assert_eq!(Direction::ANY.bits(), 0b1111);
}

#[test]
fn cardinal_reduction_follows_priority() {
    let v = CardinalPriority::VerticalFirst;
    let h = CardinalPriority::HorizontalFirst;
    assert_eq!(Direction::UP_LEFT.to_cardinal(v).unwrap(), Direction::UP);
    assert_eq!(Direction::UP_LEFT.to_cardinal(h).unwrap(), Direction::LEFT);
    assert_eq!(Direction::DOWN_RIGHT.cardinal_index(v).unwrap(), 0);
    assert_eq!(Direction::DOWN_RIGHT.cardinal_index(h).unwrap(), 1);
    for (i, d) in Direction::CARDINAL.iter().enumerate() {
        assert_eq!(d.cardinal_index(v).unwrap(), i);
        assert_eq!(d.cardinal_index(h).unwrap(), i);
    }
}

#[test]
fn parses_names_and_compass_aliases() {
    assert_eq!("up-left".parse::<Direction>().unwrap(), Direction::UP_LEFT);
    assert_eq!("NE".parse::<Direction>().unwrap(), Direction::UP_RIGHT);
    assert_eq!("s".parse::<Direction>().unwrap(), Direction::DOWN);
    assert!("sideways".parse::<Direction>().is_err());
    let json = serde_json::to_string(&Direction::DOWN_LEFT).unwrap();
    assert_eq!(json, "\"down_left\"");
    let back: Direction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Direction::DOWN_LEFT);
}
