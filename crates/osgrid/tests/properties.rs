//! Property tests for grid reference arithmetic.

use osgrid::{Distance, GridRef, TILE_SIZE};
use proptest::prelude::*;

const LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

fn letter() -> impl Strategy<Value = char> {
    (0..LETTERS.len()).prop_map(|i| LETTERS.as_bytes()[i] as char)
}

fn gridref() -> impl Strategy<Value = GridRef> {
    (letter(), letter(), 0..TILE_SIZE.as_metres(), 0..TILE_SIZE.as_metres()).prop_map(
        |(a, b, e, n)| {
            GridRef::new(&format!("{}{}", a, b), Distance::metres(e), Distance::metres(n))
                .expect("offsets are in range")
        },
    )
}

/// A grid reference string with 1-5 digits per half, in random case and spacing.
fn gridref_string() -> impl Strategy<Value = (String, String)> {
    (letter(), letter(), 1usize..=5, any::<u64>(), any::<u64>(), any::<bool>(), any::<bool>())
        .prop_map(|(a, b, digits, e, n, lower, spaced)| {
            let modulus = 10u64.pow(digits as u32);
            let letters = format!("{}{}", a, b);
            let letters = if lower { letters.to_lowercase() } else { letters };
            let easting = format!("{:0w$}", e % modulus, w = digits);
            let northing = format!("{:0w$}", n % modulus, w = digits);
            let tight = format!("{}{}{}", letters, easting, northing);
            let loose = if spaced {
                format!(" {} {} {} ", letters, easting, northing)
            } else {
                tight.clone()
            };
            (tight, loose)
        })
}

proptest! {
    #[test]
    fn format_is_canonical((tight, loose) in gridref_string()) {
        let a = GridRef::parse(&tight).unwrap();
        let b = GridRef::parse(&loose).unwrap();
        prop_assert_eq!(a, b);

        let formatted = a.to_string();
        prop_assert_eq!(&formatted, &b.to_string());
        // Formatting is a fixed point.
        let reparsed = GridRef::parse(&formatted).unwrap();
        prop_assert_eq!(reparsed, a);
        prop_assert_eq!(reparsed.to_string(), formatted);
    }

    #[test]
    fn align_is_idempotent(r in gridref(), d in 1i64..200_000) {
        let d = Distance::metres(d);
        let once = r.align(d);
        prop_assert_eq!(once.align(d), once);
        prop_assert!(once.easting() <= r.easting());
        prop_assert!(once.northing() <= r.northing());
        prop_assert!(once.easting().is_multiple_of(d));
    }

    #[test]
    fn add_then_subtract_returns_home(
        r in gridref(),
        e in -1_500_000i64..1_500_000,
        n in -1_500_000i64..1_500_000,
    ) {
        let (e, n) = (Distance::metres(e), Distance::metres(n));
        if let Ok(moved) = r.add(e, n) {
            prop_assert!(moved.easting() >= Distance::ZERO && moved.easting() < TILE_SIZE);
            prop_assert!(moved.northing() >= Distance::ZERO && moved.northing() < TILE_SIZE);
            prop_assert_eq!(moved.add(-e, -n).unwrap(), r);
            prop_assert_eq!(moved.sub(&r), (e, n));
        }
    }

    #[test]
    fn sub_is_antisymmetric(a in gridref(), b in gridref()) {
        let (ae, an) = a.sub(&b);
        let (be, bn) = b.sub(&a);
        prop_assert_eq!(ae, -be);
        prop_assert_eq!(an, -bn);
    }
}

#[test]
fn test_walk_east_across_the_s_block() {
    // Stepping one square at a time visits every square in the row in order.
    let mut r = GridRef::parse("SV 00").unwrap();
    let mut visited = vec![r.square().to_string()];
    for _ in 0..9 {
        r = r.add(TILE_SIZE, Distance::ZERO).unwrap();
        visited.push(r.square().to_string());
    }
    assert_eq!(visited, ["SV", "SW", "SX", "SY", "SZ", "TV", "TW", "TX", "TY", "TZ"]);
}

#[test]
fn test_walk_south_back_from_the_north() {
    let mut r = GridRef::parse("HP 00").unwrap();
    let mut visited = vec![r.square().to_string()];
    for _ in 0..7 {
        r = r.add(Distance::ZERO, -TILE_SIZE).unwrap();
        visited.push(r.square().to_string());
    }
    assert_eq!(visited, ["HP", "HU", "HZ", "NE", "NK", "NP", "NU", "NZ"]);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_as_canonical_string() {
    let r = GridRef::parse("sh6098654375").unwrap();
    let yaml = serde_yaml::to_string(&r).unwrap();
    assert_eq!(yaml.trim(), "SH 60986 54375");
    let back: GridRef = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, r);
}
