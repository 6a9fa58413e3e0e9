//! Horse name generation
//!
//! Names are "Adjective Colour" or "Adjective Animal", chosen with even odds.

use rand::Rng;
use std::collections::HashSet;

const ADJECTIVES: [&str; 40] = [
    "Bold", "Brave", "Bright", "Calm", "Clever", "Daring", "Eager", "Fierce", "Gentle", "Golden",
    "Grand", "Happy", "Hidden", "Honest", "Jolly", "Keen", "Lucky", "Mighty", "Noble", "Proud",
    "Quick", "Quiet", "Rapid", "Royal", "Rustic", "Silent", "Silver", "Sly", "Steady", "Stormy",
    "Swift", "Tall", "Tender", "Thunder", "Velvet", "Wild", "Windy", "Wise", "Young", "Zesty",
];

const COLOURS: [&str; 20] = [
    "Amber", "Azure", "Black", "Blue", "Bronze", "Chestnut", "Cobalt", "Copper", "Crimson", "Ebony",
    "Emerald", "Gray", "Indigo", "Ivory", "Jade", "Maroon", "Olive", "Ruby", "Scarlet", "White",
];

const ANIMALS: [&str; 30] = [
    "Badger", "Bear", "Bison", "Cheetah", "Comet", "Coyote", "Crane", "Eagle", "Falcon", "Fox",
    "Gazelle", "Hawk", "Heron", "Jaguar", "Lynx", "Mustang", "Otter", "Owl", "Panther", "Puma",
    "Raven", "Sparrow", "Stag", "Stallion", "Tiger", "Viper", "Wolf", "Wolverine", "Wren", "Zebra",
];

/// Attempts at drawing a fresh name before falling back to a numbered one
const MAX_NAME_ATTEMPTS: usize = 64;

/// Generate a single random two-word name
pub fn generate_horse_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let second = if rng.gen_bool(0.5) {
        COLOURS[rng.gen_range(0..COLOURS.len())]
    } else {
        ANIMALS[rng.gen_range(0..ANIMALS.len())]
    };
    format!("{} {}", adjective, second)
}

/// Generate a name not yet in `used`, and record it there
///
/// Retries on collision. A degenerate random source that keeps producing the
/// same name gets a numeric suffix instead of looping forever.
pub fn generate_unique_name<R: Rng + ?Sized>(rng: &mut R, used: &mut HashSet<String>) -> String {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = generate_horse_name(rng);
        if used.insert(name.clone()) {
            return name;
        }
    }

    let base = generate_horse_name(rng);
    let mut n = 2;
    loop {
        let candidate = format!("{} {}", base, roman(n));
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"), (900, "CM"), (500, "D"), (400, "CD"), (100, "C"), (90, "XC"),
        (50, "L"), (40, "XL"), (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
