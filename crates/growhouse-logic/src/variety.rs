//! Seed varieties: yield range and seed price.
//!
//! Variety only affects economics. Growth behaviour is identical across
//! varieties. Unknown names fall back to `basic`.

use rand::Rng;

/// Static description of a seed variety.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarietySpec {
    pub name: &'static str,
    pub min_yield: f64,
    pub max_yield: f64,
    pub seed_cost: f64,
}

const VARIETIES: [VarietySpec; 3] = [
    VarietySpec {
        name: "basic",
        min_yield: 50.0,
        max_yield: 100.0,
        seed_cost: 50.0,
    },
    VarietySpec {
        name: "premium",
        min_yield: 80.0,
        max_yield: 150.0,
        seed_cost: 100.0,
    },
    VarietySpec {
        name: "exotic",
        min_yield: 120.0,
        max_yield: 250.0,
        seed_cost: 200.0,
    },
];

/// All varieties in unlock order.
pub fn varieties() -> &'static [VarietySpec] {
    &VARIETIES
}

/// Whether `name` is a catalogued variety.
pub fn is_known(name: &str) -> bool {
    VARIETIES.iter().any(|v| v.name == name)
}

/// Spec for `name`, or `basic` when the name is unknown.
pub fn lookup(name: &str) -> &'static VarietySpec {
    VARIETIES
        .iter()
        .find(|v| v.name == name)
        .unwrap_or(&VARIETIES[0])
}

pub fn seed_cost(name: &str) -> f64 {
    lookup(name).seed_cost
}

/// Draw a base yield uniformly from the variety's range.
pub fn sample_base_yield(name: &str, rng: &mut impl Rng) -> f64 {
    let spec = lookup(name);
    rng.gen_range(spec.min_yield..spec.max_yield)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unknown_falls_back_to_basic() {
        assert_eq!(lookup("mystery").name, "basic");
        assert_eq!(seed_cost("mystery"), 50.0);
        assert!(!is_known("mystery"));
    }

    #[test]
    fn test_seed_costs() {
        assert_eq!(seed_cost("basic"), 50.0);
        assert_eq!(seed_cost("premium"), 100.0);
        assert_eq!(seed_cost("exotic"), 200.0);
    }

    #[test]
    fn test_yield_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for v in varieties() {
            for _ in 0..200 {
                let y = sample_base_yield(v.name, &mut rng);
                assert!(y >= v.min_yield && y < v.max_yield, "{} yield {}", v.name, y);
            }
        }
    }
}
