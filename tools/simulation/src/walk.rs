//! Oscillating central price
//!
//! The center starts at the lower bound and moves one tick per step,
//! turning around when it reaches either bound.

use rust_decimal::Decimal;
use types::numeric::tick;

#[derive(Debug, Clone)]
pub struct PriceWalk {
    low: Decimal,
    high: Decimal,
    center: Decimal,
    up: bool,
}

impl PriceWalk {
    /// Walk between `low` and `high`, both on the tick grid, with `low < high`.
    pub fn new(low: Decimal, high: Decimal) -> Self {
        Self {
            low,
            high,
            center: low,
            up: true,
        }
    }

    /// Walk over `[99 + margin, 101 − margin]` ticks.
    pub fn around_par(margin_ticks: i64) -> Self {
        let margin = tick() * Decimal::from(margin_ticks);
        Self::new(Decimal::from(99) + margin, Decimal::from(101) - margin)
    }

    pub fn center(&self) -> Decimal {
        self.center
    }

    /// Move one tick and return the new center.
    pub fn step(&mut self) -> Decimal {
        if self.center >= self.high {
            self.up = false;
        }
        if self.center <= self.low {
            self.up = true;
        }
        self.center = if self.up {
            self.center + tick()
        } else {
            self.center - tick()
        };
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_turns_at_bounds() {
        let low = Decimal::from(100);
        let mut walk = PriceWalk::new(low, low + tick() * Decimal::from(2));

        let at = |ticks: i64| low + tick() * Decimal::from(ticks);

        let path: Vec<Decimal> = (0..6).map(|_| walk.step()).collect();
        assert_eq!(path, vec![at(1), at(2), at(1), at(0), at(1), at(2)]);
    }

    #[test]
    fn test_around_par_stays_in_bounds() {
        let mut walk = PriceWalk::around_par(2);
        for _ in 0..2000 {
            let c = walk.step();
            assert!(c >= Decimal::from(99) && c <= Decimal::from(101));
        }
    }
}
