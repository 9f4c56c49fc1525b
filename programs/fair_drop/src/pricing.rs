use anchor_lang::prelude::*;

use crate::errors::FairDropError;

/// Unit price as a pure function of the slot. No per-caller state, so every
/// caller observes the same price in the same slot.
pub trait PricingModel {
    fn price(&self, at_slot: u64) -> u64;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct FixedPrice {
    pub price: u64,
}

impl FixedPrice {
    pub fn new(price: u64) -> Self {
        Self { price }
    }
}

impl PricingModel for FixedPrice {
    fn price(&self, _at_slot: u64) -> u64 {
        self.price
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct AscendingStep {
    pub start_slot: u64,
    pub end_slot: u64,
    pub slots_per_step: u64,
    pub price_step: u64,
    pub start_price: u64,
    pub ceiling_price: u64,
}

impl AscendingStep {
    pub fn new(
        start_slot: u64,
        end_slot: u64,
        slots_per_step: u64,
        price_step: u64,
        start_price: u64,
        ceiling_price: u64,
    ) -> Result<Self> {
        let model = Self {
            start_slot,
            end_slot,
            slots_per_step,
            price_step,
            start_price,
            ceiling_price,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.end_slot >= self.start_slot, FairDropError::InvalidPriceModel);
        require!(self.ceiling_price >= self.start_price, FairDropError::InvalidPriceModel);
        require!(self.slots_per_step > 0, FairDropError::InvalidPriceModel);
        Ok(())
    }
}

impl PricingModel for AscendingStep {
    fn price(&self, at_slot: u64) -> u64 {
        if at_slot < self.start_slot {
            return self.start_price;
        }
        if at_slot >= self.end_slot {
            return self.ceiling_price;
        }
        let steps = (at_slot - self.start_slot) / self.slots_per_step;
        self.start_price
            .saturating_add(self.price_step.saturating_mul(steps))
            .min(self.ceiling_price)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct DescendingStep {
    pub start_slot: u64,
    pub end_slot: u64,
    pub slots_per_step: u64,
    pub price_step: u64,
    pub start_price: u64,
    pub floor_price: u64,
}

impl DescendingStep {
    pub fn new(
        start_slot: u64,
        end_slot: u64,
        slots_per_step: u64,
        price_step: u64,
        start_price: u64,
        floor_price: u64,
    ) -> Result<Self> {
        let model = Self {
            start_slot,
            end_slot,
            slots_per_step,
            price_step,
            start_price,
            floor_price,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.end_slot >= self.start_slot, FairDropError::InvalidPriceModel);
        require!(self.floor_price <= self.start_price, FairDropError::InvalidPriceModel);
        require!(self.slots_per_step > 0, FairDropError::InvalidPriceModel);
        Ok(())
    }
}

impl PricingModel for DescendingStep {
    fn price(&self, at_slot: u64) -> u64 {
        if at_slot < self.start_slot {
            return self.start_price;
        }
        if at_slot >= self.end_slot {
            return self.floor_price;
        }
        let steps = (at_slot - self.start_slot) / self.slots_per_step;
        self.start_price
            .saturating_sub(self.price_step.saturating_mul(steps))
            .max(self.floor_price)
    }
}

/// The price model a sale is configured with, stored by value in the sale.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum PriceModel {
    Fixed(FixedPrice),
    AscendingStep(AscendingStep),
    DescendingStep(DescendingStep),
}

impl PriceModel {
    /// Instruction input bypasses the constructors, so the sale re-checks here.
    pub fn validate(&self) -> Result<()> {
        match self {
            PriceModel::Fixed(_) => Ok(()),
            PriceModel::AscendingStep(m) => m.validate(),
            PriceModel::DescendingStep(m) => m.validate(),
        }
    }
}

impl PricingModel for PriceModel {
    fn price(&self, at_slot: u64) -> u64 {
        match self {
            PriceModel::Fixed(m) => m.price(at_slot),
            PriceModel::AscendingStep(m) => m.price(at_slot),
            PriceModel::DescendingStep(m) => m.price(at_slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u64 = 1_000_000_000;

    fn descending(start: u64) -> DescendingStep {
        DescendingStep::new(start, start + 1_000, 10, ONE / 5, ONE, ONE / 2).unwrap()
    }

    #[test]
    fn fixed_price_ignores_slot() {
        let m = FixedPrice::new(ONE);
        assert_eq!(m.price(0), ONE);
        assert_eq!(m.price(u64::MAX), ONE);
    }

    #[test]
    fn ascending_rejects_bad_params() {
        assert!(AscendingStep::new(1_000, 0, 10, ONE / 10, ONE, 2 * ONE).is_err());
        assert!(AscendingStep::new(0, 1_000, 10, ONE / 10, ONE, ONE / 2).is_err());
        assert!(AscendingStep::new(0, 1_000, 0, ONE / 10, ONE, 2 * ONE).is_err());
    }

    #[test]
    fn ascending_steps_up_and_clamps() {
        let start = 500;
        let m = AscendingStep::new(start, start + 1_000, 10, ONE / 10, ONE, 2 * ONE).unwrap();

        assert_eq!(m.price(start - 1), ONE);
        assert_eq!(m.price(start + 9), ONE);
        assert_eq!(m.price(start + 10), ONE + ONE / 10);
        assert_eq!(m.price(start + 50), ONE + 5 * (ONE / 10));
        // ten steps reach the ceiling, more steps stay there
        assert_eq!(m.price(start + 100), 2 * ONE);
        assert_eq!(m.price(start + 990), 2 * ONE);
        assert_eq!(m.price(start + 1_500), 2 * ONE);
    }

    #[test]
    fn descending_rejects_bad_params() {
        assert!(DescendingStep::new(1_000, 0, 10, ONE / 10, ONE, ONE / 2).is_err());
        assert!(DescendingStep::new(0, 1_000, 10, ONE / 10, ONE / 2, ONE).is_err());
    }

    #[test]
    fn descending_reaches_floor_exactly() {
        let b = 100;
        let m = descending(b);
        assert_eq!(m.price(b), ONE);
        assert_eq!(m.price(b + 9), ONE);
        assert_eq!(m.price(b + 10), ONE - ONE / 5);
        // 1.0 - 3 * 0.2 = 0.4, clamped to the 0.5 floor
        assert_eq!(m.price(b + 30), ONE / 2);
        assert_eq!(m.price(b + 2_000), ONE / 2);
    }

    #[test]
    fn descending_saturates_instead_of_underflowing() {
        let m = DescendingStep::new(0, 10_000, 1, ONE, ONE, 0).unwrap();
        assert_eq!(m.price(5_000), 0);
    }

    #[test]
    fn enum_dispatches_to_variant() {
        let b = 100;
        let model = PriceModel::DescendingStep(descending(b));
        assert!(model.validate().is_ok());
        assert_eq!(model.price(b + 30), ONE / 2);

        let bad = PriceModel::AscendingStep(AscendingStep {
            start_slot: 10,
            end_slot: 5,
            slots_per_step: 1,
            price_step: 1,
            start_price: 1,
            ceiling_price: 2,
        });
        assert!(bad.validate().is_err());
    }
}
