use rust_decimal::Decimal;

use super::course::round_ms;
use crate::error::{CoreError, Result};
use crate::models::{AgeGroup, EventKey, Sex, StandardsTable};

/// Multiplies every cell by `factor`, rounding to the nearest millisecond.
pub fn scale(table: &StandardsTable, factor: Decimal) -> Result<StandardsTable> {
    if factor <= Decimal::ZERO {
        return Err(CoreError::InvalidFactor(factor));
    }
    Ok(scale_cells(table, factor))
}

/// Unchecked scaling for factors known to be positive. A non-positive
/// factor yields an empty table, since every scaled cell is cleared.
pub(crate) fn scale_cells(table: &StandardsTable, factor: Decimal) -> StandardsTable {
    table
        .cells()
        .map(|(sex, group, key, ms)| (sex, group, key, round_ms(Decimal::from(ms) * factor)))
        .collect()
}

/// Derives a tier from a base table. Overrides are applied after scaling,
/// whatever order the builder calls were made in.
#[derive(Debug, Clone)]
pub struct StandardsTableBuilder<'a> {
    base: &'a StandardsTable,
    factor: Decimal,
    overrides: Vec<(Sex, AgeGroup, EventKey, i64)>,
}

impl<'a> StandardsTableBuilder<'a> {
    pub fn from_base(base: &'a StandardsTable) -> Self {
        Self {
            base,
            factor: Decimal::ONE,
            overrides: Vec::new(),
        }
    }

    pub fn scaled(mut self, factor: Decimal) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_override(mut self, sex: Sex, group: AgeGroup, key: EventKey, time_ms: i64) -> Self {
        self.overrides.push((sex, group, key, time_ms));
        self
    }

    pub fn build(self) -> Result<StandardsTable> {
        let mut table = scale(self.base, self.factor)?;
        for (sex, group, key, time_ms) in self.overrides {
            table.set(sex, group, key, time_ms);
        }
        Ok(table)
    }
}
