use crate::models::{
    AgeGroup, Distance, EventKey, QualifyingStandards, Sex, StandardsTable, Stroke, Tier,
};

/// Qualifying time for one cell of a table. `None` means no applicable
/// standard, never a zero time.
pub fn lookup(
    table: &StandardsTable,
    sex: Sex,
    group: AgeGroup,
    stroke: Stroke,
    distance: Distance,
) -> Option<i64> {
    table.get(sex, group, EventKey::new(stroke, distance))
}

/// Qualifying time for one cell of a default tier.
pub fn qualifying_time(
    standards: &QualifyingStandards,
    tier: Tier,
    sex: Sex,
    group: AgeGroup,
    stroke: Stroke,
    distance: Distance,
) -> Option<i64> {
    lookup(&standards.tier(tier).times, sex, group, stroke, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_standards;

    #[test]
    fn test_lookup_present_and_absent() {
        let mut table = StandardsTable::new();
        table.set(
            Sex::M,
            AgeGroup::Fourteen,
            EventKey::new(Stroke::Breaststroke, Distance::M100),
            95_000,
        );

        assert_eq!(
            lookup(&table, Sex::M, AgeGroup::Fourteen, Stroke::Breaststroke, Distance::M100),
            Some(95_000)
        );
        assert_eq!(
            lookup(&table, Sex::M, AgeGroup::Fourteen, Stroke::Breaststroke, Distance::M200),
            None
        );
        assert_eq!(
            lookup(&table, Sex::F, AgeGroup::Fourteen, Stroke::Breaststroke, Distance::M100),
            None
        );
    }

    #[test]
    fn test_tier_lookup_against_defaults() {
        let standards = default_standards();

        assert_eq!(
            qualifying_time(
                &standards,
                Tier::County,
                Sex::F,
                AgeGroup::Fifteen,
                Stroke::Freestyle,
                Distance::M50
            ),
            Some(31_200)
        );
        assert_eq!(
            qualifying_time(
                &standards,
                Tier::Regional,
                Sex::M,
                AgeGroup::Thirteen,
                Stroke::Freestyle,
                Distance::M50
            ),
            Some(30_000)
        );
        assert_eq!(
            qualifying_time(
                &standards,
                Tier::National,
                Sex::M,
                AgeGroup::Thirteen,
                Stroke::Freestyle,
                Distance::M1500
            ),
            None
        );
    }
}
