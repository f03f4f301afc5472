use crate::models::resume::YearRange;

/// Collapses year ranges into a single "years of experience" figure.
///
/// This is the career span, `max(year) - min(year)` over every start and end year.
/// Gaps and overlaps between periods are NOT reconciled: `[(2010, 2011), (2020, 2021)]`
/// counts as 11 years. A point range has `start == end`, so a single bare year is 0.
pub fn aggregate(ranges: &[YearRange]) -> u32 {
    let years = ranges.iter().flat_map(|range| [range.start, range.end]);

    let (min, max) = years.fold((i32::MAX, i32::MIN), |(min, max), year| {
        (min.min(year), max.max(year))
    });

    if min > max {
        return 0;
    }
    (max - min).unsigned_abs()
}
