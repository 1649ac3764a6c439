// 🔎 Filters - Query engine over linked close approaches
//
// A filter is data: (attribute, comparison, value). Filters are built from
// user options, then the database keeps the approaches matching ALL of them.
//
// Unknown values never match: no time, NaN diameter, unresolved NEO.

use crate::models::LinkedApproach;
use chrono::NaiveDate;

// ============================================================================
// FILTER DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
}

impl Comparison {
    fn holds<T: PartialOrd>(&self, left: T, right: T) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Ge => left >= right,
            Comparison::Le => left <= right,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        }
    }
}

/// Which attribute of a close approach (or its NEO) a filter looks at
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Calendar date of the approach
    Date(NaiveDate),
    /// Approach distance, au
    Distance(f64),
    /// Approach velocity, km/s
    Velocity(f64),
    /// NEO diameter, km
    Diameter(f64),
    /// NEO hazard flag (only compared with Eq)
    Hazardous(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApproachFilter {
    pub comparison: Comparison,
    pub value: FilterValue,
}

impl ApproachFilter {
    pub fn new(comparison: Comparison, value: FilterValue) -> Self {
        ApproachFilter { comparison, value }
    }

    /// Check if a close approach passes this filter
    pub fn matches(&self, approach: &LinkedApproach<'_>) -> bool {
        let op = self.comparison;
        match &self.value {
            FilterValue::Date(date) => approach
                .time
                .map(|t| op.holds(t.date_naive(), *date))
                .unwrap_or(false),
            FilterValue::Distance(d) => op.holds(approach.distance, *d),
            FilterValue::Velocity(v) => op.holds(approach.velocity, *v),
            // NaN diameters fail every comparison
            FilterValue::Diameter(d) => approach
                .neo
                .map(|neo| op.holds(neo.diameter, *d))
                .unwrap_or(false),
            FilterValue::Hazardous(h) => approach
                .neo
                .map(|neo| neo.hazardous == *h)
                .unwrap_or(false),
        }
    }
}

impl std::fmt::Display for ApproachFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (attribute, value) = match &self.value {
            FilterValue::Date(d) => ("date", d.to_string()),
            FilterValue::Distance(d) => ("distance", d.to_string()),
            FilterValue::Velocity(v) => ("velocity", v.to_string()),
            FilterValue::Diameter(d) => ("diameter", d.to_string()),
            FilterValue::Hazardous(h) => ("hazardous", h.to_string()),
        };
        write!(f, "{} {} {}", attribute, self.comparison.symbol(), value)
    }
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// User-facing query options. Every field is optional; None means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

/// Turn query options into the list of filters to apply
pub fn create_filters(options: &FilterOptions) -> Vec<ApproachFilter> {
    let candidates = [
        options.date.map(|d| (Comparison::Eq, FilterValue::Date(d))),
        options.start_date.map(|d| (Comparison::Ge, FilterValue::Date(d))),
        options.end_date.map(|d| (Comparison::Le, FilterValue::Date(d))),
        options.distance_min.map(|d| (Comparison::Ge, FilterValue::Distance(d))),
        options.distance_max.map(|d| (Comparison::Le, FilterValue::Distance(d))),
        options.velocity_min.map(|v| (Comparison::Ge, FilterValue::Velocity(v))),
        options.velocity_max.map(|v| (Comparison::Le, FilterValue::Velocity(v))),
        options.diameter_min.map(|d| (Comparison::Ge, FilterValue::Diameter(d))),
        options.diameter_max.map(|d| (Comparison::Le, FilterValue::Diameter(d))),
        options.hazardous.map(|h| (Comparison::Eq, FilterValue::Hazardous(h))),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|(comparison, value)| ApproachFilter::new(comparison, value))
        .collect()
}

/// Take at most `n` items. `None` or `Some(0)` means no limit.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> impl Iterator<Item = I::Item> {
    let n = match n {
        Some(0) | None => usize::MAX,
        Some(n) => n,
    };
    iter.take(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::cd_to_datetime;
    use crate::models::{CloseApproach, NearEarthObject};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_create_filters_empty() {
        assert!(create_filters(&FilterOptions::default()).is_empty());
    }

    #[test]
    fn test_create_filters_from_options() {
        let filters = create_filters(&FilterOptions {
            start_date: Some(date("2020-01-01")),
            distance_max: Some(0.1),
            hazardous: Some(false),
            ..Default::default()
        });

        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].to_string(), "date >= 2020-01-01");
        assert_eq!(filters[1].to_string(), "distance <= 0.1");
        assert_eq!(filters[2].to_string(), "hazardous == false");
    }

    #[test]
    fn test_filter_matching() {
        let neo = NearEarthObject::from_raw(Some("433"), Some("Eros"), Some("16.84"), Some("N"));
        let approach = CloseApproach::new(cd_to_datetime("2020-Jan-15 12:00"), 0.05, 10.0)
            .with_designation("433");
        let linked = LinkedApproach::new(&approach, Some(&neo));

        let pass = [
            ApproachFilter::new(Comparison::Eq, FilterValue::Date(date("2020-01-15"))),
            ApproachFilter::new(Comparison::Ge, FilterValue::Date(date("2020-01-15"))),
            ApproachFilter::new(Comparison::Le, FilterValue::Distance(0.05)),
            ApproachFilter::new(Comparison::Ge, FilterValue::Velocity(9.5)),
            ApproachFilter::new(Comparison::Ge, FilterValue::Diameter(16.0)),
            ApproachFilter::new(Comparison::Eq, FilterValue::Hazardous(false)),
        ];
        for filter in &pass {
            assert!(filter.matches(&linked), "expected match: {}", filter);
        }

        let fail = [
            ApproachFilter::new(Comparison::Le, FilterValue::Date(date("2020-01-14"))),
            ApproachFilter::new(Comparison::Ge, FilterValue::Distance(0.1)),
            ApproachFilter::new(Comparison::Le, FilterValue::Diameter(1.0)),
            ApproachFilter::new(Comparison::Eq, FilterValue::Hazardous(true)),
        ];
        for filter in &fail {
            assert!(!filter.matches(&linked), "expected no match: {}", filter);
        }
    }

    #[test]
    fn test_unknown_values_never_match() {
        let neo = NearEarthObject::from_raw(Some("2020 AB"), None, None, None);
        let approach = CloseApproach::new(None, 0.05, 10.0).with_designation("2020 AB");
        let linked = LinkedApproach::new(&approach, Some(&neo));
        let orphan = LinkedApproach::new(&approach, None);

        let by_date = ApproachFilter::new(Comparison::Le, FilterValue::Date(date("2100-01-01")));
        let by_diameter_min = ApproachFilter::new(Comparison::Ge, FilterValue::Diameter(0.0));
        let by_diameter_max = ApproachFilter::new(Comparison::Le, FilterValue::Diameter(100.0));
        let by_hazard = ApproachFilter::new(Comparison::Eq, FilterValue::Hazardous(false));

        assert!(!by_date.matches(&linked));
        assert!(!by_diameter_min.matches(&linked));
        assert!(!by_diameter_max.matches(&linked));
        assert!(by_hazard.matches(&linked));
        assert!(!by_hazard.matches(&orphan));
    }

    #[test]
    fn test_limit() {
        assert_eq!(limit(1..=10, Some(3)).count(), 3);
        assert_eq!(limit(1..=10, Some(0)).count(), 10);
        assert_eq!(limit(1..=10, None).count(), 10);
        assert_eq!(limit(1..=2, Some(5)).count(), 2);
    }
}
