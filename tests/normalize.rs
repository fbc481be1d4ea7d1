use csv_insights::{
    config::DateOrder,
    normalize::{StockStatus, normalize_date, parse_number, parse_stock_status, trim_to_option},
    rows::clamp_rating,
};
use proptest::prelude::*;

#[test]
fn parse_number_handles_currency_and_separators() {
    assert_eq!(parse_number(Some("£1,234.50")), Some(1234.50));
    assert_eq!(parse_number(Some("$10,000")), Some(10000.0));
    assert_eq!(parse_number(Some("€40")), Some(40.0));
    assert_eq!(parse_number(Some("-3.5")), Some(-3.5));
}

#[test]
fn parse_number_degrades_to_none() {
    assert_eq!(parse_number(Some("abc")), None);
    assert_eq!(parse_number(Some("")), None);
    assert_eq!(parse_number(Some("   ")), None);
    assert_eq!(parse_number(Some("NaN")), None);
    assert_eq!(parse_number(None), None);
}

#[test]
fn parse_stock_status_maps_token_sets() {
    for token in ["Yes", "Y", "In Stock", "instock", "TRUE", "t", "1"] {
        assert_eq!(
            parse_stock_status(Some(token)),
            Some(StockStatus::InStock),
            "token {token:?}"
        );
    }
    for token in ["0", "OOS", "out of stock", "No", "f"] {
        assert_eq!(
            parse_stock_status(Some(token)),
            Some(StockStatus::OutOfStock),
            "token {token:?}"
        );
    }
}

#[test]
fn parse_stock_status_separates_unknown_from_absent() {
    assert_eq!(parse_stock_status(Some("maybe")), Some(StockStatus::Unknown));
    assert_eq!(parse_stock_status(Some("")), None);
    assert_eq!(parse_stock_status(Some("  ")), None);
    assert_eq!(parse_stock_status(None), None);
}

#[test]
fn normalize_date_keeps_canonical_input() {
    assert_eq!(
        normalize_date(Some("2024-03-14"), DateOrder::MonthFirst).as_deref(),
        Some("2024-03-14")
    );
    assert_eq!(
        normalize_date(Some(" 2024-03-14 "), DateOrder::DayFirst).as_deref(),
        Some("2024-03-14")
    );
}

#[test]
fn normalize_date_reformats_permissive_layouts() {
    let cases = [
        ("03/14/2024", "2024-03-14"),
        ("March 14, 2024", "2024-03-14"),
        ("14 Mar 2024", "2024-03-14"),
        ("2024/3/14", "2024-03-14"),
        ("2024-03-14 08:15:00", "2024-03-14"),
        ("2024-03-14T08:15:00.250", "2024-03-14"),
        ("2024-03-14T08:15:00Z", "2024-03-14"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            normalize_date(Some(input), DateOrder::MonthFirst).as_deref(),
            Some(expected),
            "input {input:?}"
        );
    }
}

#[test]
fn normalize_date_follows_configured_order_for_ambiguous_input() {
    assert_eq!(
        normalize_date(Some("03/04/2024"), DateOrder::MonthFirst).as_deref(),
        Some("2024-03-04")
    );
    assert_eq!(
        normalize_date(Some("03/04/2024"), DateOrder::DayFirst).as_deref(),
        Some("2024-04-03")
    );
    // only one reading is a valid calendar date
    assert_eq!(
        normalize_date(Some("14/03/2024"), DateOrder::MonthFirst).as_deref(),
        Some("2024-03-14")
    );
}

#[test]
fn normalize_date_rejects_unparseable_text() {
    assert_eq!(normalize_date(Some("not a date"), DateOrder::MonthFirst), None);
    assert_eq!(normalize_date(Some("13/13/2024"), DateOrder::MonthFirst), None);
    assert_eq!(normalize_date(Some(""), DateOrder::MonthFirst), None);
    assert_eq!(normalize_date(None, DateOrder::MonthFirst), None);
}

#[test]
fn trim_to_option_treats_blank_as_none() {
    assert_eq!(trim_to_option(Some("  Lamp ")).as_deref(), Some("Lamp"));
    assert_eq!(trim_to_option(Some(" \t ")), None);
    assert_eq!(trim_to_option(None), None);
}

#[test]
fn clamp_rating_bounds_values() {
    assert_eq!(clamp_rating(7.2), 5.0);
    assert_eq!(clamp_rating(-1.0), 0.0);
    assert_eq!(clamp_rating(3.5), 3.5);
    assert!(clamp_rating(-0.0).is_sign_positive());
}

proptest! {
    #[test]
    fn parse_number_never_returns_non_finite(raw in ".{0,24}") {
        if let Some(value) = parse_number(Some(&raw)) {
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn parse_number_reads_formatted_amounts(whole in 0u32..10_000_000, cents in 0u32..100) {
        let digits = whole.to_string();
        let mut grouped = String::new();
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let text = format!("${grouped}.{cents:02}");
        let expected: f64 = format!("{whole}.{cents:02}").parse().unwrap();
        prop_assert_eq!(parse_number(Some(&text)), Some(expected));
    }

    #[test]
    fn normalized_dates_are_canonical(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
        let text = format!("{month}/{day}/{year}");
        let normalized = normalize_date(Some(&text), DateOrder::MonthFirst);
        prop_assert_eq!(normalized, Some(format!("{year:04}-{month:02}-{day:02}")));
    }

    #[test]
    fn clamped_ratings_stay_in_range(value in -1.0e6f64..1.0e6) {
        let clamped = clamp_rating(value);
        prop_assert!((0.0..=5.0).contains(&clamped));
    }
}
