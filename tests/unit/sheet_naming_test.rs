// Property-based tests for sheet naming
//
// Every name a workbook hands out must be accepted by the spreadsheet
// writer: at most 31 characters, none of \ / * ? : [ ], no apostrophe at
// either end, and unique within the workbook regardless of case.

use std::collections::HashSet;

use proptest::prelude::*;

use shop_report::reports::models::{clean_sheet_name, ReportDocument, SheetNamer, MAX_SHEET_NAME_CHARS};

const FORBIDDEN: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

#[test]
fn test_documented_examples() {
    assert_eq!(clean_sheet_name("A/B*C"), "ABC");
    assert_eq!(clean_sheet_name(&"x".repeat(40)).chars().count(), 31);
    assert_eq!(clean_sheet_name("Kids'"), "Kids");
    assert_eq!(clean_sheet_name("'Shop"), "Shop");
    assert_eq!(clean_sheet_name("Joe's Bar"), "Joe's Bar");

    let mut namer = SheetNamer::new();
    assert_eq!(namer.claim("Store"), "Store");
    assert_eq!(namer.claim("Store"), "Store_2");
}

#[test]
fn test_document_names_follow_insertion_order() {
    let mut document = ReportDocument::new();
    document.add_sheet("周报");
    document.add_sheet("门店/A");
    document.add_sheet("门店A");
    assert_eq!(document.sheet_names(), vec!["周报", "门店A", "门店A_2"]);
}

proptest! {
    #[test]
    fn test_cleaned_names_are_valid(raw in "\\PC{0,60}") {
        let name = clean_sheet_name(&raw);
        prop_assert!(!name.is_empty());
        prop_assert!(name.chars().count() <= MAX_SHEET_NAME_CHARS);
        prop_assert!(!name.chars().any(|c| FORBIDDEN.contains(&c)));
        prop_assert!(!name.starts_with('\'') && !name.ends_with('\''), "apostrophe edge: {}", name);
    }

    #[test]
    fn test_apostrophe_heavy_names_are_valid(raw in "['a-z ]{0,40}") {
        let name = clean_sheet_name(&raw);
        prop_assert!(!name.is_empty());
        prop_assert!(name.chars().count() <= MAX_SHEET_NAME_CHARS);
        prop_assert!(!name.starts_with('\'') && !name.ends_with('\''), "apostrophe edge: {}", name);
    }

    #[test]
    fn test_claimed_names_are_unique_and_valid(
        raws in prop::collection::vec("[a-zA-Z门店/*']{0,40}", 1..40)
    ) {
        let mut namer = SheetNamer::new();
        let mut seen = HashSet::new();

        for raw in &raws {
            let name = namer.claim(raw);
            prop_assert!(name.chars().count() <= MAX_SHEET_NAME_CHARS, "too long: {}", name);
            prop_assert!(!name.chars().any(|c| FORBIDDEN.contains(&c)));
            prop_assert!(!name.starts_with('\'') && !name.ends_with('\''), "apostrophe edge: {}", name);
            prop_assert!(seen.insert(name.to_lowercase()), "duplicate: {}", name);
        }
    }
}
