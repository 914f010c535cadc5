// Property-based tests for incremental recalculation.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use sheetcalc::{DefaultRules, Spreadsheet};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const CELLS: usize = 6;

fn cell(i: usize) -> String {
    format!("A{}", i + 1)
}

/// Contents a user might type: numbers, text, formulas over nearby cells, or nothing.
fn arb_contents() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (0..100u32).prop_map(|n| n.to_string()),
        1 => Just("label".to_string()),
        1 => Just(String::new()),
        3 => (0..CELLS, 0..CELLS).prop_map(|(a, b)| format!("={} + {}", cell(a), cell(b))),
        2 => (0..CELLS, 0..5u32).prop_map(|(a, n)| format!("={} / {}", cell(a), n)),
    ]
}

fn arb_edits() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0..CELLS, arb_contents()), 1..40)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    /// After any edit sequence, cached values match a sheet rebuilt from scratch.
    #[test]
    fn prop_incremental_matches_rebuild(edits in arb_edits()) {
        let mut sheet = Spreadsheet::new();
        for (i, contents) in &edits {
            let before = sheet.records();
            match sheet.set_contents_of_cell(&cell(*i), contents) {
                Ok(order) => {
                    prop_assert_eq!(&order[0], &cell(*i));
                }
                Err(err) => {
                    prop_assert!(err.is_circular());
                    prop_assert_eq!(sheet.records(), before);
                }
            }
        }

        let rebuilt = Spreadsheet::from_records(sheet.records(), DefaultRules, "default").unwrap();
        for i in 0..CELLS {
            let name = cell(i);
            prop_assert_eq!(sheet.cell_value(&name).unwrap(), rebuilt.cell_value(&name).unwrap());
        }
    }

    /// The graph always mirrors the variables of the stored formulas.
    #[test]
    fn prop_graph_matches_formulas(edits in arb_edits()) {
        let mut sheet = Spreadsheet::new();
        for (i, contents) in &edits {
            let _ = sheet.set_contents_of_cell(&cell(*i), contents);
        }

        for i in 0..CELLS {
            let name = cell(i);
            for j in 0..CELLS {
                let other = cell(j);
                let references = sheet
                    .cell_contents(&other)
                    .unwrap()
                    .dependees()
                    .contains(&name);
                let recorded = sheet.direct_dependents(&name).unwrap().contains(&other);
                prop_assert_eq!(references, recorded, "{} -> {}", other, name);
            }
        }
    }
}
