//! Static catalog of individual diagnostic tests.

use serde::Serialize;

/// Prefix used for test codes when the test name is not in the catalog.
pub const FALLBACK_CODE_PREFIX: &str = "TEST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTest {
    pub name: &'static str,
    pub code: &'static str,
    /// Price in rupees.
    pub price: u64,
}

pub const TEST_CATALOG: &[CatalogTest] = &[
    CatalogTest {
        name: "CBC",
        code: "CBC",
        price: 500,
    },
    CatalogTest {
        name: "Lipid Profile",
        code: "LIP",
        price: 800,
    },
    CatalogTest {
        name: "Blood Sugar",
        code: "BST",
        price: 300,
    },
];

/// Find a catalog entry by test name, ignoring case and surrounding whitespace.
pub fn lookup(name: &str) -> Option<&'static CatalogTest> {
    let name = name.trim();
    TEST_CATALOG
        .iter()
        .find(|test| test.name.eq_ignore_ascii_case(name))
}

pub fn code_prefix(name: &str) -> &'static str {
    lookup(name).map_or(FALLBACK_CODE_PREFIX, |test| test.code)
}
