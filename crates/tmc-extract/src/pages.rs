//! Page-object extractor.
//!
//! Lists the page-object classes the symbol table discovered, with their
//! declared methods. The action mapper consults this metadata to decide
//! whether a call qualifier refers to a page object.

use tmc_symbol::SymbolTable;

use crate::record::PageObjectInfo;

/// Page-object metadata for one tree, in class-name order.
pub fn extract_page_objects(table: &SymbolTable<'_>) -> Vec<PageObjectInfo> {
    table
        .page_objects()
        .map(|class| PageObjectInfo {
            name: class.name.clone(),
            methods: class.methods.clone(),
        })
        .collect()
}
