// blocksearch test infrastructure
//
// All tests for the crate live here, grouped by the module they exercise.
// Anything touching the filesystem works inside a temp directory.

// ============================================================================
// SHARED HELPERS - Temp workspaces, scanning shortcuts, capture buffers
// ============================================================================
pub mod helpers;

// ============================================================================
// BLOCK SCANNING TESTS - Indentation inference and block extraction
// ============================================================================
pub mod blocks {
    pub mod indentation_tests; // Unit inference and level measurement
    pub mod scanner_tests; // Anchors, offsets, terminators, invariants
}

// ============================================================================
// FILTER TESTS - Line regexes, expressions, external awk
// ============================================================================
pub mod filter {
    pub mod engine_tests; // Any/All policy and failure reporting
    pub mod expression_tests; // Lexer, parser and evaluator
    pub mod external_tests; // Subprocess awk (skipped without awk)
}

// ============================================================================
// WALKER TESTS - Exclusion chain, ignore files, binary sniffing
// ============================================================================
pub mod walker {
    pub mod sniff_tests;
    pub mod walker_tests;
}
