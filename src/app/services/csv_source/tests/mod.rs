//! Tests for CSV source helpers and field parsers
