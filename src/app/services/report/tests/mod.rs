//! Tests for report classification and assembly
