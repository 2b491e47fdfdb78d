//! Consolidated end-to-end test modules.

mod platform_e2e;
