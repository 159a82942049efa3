//! Shared test doubles for pipeline tests

pub mod mock_portal;
