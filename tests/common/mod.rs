/// Common test utilities and mock infrastructure
///
/// This module provides shared functionality for integration tests including:
/// - A scripted smartctl that answers from recorded transcripts
/// - The transcript fixtures under tests/fixtures

pub mod mock_smartctl;
