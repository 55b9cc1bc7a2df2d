//! Cross-module scenarios: ingestion into a store, then answering from it.

mod support;
