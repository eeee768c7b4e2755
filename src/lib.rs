//! Public library API for decoding pointer-bearing asset containers and
//! rearranging layered texture payloads.

/// Position tracking, record visitation, and the layered image model.
pub mod asset;
