//! # Eddy
//!
//! Fetches a Reddit discussion thread and produces a condensed digest:
//! post metadata, a filtered comment selection, and an optional
//! language-model summary.
//!
//! ## Architecture
//!
//! Eddy follows a modular pipeline architecture:
//!
//! ```text
//! Resolver → Normalizer → Fetcher → Digest → Summarizer
//! ```
//!
//! - [`resolver`]: share-link redirect probe (one network hop, optional)
//! - [`normalizer`]: canonical `.json` endpoint derivation, pure
//! - [`fetcher`]: authenticated API requests backed by the token cache
//! - [`digest`]: raw listing payload to post + filtered comments
//! - [`summarizer`]: one chat-completions call over the digest
//!
//! ## Quick Start
//!
//! ```bash
//! export REDDIT_CLIENT_ID=... REDDIT_CLIENT_SECRET=...
//!
//! # Digest a thread (share links welcome)
//! eddy digest https://www.reddit.com/r/rust/comments/abc123
//!
//! # Just resolve a URL to its data endpoint
//! eddy resolve https://www.reddit.com/r/rust/s/XyZtoken
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together the pipeline:
/// resolver, fetcher, digest options, summarizer.
pub mod app;

/// OAuth client-credentials flow and the cached bearer token.
///
/// - [`TokenCache`](auth::TokenCache): single cached credential with
///   early-refresh expiry handling
/// - [`TokenTransport`](auth::TokenTransport): async seam over the grant
///   request, reqwest-backed in production
pub mod auth;

/// Command-line interface using clap.
///
/// - `digest <url>` - Fetch a thread and print its digest
/// - `resolve <url>` - Print the canonical data endpoint
pub mod cli;

/// Configuration: `~/.config/eddy/config.toml` for settings, environment
/// variables for credentials.
pub mod config;

/// Raw thread payload to [`ThreadDigest`](domain::ThreadDigest):
/// post extraction, comment filtering, body truncation.
pub mod digest;

/// Core domain models.
///
/// - [`Post`](domain::Post), [`Comment`](domain::Comment): thread pieces
/// - [`DigestResponse`](domain::DigestResponse): downstream-facing shape
pub mod domain;

/// Authenticated thread fetching against the API host.
pub mod fetcher;

/// URL canonicalization: share-token detection and decoding, `.json`
/// endpoint derivation. Pure string/URL work, no I/O.
pub mod normalizer;

/// Share-link resolution via a single redirect probe.
///
/// - [`RedirectProbe`](resolver::RedirectProbe): async trait seam
/// - [`HttpRedirectProbe`](resolver::HttpRedirectProbe): reqwest
///   implementation with redirect following disabled
pub mod resolver;

/// Language-model summarization of a digest.
pub mod summarizer;
