// ZeroPoint Node - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod harmonic;    // Digital-root reduction, digits, vortex circuit
pub mod archetype;   // Fixed digit → name/meaning table
pub mod gateway;     // Narrative pair classification
pub mod matrix;      // Digit ranges and the materialized pair matrix
pub mod render;      // Markdown / JSON / CSV / text renderers
pub mod universe;    // UNIVERSE.md + universe.json
pub mod docs;        // docs/index.md + per-digit pages
pub mod interaction; // Interaction log fixtures
pub mod config;      // Figment-backed generator configuration
pub mod artifacts;   // Artifact writer + checksummed manifest

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use harmonic::{
    Digit, AXIS_SEQUENCE, VORTEX_SEQUENCE,
    harmonic, reduce, is_axis, in_vortex, vortex_next, vortex_cycle,
};
pub use archetype::{
    Archetype, ArchetypeLabel, ARCHETYPES,
    archetype, archetype_name, archetype_meaning, archetypes, describe,
};
pub use gateway::{
    GatewayClassifier, GatewayKind, GatewayRule,
};
pub use matrix::{
    DigitRange, HarmonicMatrix, MatrixRow,
};
pub use render::{
    MatrixRenderer, OutputFormat,
    MarkdownRenderer, JsonRenderer, CsvRenderer, TextRenderer,
    get_renderer, grid_table, render, render_grid,
};
pub use universe::{
    Universe, VortexSummary, VortexStep,
};
pub use docs::DocPage;
pub use interaction::{
    InteractionLog, InteractionRecord, vortex_session,
};
pub use config::{
    ConfigLoader, GeneratorConfig,
};
pub use artifacts::{
    Artifact, ArtifactWriter, Manifest,
    generate, load_manifest, verify, sha256_hex,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
