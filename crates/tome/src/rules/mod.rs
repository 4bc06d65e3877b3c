// ABOUTME: Heuristic tables for suggestion and extraction: data model, compiled form and loader.
// ABOUTME: Tables are data so site conventions can change without touching extraction logic.

pub mod compiled;
pub mod loader;
pub mod tables;

pub use compiled::{CompiledHeuristics, CompiledLinkRule, CompiledTitleRule};
pub use loader::{builtin_heuristics, builtin_tables, heuristics_from_json, load_heuristics_file};
pub use tables::{HeuristicTables, LinkRule, RuleScope, TitleRule};
