//! scopefold-core - Indentation-aware token leveling
//!
//! This library turns the scope-classified output of a line-at-a-time lexer
//! into level-annotated tokens for folding, outlines and symbol navigation:
//! - Rule configuration compiled into selectors (`config`)
//! - Split-assignment merging and nesting levels (`leveling`)
//! - A content-fingerprint cache and an async service (`cache`, `service`)
//!
//! # Library Usage
//!
//! ```
//! use scopefold_core::{Classifiers, CompileMode, LevelingEngine, PatternLexer, Rules};
//!
//! let rules = Rules::from_toml_str(r#"
//! [indentation]
//! "keyword.control.end" = -1
//! "keyword.control" = 1
//! "#)?;
//! let classifiers = Classifiers::compile(&rules, CompileMode::Strict)?;
//! let lexer = PatternLexer::from_toml_str(r#"
//! scope_name = "source.m"
//!
//! [[rule]]
//! pattern = "\\bend\\b"
//! scopes = ["keyword.control.end.m"]
//!
//! [[rule]]
//! pattern = "\\bif\\b"
//! scopes = ["keyword.control.if.m"]
//! "#)?;
//!
//! let tokens = LevelingEngine::new(&classifiers, &lexer).level_document("if x\n  y\nend")?;
//! let levels: Vec<i32> = tokens.iter().map(|token| token.level).collect();
//! assert_eq!(levels, vec![0, 0, 1, 0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod leveling;
pub mod lexer;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use cache::{fingerprint, DocumentCache, SharedTokens};
pub use config::{Classifiers, CompileMode, Rules, SymbolKind};
pub use error::{ConfigError, ConfigResult, LevelError, LexerError, Result};
pub use leveling::{LevelState, LevelingEngine, Step, TokenClass};
pub use lexer::{LineTokenizer, LineTokens, PatternLexer, PatternLexerConfig, PatternRule};
pub use service::TokenService;
pub use token::{RawToken, Token};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
