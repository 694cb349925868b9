//! Text cleanup and the heuristics that decide what counts as a title or as
//! noise.

mod cleanup;

pub use cleanup::{
    clean, is_noise, is_title_case, normalize_glyphs, strip_bullet_prefix, NoiseFilter,
    TextCleaner, TitleRule, DEFAULT_STOP_PHRASES,
};
