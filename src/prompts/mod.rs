pub mod builder;
pub mod templates;
pub mod temporal;

pub use builder::{
    build_analysis_prompt, build_refinement_request, is_additive, ADDITIVE_MARKER,
    DEFAULT_SAMPLE_ROWS,
};
