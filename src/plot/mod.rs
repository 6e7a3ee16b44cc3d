//! Terminal plotting (non-interactive).

pub mod ascii;

pub use ascii::render_indexed_plot;
