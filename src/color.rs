pub(crate) mod filter;
pub(crate) mod presets;
