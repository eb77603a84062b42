pub mod asset_gen;
pub mod draw;
