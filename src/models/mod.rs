pub mod market;
pub mod trip;
