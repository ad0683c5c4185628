pub mod card;
pub mod draw;
pub mod sampler;
