// Fundamental scoring and the sentiment blend
pub mod blend;
pub mod fundamental;

pub use blend::BlendPolicy;
pub use fundamental::{adjustments, fundamental_score, Adjustment};
