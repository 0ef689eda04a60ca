#![doc(html_no_source)]

mod horizon;
pub use horizon::Horizon;

// Reexport all crates
pub use horizon_light;
pub use horizon_model;
pub use horizon_profiling;
pub use horizon_texture;
pub use horizon_time;
pub use horizon_transform;
