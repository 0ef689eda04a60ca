mod frame_timer;
mod timer;

pub use frame_timer::FrameTimer;
pub use timer::Timer;
