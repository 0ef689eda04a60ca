pub use puffin;

/// Marks the start of a new frame. Scopes are only recorded once this has been called.
pub fn new_frame() {
    puffin::set_scopes_on(true);
    puffin::GlobalProfiler::lock().new_frame();
}

pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        $crate::puffin::profile_scope!($name);
    };
    ($name:expr, $data:expr) => {
        $crate::puffin::profile_scope!($name, $data);
    };
}

#[macro_export]
macro_rules! profile_function {
    () => {
        $crate::puffin::profile_function!();
    };
    ($data:expr) => {
        $crate::puffin::profile_function!($data);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiled_work() -> u32 {
        profile_function!();
        profile_scope!("inner", "data");
        7
    }

    #[test]
    fn markers_do_not_affect_results() {
        set_enabled(false);
        assert_eq!(profiled_work(), 7);

        new_frame();
        assert!(is_enabled());
        assert_eq!(profiled_work(), 7);
        set_enabled(false);
    }
}
