pub struct Horizon {
    app_name: &'static str,
}

static HORIZON_STATIC: std::sync::OnceLock<HorizonStatic> = std::sync::OnceLock::new();

struct HorizonStatic {
    app_name: String,
}

impl HorizonStatic {
    fn init(app_name: &str) -> &'static Self {
        horizon_profiling::profile_function!();

        HORIZON_STATIC.get_or_init(|| {
            let logger = env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .filter_module("gltf", log::LevelFilter::Warn)
                .parse_default_env()
                .try_init();
            if let Err(err) = logger {
                log::warn!("Keeping the already installed logger: {}", err);
            }

            log::info!("Starting {}.", app_name);

            Self {
                app_name: app_name.to_owned(),
            }
        })
    }
}

impl Horizon {
    /// Sets up logging for the process. Only the first call initializes anything, later calls share its state.
    pub fn new(app_name: &str) -> Self {
        let horizon_static = HorizonStatic::init(app_name);

        Self {
            app_name: &horizon_static.app_name,
        }
    }

    /// Name passed to the first [`Horizon::new`] of the process.
    pub fn app_name(&self) -> &'static str {
        self.app_name
    }
}
