pub struct Partfuse {}

static PARTFUSE_STATIC: std::sync::OnceLock<PartfuseStatic> = std::sync::OnceLock::new();

struct PartfuseStatic {}

impl PartfuseStatic {
    fn init(app_name: &str) -> &'static Self {
        PARTFUSE_STATIC.get_or_init(|| {
            env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .init();

            log::debug!("{app_name} starting");

            Self {}
        })
    }
}

impl Partfuse {
    pub fn new(app_name: &str) -> Self {
        PartfuseStatic::init(app_name);

        Self {}
    }
}
