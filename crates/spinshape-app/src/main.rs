mod activity;
mod angle;
mod controller;
mod renderer;

use spinshape_engine::device::GpuInit;
use spinshape_engine::logging::{init_logging, LoggingConfig};
use spinshape_engine::window::{Runtime, RuntimeConfig};

use activity::SampleActivity;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "spinshape".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), SampleActivity::new())
}
