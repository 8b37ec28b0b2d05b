mod game;

use anyhow::Result;

use pingpong_engine::device::GpuInit;
use pingpong_engine::logging::{init_logging, LoggingConfig};
use pingpong_engine::window::{Runtime, RuntimeConfig};

use game::PingPong;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting Ping Pong");

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), PingPong::new())
}
