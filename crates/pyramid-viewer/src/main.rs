use clap::Parser;

use pyramid_engine::device::GpuInit;
use pyramid_engine::logging::init_logging;
use pyramid_engine::window::Runtime;
use pyramid_viewer::cli::Cli;
use pyramid_viewer::FrameLoop;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logging());

    Runtime::run(cli.runtime(), GpuInit::default(), FrameLoop::new(cli.viewer()))
}
