use clap::Parser;
use ronin_debug::{args::RoninDebugArgs, handler, utils};

fn main() -> eyre::Result<()> {
    handler::install();
    utils::subscriber();

    let args = RoninDebugArgs::parse();
    utils::runtime()?.block_on(ronin_debug::run(args))
}
