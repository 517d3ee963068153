use clap::Parser;

fn main() -> anyhow::Result<()> {
    drawcheck_app::run(drawcheck_app::Cli::parse())
}
