pub mod cli;
pub mod depth;
pub mod diagnose;
pub mod infer;
pub mod render;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
