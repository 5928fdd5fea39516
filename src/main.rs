use clap::Parser;
use miette::Result;
use packlist::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => packlist::cli::commands::init::run(args, &global),
        Commands::Cat(cmd) => packlist::cli::commands::cat::run(cmd, &global),
        Commands::Item(cmd) => packlist::cli::commands::item::run(cmd, &global),
        Commands::Stats(args) => packlist::cli::commands::stats::run(args, &global),
        Commands::Log(cmd) => packlist::cli::commands::log::run(cmd, &global),
        Commands::Undo(args) => packlist::cli::commands::undo::run(args, &global),
        Commands::Data(cmd) => packlist::cli::commands::data::run(cmd, &global),
        Commands::Doctor(args) => packlist::cli::commands::doctor::run(args, &global),
        Commands::Completions(args) => packlist::cli::commands::completions::run(args),
    }
}
