use clap::Parser;
use miette::Result;
use irt::cli::commands;
use irt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate quietly when piped into `head` and friends
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    irt::cli::logging::init(&global);

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Add(args) => commands::add::run(args, &global),
        Commands::List(args) => commands::list::run(args, &global),
        Commands::Show(args) => commands::show::run(args, &global),
        Commands::Update(args) => commands::update::run(args, &global),
        Commands::Export(args) => commands::export::run(args, &global),
        Commands::Stats(args) => commands::stats::run(args, &global),
        Commands::Seed(args) => commands::seed::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
