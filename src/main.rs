use dyff::cli::{self, Command};
use dyff::diff::compare;
use dyff::input::{Document, InputFile};
use dyff::parse;
use dyff::render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let normalized = cli::normalize_args(raw);
    let args_ref: Vec<&str> = normalized.iter().map(String::as_str).collect();

    let parsed = cli::cli().run_inner(bpaf::Args::from(&args_ref[..])).unwrap_or_else(|failure| {
        let code = failure.exit_code();
        print!("{}", failure.unwrap_stdout());
        std::process::exit(code);
    });

    match parsed.command {
        Command::Between(args) => run_between(args).await,
        Command::Yaml(args) => run_passthrough(Format::Yaml, args),
        Command::Json(args) => run_passthrough(Format::Json, args),
    }
}

enum Format {
    Yaml,
    Json,
}

fn init_logging(debug: bool) {
    let filter = std::env::var("DYFF_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| if debug { "debug".to_string() } else { "warn".to_string() });
    let _ = env_logger::Builder::new().parse_filters(&filter).try_init();
}

async fn run_between(args: cli::BetweenArgs) -> anyhow::Result<()> {
    init_logging(args.debug);
    log::debug!("comparing {} with {}", args.from, args.to);

    let (from, to) = dyff::loader::load_pair(&args.from, &args.to).await?;
    let compare_opts = args.compare_options();
    let render_opts = args.render_options();

    let report = compare(&from, &to, &compare_opts)?;

    let rendered = if args.brief {
        render::render_brief(&report, &render_opts)
    } else {
        render::render(&report, &render_opts)
    };
    println!("{rendered}");

    if args.set_exit_code && !report.diffs.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_passthrough(format: Format, args: cli::PassthroughArgs) -> anyhow::Result<()> {
    init_logging(false);
    let text = std::fs::read_to_string(&args.file)?;
    let docs = match format {
        Format::Yaml => parse::parse_yaml(&args.file, &text),
        Format::Json => parse::parse_json(&args.file, &text),
    }?;

    let file = InputFile::new(args.file.clone(), docs.into_iter().map(Document::new).collect());
    for document in &file.documents {
        println!("{}", render::dump_node(&document.root));
    }
    Ok(())
}
