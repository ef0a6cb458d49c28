mod prompt;

use cafe_client::{ChromeRenderer, LaunchOptions};
use clap::Parser;
use prompt::{Answers, Prompter};
use raffle_core::{CoreError, ErrorExt, ErrorReporter, PageRenderer, RaffleConfig, RaffleRequest};
use raffle_engine::{RafflePipeline, RaffleReport};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

/// Draws raffle winners from the comments of a Naver Cafe thread.
#[derive(Debug, Parser)]
#[command(name = "cafe-raffle", version)]
struct Cli {
    /// TOML file overriding selectors, timeouts and browser settings
    #[arg(long, env = "CAFE_RAFFLE_CONFIG")]
    config: Option<PathBuf>,

    /// Thread URL
    #[arg(long)]
    url: Option<String>,

    /// Keyword a comment must contain
    #[arg(long)]
    keyword: Option<String>,

    /// Number of winners to draw
    #[arg(long)]
    winners: Option<String>,

    /// Minimum number of written posts on the profile
    #[arg(long)]
    min_posts: Option<String>,

    /// Comma-separated names to exclude
    #[arg(long)]
    exclude: Option<String>,

    /// Run Chrome without a window
    #[arg(long)]
    headless: bool,

    /// Skip the manual login pause
    #[arg(long)]
    skip_login: bool,
}

impl Cli {
    fn answers(&self) -> Answers {
        Answers {
            thread_url: self.url.clone(),
            keyword: self.keyword.clone(),
            winner_count: self.winners.clone(),
            min_posts: self.min_posts.clone(),
            exclusions: self.exclude.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("cafe_raffle=info,raffle_engine=info,cafe_client=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("raffle", %run_id);

    match run(cli).instrument(span).await {
        Ok(code) => code,
        Err(error) => {
            ErrorReporter::new().report_error(&error);
            eprintln!("❌ {}", error.user_friendly_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CoreError> {
    tracing::info!("Starting cafe-raffle v{}", env!("CARGO_PKG_VERSION"));

    let mut config = RaffleConfig::load_or_default(cli.config.as_deref())?;
    if cli.headless {
        config.browser.headless = true;
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let request = prompter.gather_request(cli.answers())?;

    let renderer = ChromeRenderer::launch(LaunchOptions {
        headless: config.browser.headless,
        chrome_executable: config.browser.chrome_executable.as_ref().map(PathBuf::from),
        window_size: (config.browser.window_width, config.browser.window_height),
        poll_interval: config.timing.poll_interval(),
    })
    .await?;

    let outcome = drive(&renderer, &config, &request, &mut prompter, cli.skip_login).await;

    let metrics = renderer.get_metrics().await;
    tracing::info!(
        "Browser operations: {} total, {} failed, {} timed out",
        metrics.total_operations,
        metrics.failed_operations,
        metrics.timed_out_operations
    );
    match renderer.export_metrics().await {
        Ok(exported) => tracing::debug!("Browser operation metrics:\n{}", exported),
        Err(e) => tracing::debug!("Could not export browser metrics: {}", e),
    }
    if let Err(e) = renderer.close().await {
        ErrorReporter::new().report_warning(&CoreError::from(e));
    }

    let report = outcome?;
    Ok(present(&mut io::stdout(), &request.keyword, &report)?)
}

/// Login pause and the raffle itself. The caller closes the browser on
/// every outcome.
async fn drive<P: PageRenderer, R: BufRead, W: Write>(
    renderer: &P,
    config: &RaffleConfig,
    request: &RaffleRequest,
    prompter: &mut Prompter<R, W>,
    skip_login: bool,
) -> Result<RaffleReport, CoreError> {
    if !skip_login {
        println!("🔐 Please log in to Naver in the browser window.");
        renderer.navigate(&config.site.login_url).await?;
        prompter.confirm("Press Enter once you are logged in.")?;
    }

    println!("Collecting comments...");
    let mut rng = fastrand::Rng::new();
    RafflePipeline::new(renderer, config)
        .run(request, &mut rng)
        .await
}

fn present<W: Write>(out: &mut W, keyword: &str, report: &RaffleReport) -> io::Result<ExitCode> {
    writeln!(
        out,
        "\n🔍 Unique commenters mentioning '{}': {}",
        keyword,
        report.comments.len()
    )?;
    writeln!(
        out,
        "📝 Eligible: {}, skipped after profile errors: {}",
        report.eligibility.eligible().len(),
        report.eligibility.skipped_count()
    )?;

    match &report.draw {
        Ok(winners) => {
            writeln!(
                out,
                "\n🎉 Winners ({}) 🎉",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            )?;
            for line in winners.numbered_lines() {
                writeln!(out, "{}", line)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            error.log_warn();
            writeln!(out, "❌ {}", error.user_friendly_message())?;
            Ok(ExitCode::FAILURE)
        }
    }
}
