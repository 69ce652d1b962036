//! CLI binary for edusummarize.
//!
//! A thin shim over the library crate: maps flags to the client configs,
//! drives a [`PipelineController`] and prints results.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};
use edusummarize::audio::save_clip;
use edusummarize::clipboard::copy_summary;
use edusummarize::config::{
    AuthStyle, DEFAULT_SPEECH_BASE_URL, DEFAULT_SUMMARY_ENDPOINT, DEFAULT_VOICE_ID,
    SPEECH_KEY_ENV, SUMMARY_KEY_ENV,
};
use edusummarize::{
    AudioClip, ChatCompletionsSummarizer, EduError, ElevenLabsSynthesizer, ItemId, ItemReport,
    ItemStatus, PdfiumExtractor, PipelineController, PipelineObserver, PlaybackChange, PlaybackSlot,
    ProviderSummarizer, SessionReport, SourceFile, SpeechSynthesizer, Stages, SummarizationError,
    Summarizer, SummarizerConfig, SummaryLength, SynthesisError, SynthesizerConfig, TextExtractor,
    VoiceSession, DEFAULT_DOWNLOAD_NAME, SAMPLE_TEXTS,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Files above this size are accepted but flagged.
const SOFT_SIZE_LIMIT: usize = 10 * 1024 * 1024;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── ANSI colour helpers ──────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

fn paint(status: ItemStatus) -> String {
    let glyph = status.glyph();
    match status {
        ItemStatus::Ready | ItemStatus::Completed => green(glyph),
        ItemStatus::Error => red(glyph),
        ItemStatus::Uploading
        | ItemStatus::Processing
        | ItemStatus::Summarizing
        | ItemStatus::GeneratingVoice => cyan(glyph),
    }
}

// ── CLI observer using indicatif ─────────────────────────────────────────

/// Renders one progress bar per phase (extraction, generation) and a log line
/// each time an item comes to rest. Items finish out of order.
struct CliObserver {
    bar: ProgressBar,
    names: Mutex<HashMap<ItemId, String>>,
    started: Mutex<HashMap<ItemId, Instant>>,
    errors: AtomicUsize,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            names: Mutex::new(HashMap::new()),
            started: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Reset the bar for a new phase covering `total` items.
    fn begin_phase(&self, prefix: &'static str, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos:>2}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_style(style);
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_prefix(prefix);
        self.bar.reset_elapsed();
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn name(&self, id: ItemId) -> String {
        self.names
            .lock()
            .ok()
            .and_then(|n| n.get(&id).cloned())
            .unwrap_or_else(|| id.to_string())
    }

    fn elapsed(&self, id: ItemId) -> String {
        let secs = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.remove(&id))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl PipelineObserver for CliObserver {
    fn on_item_accepted(&self, id: ItemId, name: &str) {
        if let Ok(mut names) = self.names.lock() {
            names.insert(id, name.to_string());
        }
    }

    fn on_status_change(&self, id: ItemId, _from: ItemStatus, to: ItemStatus) {
        if to.is_busy() {
            if let Ok(mut started) = self.started.lock() {
                started.entry(id).or_insert_with(Instant::now);
            }
            self.bar
                .set_message(format!("{} {}", self.name(id), dim(to.label())));
            return;
        }
        if to == ItemStatus::Error {
            // reported with its message by on_item_error
            return;
        }
        self.bar.println(format!(
            "  {} {:<32} {}  {}",
            paint(to),
            self.name(id),
            to.label(),
            self.elapsed(id)
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, id: ItemId, name: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg: String = if error.chars().count() > 100 {
            format!("{}…", error.chars().take(99).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {:<32} {}  {}",
            paint(ItemStatus::Error),
            name,
            red(&msg),
            self.elapsed(id)
        ));
        self.bar.inc(1);
    }
}

/// Stand-in for stages this run will never call.
struct Unconfigured;

#[async_trait]
impl Summarizer for Unconfigured {
    async fn summarize(&self, _text: &str, _length: SummaryLength) -> Result<String, SummarizationError> {
        Err(SummarizationError::Provider(
            "summarization is not configured for this run (pass --generate)".into(),
        ))
    }
}

#[async_trait]
impl SpeechSynthesizer for Unconfigured {
    async fn synthesize(&self, _text: &str) -> Result<AudioClip, SynthesisError> {
        Err(SynthesisError::Request(
            "speech synthesis is not configured for this run (pass --generate)".into(),
        ))
    }
}

fn spinner(show: bool, prefix: &'static str, msg: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS),
    );
    bar.set_prefix(prefix);
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

// ── CLI definition ───────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text, then summarize and voice every file
  edusummarize upload chapter1.pdf chapter2.pdf --generate --output-dir audio/

  # Short summaries, JSON report
  edusummarize upload notes.pdf --generate --length short --json > report.json

  # Play each summary as it is saved
  edusummarize upload lecture.pdf --generate --play

  # Summarize pasted text and copy the result
  edusummarize summarize "Mitochondria are the powerhouse of the cell..." --copy

  # Summarize a text file
  edusummarize summarize --file essay.txt --length long

  # Text to speech with a built-in sample
  edusummarize voice --sample 2 -o sample.mp3

  # Print the text layer of a PDF (no API key needed)
  edusummarize extract paper.pdf

ENVIRONMENT VARIABLES:
  EDUSUMMARIZE_LLM_API_KEY   Key for the chat-completions endpoint
  EDUSUMMARIZE_LLM_ENDPOINT  Chat-completions URL (default: OpenAI)
  EDUSUMMARIZE_LLM_MODEL     Model name sent in the request body
  EDGEQUAKE_LLM_PROVIDER     Use an edgequake-llm provider instead
                             (openai, anthropic, gemini, ollama, ...)
  EDGEQUAKE_MODEL            Model for that provider
  OPENAI_API_KEY             Picked up by provider auto-detection
  ELEVENLABS_API_KEY         Key for speech synthesis
  ELEVENLABS_VOICE_ID        Voice to use (default: Rachel)
  PDFIUM_LIB_PATH            libpdfium file or directory
  RUST_LOG                   Log filter (overrides --verbose)
"#;

/// Summarize educational PDFs and turn the summaries into speech.
#[derive(Parser, Debug)]
#[command(
    name = "edusummarize",
    version,
    about = "Summarize educational PDFs and turn the summaries into speech",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "EDUSUMMARIZE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, global = true, env = "EDUSUMMARIZE_QUIET")]
    quiet: bool,

    /// Disable progress bars.
    #[arg(long, global = true, env = "EDUSUMMARIZE_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload PDFs: extract text, optionally generate summary and voice.
    Upload {
        /// PDF files to process.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Generate summary and audio for every file whose text was extracted.
        #[arg(long)]
        generate: bool,

        /// Summary length.
        #[arg(long, value_enum, default_value = "medium")]
        length: LengthArg,

        /// Save each file's audio here as <name>-summary.mp3.
        #[arg(long, env = "EDUSUMMARIZE_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Play each ready item's audio with --player, one at a time.
        #[arg(long)]
        play: bool,

        /// Audio player command; the file path is appended.
        #[arg(long, env = "EDUSUMMARIZE_PLAYER", default_value = "mpg123 -q")]
        player: String,

        /// Print a JSON report instead of text.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        llm: LlmArgs,

        #[command(flatten)]
        speech: SpeechArgs,
    },

    /// Summarize text given as an argument, a file or stdin.
    Summarize {
        /// Text to summarize. Read from stdin when neither this nor --file is given.
        text: Option<String>,

        /// Read the text from this file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Summary length.
        #[arg(long, value_enum, default_value = "medium")]
        length: LengthArg,

        /// Copy the summary to the clipboard.
        #[arg(long)]
        copy: bool,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Convert text to speech and save it as MP3.
    Voice {
        /// Text to speak.
        text: Option<String>,

        /// Use built-in sample text 1, 2 or 3 instead.
        #[arg(long, conflicts_with = "text", value_parser = clap::value_parser!(u8).range(1..=3))]
        sample: Option<u8>,

        /// Output file. Default: ./summary-audio.mp3
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        speech: SpeechArgs,
    },

    /// Print the extracted text of a PDF.
    Extract {
        pdf: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct LlmArgs {
    /// Chat-completions endpoint URL.
    #[arg(long, env = "EDUSUMMARIZE_LLM_ENDPOINT", default_value = DEFAULT_SUMMARY_ENDPOINT)]
    llm_endpoint: String,

    /// API key for the endpoint.
    #[arg(long, env = SUMMARY_KEY_ENV, hide_env_values = true)]
    llm_api_key: Option<String>,

    /// Model name for the request body.
    #[arg(long, env = "EDUSUMMARIZE_LLM_MODEL")]
    llm_model: Option<String>,

    /// Send the key as an `api-key` header (Azure OpenAI) and omit the model
    /// unless --llm-model is given.
    #[arg(long)]
    azure: bool,

    /// Use an edgequake-llm provider (openai, anthropic, gemini, ollama, ...).
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long, env = "EDUSUMMARIZE_TIMEOUT", default_value_t = 120)]
    timeout: u64,
}

#[derive(Args, Debug, Clone)]
struct SpeechArgs {
    /// ElevenLabs API key.
    #[arg(long, env = SPEECH_KEY_ENV, hide_env_values = true)]
    speech_api_key: Option<String>,

    /// Voice id.
    #[arg(long, env = "ELEVENLABS_VOICE_ID", default_value = DEFAULT_VOICE_ID)]
    voice_id: String,

    /// API base URL.
    #[arg(long, env = "ELEVENLABS_BASE_URL", default_value = DEFAULT_SPEECH_BASE_URL)]
    speech_base_url: String,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long = "speech-timeout", default_value_t = 120)]
    speech_timeout: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LengthArg {
    Short,
    Medium,
    Long,
}

impl From<LengthArg> for SummaryLength {
    fn from(v: LengthArg) -> Self {
        match v {
            LengthArg::Short => SummaryLength::Short,
            LengthArg::Medium => SummaryLength::Medium,
            LengthArg::Long => SummaryLength::Long,
        }
    }
}

// ── Entry point ──────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let json = matches!(cli.command, Command::Upload { json: true, .. });
    let show_progress = !cli.quiet && !cli.no_progress && !json;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bars carry the feedback that matters; library INFO logs
    // would tear them.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Upload {
            files,
            generate,
            length,
            output_dir,
            play,
            player,
            json,
            llm,
            speech,
        } => {
            let opts = UploadOptions {
                generate,
                length: length.into(),
                output_dir,
                player: play.then_some(player),
                json,
                quiet: cli.quiet,
                show_progress,
            };
            run_upload(files, opts, &llm, &speech).await
        }
        Command::Summarize {
            text,
            file,
            length,
            copy,
            llm,
        } => run_summarize(text, file, length.into(), copy, &llm, cli.quiet, show_progress).await,
        Command::Voice {
            text,
            sample,
            output,
            speech,
        } => run_voice(text, sample, output, &speech, cli.quiet, show_progress).await,
        Command::Extract { pdf } => run_extract(&pdf, show_progress).await,
    }
}

// ── upload ───────────────────────────────────────────────────────────────

struct UploadOptions {
    generate: bool,
    length: SummaryLength,
    output_dir: Option<PathBuf>,
    player: Option<String>,
    json: bool,
    quiet: bool,
    show_progress: bool,
}

async fn run_upload(
    paths: Vec<PathBuf>,
    opts: UploadOptions,
    llm: &LlmArgs,
    speech: &SpeechArgs,
) -> Result<()> {
    let start = Instant::now();

    // Build the remote clients up front so a missing key fails before any work.
    let (summarizer, synthesizer): (Arc<dyn Summarizer>, Arc<dyn SpeechSynthesizer>) =
        if opts.generate {
            (build_summarizer(llm)?, build_synthesizer(speech)?)
        } else {
            (Arc::new(Unconfigured), Arc::new(Unconfigured))
        };

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = SourceFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if file.len() > SOFT_SIZE_LIMIT && !opts.quiet {
            eprintln!(
                "{} {} is {:.1} MB; files over 10 MB may be slow to process",
                yellow("⚠"),
                file.name(),
                file.len() as f64 / (1024.0 * 1024.0)
            );
        }
        files.push(file);
    }

    let observer = opts.show_progress.then(CliObserver::new);
    let stages = Stages {
        extractor: Arc::new(PdfiumExtractor::new()),
        summarizer,
        synthesizer,
    };
    let controller = match &observer {
        Some(o) => PipelineController::with_observer(stages, Arc::clone(o) as Arc<dyn PipelineObserver>),
        None => PipelineController::new(stages),
    };

    // ── Extraction ───────────────────────────────────────────────────────
    if let Some(o) = &observer {
        o.begin_phase("Extracting", files.len());
    }
    for file in files {
        controller.submit(file);
    }
    controller.wait_idle().await;

    // ── Summary + voice (explicit request per completed item) ────────────
    if opts.generate {
        let ready: Vec<ItemId> = controller
            .snapshot()
            .iter()
            .filter(|it| it.status == ItemStatus::Completed)
            .map(|it| it.id)
            .collect();
        if let Some(o) = &observer {
            o.begin_phase("Generating", ready.len());
        }
        for id in ready {
            controller
                .generate(id, opts.length)
                .context("Failed to request summary")?;
        }
        controller.wait_idle().await;
    }
    if let Some(o) = &observer {
        o.finish();
    }

    // ── Save audio ───────────────────────────────────────────────────────
    let items = controller.snapshot();
    let mut reports: Vec<ItemReport> = items.iter().map(ItemReport::from).collect();
    if let Some(dir) = &opts.output_dir {
        for (item, report) in items.iter().zip(reports.iter_mut()) {
            if let Some(clip) = &item.audio {
                let path = dir.join(format!("{}-summary.{}", item.file.stem(), clip.extension()));
                let written = save_clip(clip, &path)
                    .await
                    .with_context(|| format!("Failed to save audio for {}", item.file.name()))?;
                report.audio_path = Some(written);
            }
        }
    }

    let report = SessionReport::new(reports, start.elapsed().as_millis() as u64);
    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else {
        print_report(&report, opts.quiet);
    }

    // ── Playback ─────────────────────────────────────────────────────────
    if let Some(player) = &opts.player {
        let mut slot = PlaybackSlot::new();
        for item in items.iter().filter(|it| it.status == ItemStatus::Ready) {
            let Some(handle) = &item.handle else { continue };
            if let PlaybackChange::Switched { from, .. } = slot.play(item.id) {
                tracing::debug!("Stopped {} before playing {}", from, item.id);
            }
            if !opts.quiet {
                eprintln!("{} Playing {}", cyan("▶"), bold(item.file.name()));
            }
            play_file(player, handle.path()).await?;
            slot.finished(item.id);
        }
    }

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} file(s) failed",
            report.stats.failed,
            report.stats.total
        );
    }
    Ok(())
}

fn print_report(report: &SessionReport, quiet: bool) {
    for item in &report.items {
        println!("{} {}  {}", paint(item.status), bold(&item.file_name), item.label);
        if let Some(err) = &item.error {
            println!("   {}", red(err));
        }
        if quiet {
            continue;
        }
        if let Some(summary) = &item.summary {
            println!();
            for line in summary.lines() {
                println!("   {line}");
            }
            println!();
        } else if let Some(preview) = &item.preview {
            println!("   {}", dim(&preview.replace('\n', " ")));
        }
        if let Some(path) = &item.audio_path {
            println!("   {} {}", green("♪"), path.display());
        }
    }
    if !quiet {
        let s = &report.stats;
        eprintln!(
            "{}  {} ready, {} extracted, {} failed  |  {}ms",
            if s.failed == 0 { green("✔") } else { yellow("⚠") },
            s.ready,
            s.completed,
            s.failed,
            s.total_duration_ms
        );
    }
}

async fn play_file(player: &str, path: &Path) -> Result<()> {
    let mut parts = player.split_whitespace();
    let program = parts.next().context("--player is empty")?;
    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .with_context(|| format!("Failed to start player '{program}'"))?;
    if !status.success() {
        eprintln!("{} player exited with {}", yellow("⚠"), status);
    }
    Ok(())
}

// ── summarize ────────────────────────────────────────────────────────────

async fn run_summarize(
    text: Option<String>,
    file: Option<PathBuf>,
    length: SummaryLength,
    copy: bool,
    llm: &LlmArgs,
    quiet: bool,
    show_progress: bool,
) -> Result<()> {
    let text = match (text, file) {
        (Some(t), _) => t,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let summarizer = build_summarizer(llm)?;
    let bar = spinner(show_progress, "Summarizing", length.instruction());
    let result = summarizer.summarize(&text, length).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let summary = result.context("Failed to generate summary. Please try again.")?;

    println!("{summary}");

    if copy {
        match copy_summary(&summary) {
            Ok(()) if !quiet => eprintln!("{} Summary copied to clipboard", green("✔")),
            Ok(()) => {}
            Err(e) => eprintln!("{} {}", yellow("⚠"), e),
        }
    }
    Ok(())
}

// ── voice ────────────────────────────────────────────────────────────────

async fn run_voice(
    text: Option<String>,
    sample: Option<u8>,
    output: Option<PathBuf>,
    speech: &SpeechArgs,
    quiet: bool,
    show_progress: bool,
) -> Result<()> {
    let text = match (text, sample) {
        (Some(t), _) => t,
        (None, Some(n)) => SAMPLE_TEXTS[usize::from(n) - 1].to_string(),
        (None, None) => anyhow::bail!("Please enter some text to convert to speech"),
    };

    let mut session = VoiceSession::new(build_synthesizer(speech)?);
    let bar = spinner(show_progress, "Speaking", "generating audio");
    let result = session.generate(&text).await.map(|h| h.len());
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let bytes = result.context("Failed to generate speech. Please try again.")?;

    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_NAME));
    let written = session.download_to(&path).await.context("Failed to save audio")?;
    if !quiet {
        eprintln!(
            "{} {} bytes of audio  →  {}",
            green("✔"),
            bytes,
            bold(&written.display().to_string())
        );
    }
    Ok(())
}

// ── extract ──────────────────────────────────────────────────────────────

async fn run_extract(pdf: &Path, show_progress: bool) -> Result<()> {
    let file = SourceFile::from_path(pdf)
        .await
        .with_context(|| format!("Failed to read {}", pdf.display()))?;
    let bar = spinner(show_progress, "Extracting", file.name());
    let result = PdfiumExtractor::new().extract(&file).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let text = result.context("Failed to extract text")?;
    println!("{text}");
    Ok(())
}

// ── Client construction ──────────────────────────────────────────────────

/// Pick a summarizer: named provider, direct endpoint with a key, else provider auto-detection.
fn build_summarizer(llm: &LlmArgs) -> Result<Arc<dyn Summarizer>> {
    if let Some(provider) = &llm.provider {
        let s = ProviderSummarizer::from_env(Some(provider), llm.llm_model.as_deref())
            .context("Failed to set up LLM provider")?
            .with_temperature(llm.temperature);
        return Ok(Arc::new(s));
    }

    if llm.llm_api_key.is_some() {
        let mut builder = SummarizerConfig::builder()
            .endpoint(&llm.llm_endpoint)
            .temperature(llm.temperature)
            .timeout_secs(llm.timeout);
        if let Some(key) = &llm.llm_api_key {
            builder = builder.api_key(key);
        }
        if llm.azure {
            builder = builder.auth_style(AuthStyle::ApiKeyHeader).no_model();
        }
        if let Some(model) = &llm.llm_model {
            builder = builder.model(model);
        }
        let config = builder.build().context("Invalid summarization configuration")?;
        return Ok(Arc::new(ChatCompletionsSummarizer::new(config)?));
    }

    match ProviderSummarizer::from_env(None, llm.llm_model.as_deref()) {
        Ok(s) => Ok(Arc::new(s.with_temperature(llm.temperature))),
        Err(e) => {
            tracing::debug!("Provider auto-detection failed: {}", e);
            Err(EduError::MissingCredential {
                service: "summarization",
                env_var: SUMMARY_KEY_ENV,
            }
            .into())
        }
    }
}

fn build_synthesizer(speech: &SpeechArgs) -> Result<Arc<dyn SpeechSynthesizer>> {
    let mut builder = SynthesizerConfig::builder()
        .base_url(&speech.speech_base_url)
        .voice_id(&speech.voice_id)
        .timeout_secs(speech.speech_timeout);
    if let Some(key) = &speech.speech_api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build().context("Invalid speech configuration")?;
    Ok(Arc::new(ElevenLabsSynthesizer::new(config)?))
}
