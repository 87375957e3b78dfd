use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gnx", version, about = "GNX World cover-art generator")]
struct Cli {
    /// JSON config file; `GNX_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the vehicle catalog in selection order.
    Catalog(CatalogArgs),
    /// Render the captioned cover and save it as a download.
    Render(RenderArgs),
    /// Render, upload, and print a share-intent link.
    Share(ShareArgs),
    /// Serve the share-landing pages.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Use the built-in preset vehicles instead of the hosted catalog.
    #[arg(long)]
    static_catalog: bool,

    /// Artwork reference used by the preset vehicles.
    #[arg(long, default_value = "preview.jpg")]
    preset_image: String,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Vehicle id to select (defaults to the first catalog entry).
    #[arg(long)]
    vehicle: Option<i64>,

    /// Free-text vehicle; a matching display name selects that vehicle.
    #[arg(long, conflicts_with = "vehicle")]
    vehicle_text: Option<String>,

    /// Alternate name of the selected vehicle to use in the caption.
    #[arg(long)]
    alt: Option<String>,

    /// Artist name (defaults to the first preset).
    #[arg(long)]
    artist: Option<String>,

    /// Pick vehicle and artist at random; explicit picks are applied afterwards.
    #[arg(long)]
    shuffle: bool,

    /// Seed for `--shuffle` and share keys.
    #[arg(long)]
    seed: Option<u64>,

    /// Caption font (TTF/OTF); overrides the configured font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the caption font's SHA-256 before rendering.
    #[arg(long)]
    dump_font: bool,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Directory that receives the download.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ShareArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Exit right away instead of waiting to delete the upload when it expires.
    #[arg(long)]
    no_wait: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = gnx::Config::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Catalog(args) => block_on(cmd_catalog(&cfg, args)),
        Command::Render(args) => block_on(cmd_render(&cfg, args)),
        Command::Share(args) => block_on(cmd_share(&cfg, args)),
        Command::Serve(args) => cmd_serve(cfg, args),
    }
}

fn block_on<F>(fut: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build runtime")?
        .block_on(fut)
}

fn catalog_source(
    cfg: &gnx::Config,
    args: &SourceArgs,
) -> anyhow::Result<Box<dyn gnx::CatalogSource>> {
    if !args.static_catalog {
        if let Some(client) = cfg.supabase_client()? {
            return Ok(Box::new(gnx::SupabaseCatalog::new(
                client,
                cfg.vehicle_table.clone(),
            )));
        }
        tracing::info!("no hosted catalog configured; using preset vehicles");
    }
    Ok(Box::new(gnx::StaticCatalog::presets(&args.preset_image)))
}

fn object_store(cfg: &gnx::Config) -> anyhow::Result<Arc<dyn gnx::ObjectStore>> {
    let client = cfg.supabase_client()?.with_context(|| {
        format!(
            "sharing needs an object store; set {} and {}",
            gnx::config::ENV_SUPABASE_URL,
            gnx::config::ENV_SUPABASE_ANON_KEY
        )
    })?;
    Ok(Arc::new(gnx::SupabaseStorage::new(
        client,
        cfg.share_bucket.clone(),
    )))
}

fn read_font(cfg: &gnx::Config, args: &SelectionArgs) -> anyhow::Result<Vec<u8>> {
    let path = args
        .font
        .as_deref()
        .or(cfg.font_path.as_deref())
        .with_context(|| {
            format!(
                "no caption font configured; pass --font or set {}",
                gnx::config::ENV_FONT_PATH
            )
        })?;
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    if args.dump_font {
        eprintln!("caption font:");
        eprintln!("  path:   {}", path.display());
        eprintln!("  sha256: {}", sha256_hex(&bytes));
    }
    Ok(bytes)
}

async fn build_generator(
    cfg: &gnx::Config,
    source: &SourceArgs,
    sel: &SelectionArgs,
    rng: &mut rand::rngs::StdRng,
) -> anyhow::Result<gnx::CoverArtGenerator> {
    let font = read_font(cfg, sel)?;
    let fetcher = Arc::new(gnx::HttpImageFetcher::new(cfg.fetch_timeout())?);
    let compositor = gnx::Compositor::new(font).with_style(cfg.caption_style);
    let exporter = gnx::Exporter::new(fetcher, compositor);

    let source = catalog_source(cfg, source)?;
    let mut generator = gnx::CoverArtGenerator::load(
        source.as_ref(),
        cfg.catalog_order,
        cfg.caption_limits(),
        exporter,
    )
    .await;

    if sel.shuffle {
        generator.shuffle(rng);
    }
    if let Some(id) = sel.vehicle {
        generator.select_vehicle(id)?;
    }
    if let Some(text) = &sel.vehicle_text {
        generator.set_vehicle_text(text);
    }
    if let Some(alt) = &sel.alt {
        generator.select_alternate(alt)?;
    }
    if let Some(artist) = &sel.artist {
        generator.set_artist(artist);
    }

    eprintln!("caption: {}", generator.caption());
    Ok(generator)
}

fn make_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    use rand::SeedableRng as _;
    match seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_entropy(),
    }
}

async fn cmd_catalog(cfg: &gnx::Config, args: CatalogArgs) -> anyhow::Result<()> {
    let source = catalog_source(cfg, &args.source)?;
    let state = gnx::load_catalog(source.as_ref(), cfg.catalog_order).await;
    if state.catalog.is_empty() {
        eprintln!("catalog is empty");
        return Ok(());
    }
    for v in &state.catalog {
        println!(
            "{:>4}  {:<24} terms: {:<32} {}",
            v.id,
            v.display_name,
            v.caption_terms().collect::<Vec<_>>().join(" | "),
            v.image_url
        );
    }
    Ok(())
}

async fn cmd_render(cfg: &gnx::Config, args: RenderArgs) -> anyhow::Result<()> {
    let mut rng = make_rng(args.selection.seed);
    let generator = build_generator(cfg, &args.source, &args.selection, &mut rng).await?;

    match generator.download(&args.out_dir).await? {
        Some(path) => {
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => anyhow::bail!("export produced no image"),
    }
}

async fn cmd_share(cfg: &gnx::Config, args: ShareArgs) -> anyhow::Result<()> {
    let store = object_store(cfg)?;
    let service = gnx::ShareService::new(store, cfg.site_url()?, cfg.retention());

    let mut rng = make_rng(args.selection.seed);
    let generator = build_generator(cfg, &args.source, &args.selection, &mut rng).await?;

    let now = chrono::Utc::now().timestamp_millis();
    let Some(mut outcome) = generator.share(&service, now, &mut rng).await else {
        anyhow::bail!("export produced no image");
    };

    if let Some(link) = &outcome.share_link {
        eprintln!("share page: {link}");
    } else {
        eprintln!("upload failed; sharing caption only");
    }
    println!("{}", outcome.intent_url);

    let cleanup = outcome.cleanup.take();
    if let (Some(key), Some(cleanup), false) = (&outcome.key, cleanup, args.no_wait) {
        eprintln!(
            "waiting {}s to delete {key} (pass --no-wait to skip)",
            service.retention().as_secs()
        );
        cleanup.await.context("deletion task")?;
    }
    Ok(())
}

fn cmd_serve(cfg: gnx::Config, args: ServeArgs) -> anyhow::Result<()> {
    let store = object_store(&cfg)?;
    let state = gnx::share::landing::LandingState { store };

    actix_web::rt::System::new().block_on(async move {
        tracing::info!(bind = %args.bind, site = %cfg.site_url, "serving share pages");
        actix_web::HttpServer::new(move || {
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(state.clone()))
                .configure(gnx::share::landing::configure)
        })
        .bind(args.bind.as_str())
        .with_context(|| format!("bind '{}'", args.bind))?
        .run()
        .await
        .context("run server")
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
