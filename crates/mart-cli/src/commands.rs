use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use mart_catalog::{Catalog, CatalogHandle};
use mart_draft::{
    CancelToken, DraftSession, DraftingService, FormAssistant, GeminiClient, PriceSuggestion,
};
use mart_server::MartServer;
use mart_store::{FileKeyValueStore, ProductPersistence, StoreConfig};
use mart_types::{FormSubmission, ImageData, Product, ProductDraft, ProductForm, ProductId};
use tracing::{info, warn};

use crate::cli::*;
use crate::config::MartConfig;
use crate::render;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = MartConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.store.data_dir = dir;
    }

    let mut out = std::io::stdout();
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::List(args) => cmd_list(&*open_catalog(&config.store)?, &args, &mut out),
        Command::Show(args) => cmd_show(&*open_catalog(&config.store)?, &args, &mut out),
        Command::Add(args) => cmd_add(&*open_catalog(&config.store)?, args, &mut out),
        Command::Update(args) => cmd_update(&*open_catalog(&config.store)?, args, &mut out),
        Command::Delete(args) => {
            let stdin = std::io::stdin();
            cmd_delete(&*open_catalog(&config.store)?, &args, &mut stdin.lock(), &mut out)
        }
        Command::Import(args) => {
            let catalog = open_background_catalog(&config.store)?;
            cmd_import(&catalog, &args.file, &mut out).await
        }
        Command::Export => cmd_export(&*open_catalog(&config.store)?, &mut out),
        Command::Suggest(args) => {
            let service: Arc<dyn DraftingService> = Arc::new(GeminiClient::new(config.draft));
            let session = Arc::new(DraftSession::new());
            let watcher = cancel_on_ctrl_c(session.clone());
            let result = cmd_suggest(service, session.token(), args.what, &mut out).await;
            watcher.abort();
            result
        }
        Command::Draft(args) => {
            let service: Arc<dyn DraftingService> = Arc::new(GeminiClient::new(config.draft));
            let session = Arc::new(DraftSession::new());
            let watcher = cancel_on_ctrl_c(session.clone());
            let form = cmd_draft(service, session.token(), &args.image, &mut out).await;
            watcher.abort();
            let form = form?;
            if args.save {
                let product = save_form(&*open_catalog(&config.store)?, &form, None)?;
                report_saved(&product, "Added", &mut out)?;
            }
            Ok(())
        }
    }
}

/// Open the file-backed catalog with synchronous writes and load it.
fn open_catalog(store: &StoreConfig) -> anyhow::Result<CatalogHandle> {
    let catalog = CatalogHandle::write_through(persistence(store)?);
    catalog.load()?;
    Ok(catalog)
}

/// Same as [`open_catalog`] but writes go through the background writer.
fn open_background_catalog(store: &StoreConfig) -> anyhow::Result<CatalogHandle> {
    let catalog = CatalogHandle::background(persistence(store)?);
    catalog.load()?;
    Ok(catalog)
}

fn persistence(store: &StoreConfig) -> anyhow::Result<ProductPersistence> {
    let kv = FileKeyValueStore::open(&store.data_dir)
        .with_context(|| format!("opening data directory {}", store.data_dir.display()))?;
    Ok(ProductPersistence::new(Arc::new(kv)))
}

fn cancel_on_ctrl_c(session: Arc<DraftSession>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; cancelling outstanding drafting requests");
            session.cancel();
        }
    })
}

async fn cmd_serve(config: MartConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut server = config.server;
    if let Some(port) = args.port {
        server.bind_addr.set_port(port);
    }
    if let Some(dir) = args.static_dir {
        server.static_dir = dir;
    }
    info!(static_dir = %server.static_dir.display(), "starting storefront");
    MartServer::new(server).serve().await?;
    Ok(())
}

fn cmd_list(catalog: &dyn Catalog, args: &ListArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let products = catalog.products();
    match (args.format, args.admin) {
        (OutputFormat::Json, _) => writeln!(out, "{}", serde_json::to_string_pretty(&products)?)?,
        (OutputFormat::Text, true) => write!(out, "{}", render::admin_view(&products))?,
        (OutputFormat::Text, false) => write!(out, "{}", render::catalog_view(&products))?,
    }
    Ok(())
}

fn cmd_show(catalog: &dyn Catalog, args: &ShowArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let id = ProductId::from(args.id.as_str());
    let Some(product) = catalog.get(&id) else {
        bail!("no product with id {id}");
    };
    match args.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&product)?)?,
        OutputFormat::Text => write!(out, "{}", render::detail_view(&product))?,
    }
    Ok(())
}

fn cmd_add(catalog: &dyn Catalog, args: AddArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let form = ProductForm {
        name: args.name,
        price: args.price,
        description: args.description,
        image: resolve_image(&args.image)?,
    };
    let product = save_form(catalog, &form, None)?;
    report_saved(&product, "Added", out)
}

fn cmd_update(catalog: &dyn Catalog, args: UpdateArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let id = ProductId::from(args.id);
    let Some(existing) = catalog.get(&id) else {
        bail!("no product with id {id}");
    };

    let mut form = ProductForm::from_product(&existing);
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(image) = args.image {
        form.image = resolve_image(&image)?;
    }

    let product = save_form(catalog, &form, Some(&id))?;
    report_saved(&product, "Updated", out)
}

fn cmd_delete(
    catalog: &dyn Catalog,
    args: &DeleteArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let id = ProductId::from(args.id.as_str());
    let Some(product) = catalog.get(&id) else {
        bail!("no product with id {id}");
    };
    if !args.yes && !confirm(&format!("Delete \"{}\"?", product.name), input, out)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    if catalog.delete(&id)?.is_some() {
        writeln!(out, "{} Deleted {}", "✓".green().bold(), product.name.bold())?;
    }
    Ok(())
}

async fn cmd_import(catalog: &CatalogHandle, file: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let drafts: Vec<ProductDraft> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of products", file.display()))?;

    // Every record must pass form validation before anything is added.
    let drafts = drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            ProductForm::from_draft(draft)
                .validate()
                .with_context(|| format!("record {} of {}", index + 1, file.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let count = drafts.len();
    // Adding prepends, so insert from the back to keep the file's order.
    for draft in drafts.into_iter().rev() {
        catalog.add(draft)?;
    }
    if let Some(status) = catalog.flush().await? {
        if !status.saved {
            bail!("imported {count} product(s) but they could not be saved");
        }
    }
    writeln!(out, "{} Imported {} product(s)", "✓".green().bold(), count)?;
    Ok(())
}

fn cmd_export(catalog: &dyn Catalog, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&catalog.products())?)?;
    Ok(())
}

async fn cmd_suggest(
    service: Arc<dyn DraftingService>,
    token: CancelToken,
    what: SuggestCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match what {
        SuggestCommand::Name { image } => {
            let image = ImageData::parse(&resolve_image(&image)?)?;
            let name = token.guard(service.suggest_name(&image)).await?;
            writeln!(out, "{name}")?;
        }
        SuggestCommand::Description { image, name } => {
            let image = ImageData::parse(&resolve_image(&image)?)?;
            let description = token
                .guard(service.suggest_description(&image, &name))
                .await?;
            writeln!(out, "{description}")?;
        }
        SuggestCommand::Price { name, description } => {
            let suggestion = token
                .guard(service.suggest_price(&name, &description))
                .await?;
            write_price(&suggestion, out)?;
        }
    }
    Ok(())
}

/// Fill a fresh form from `image` and print it.
async fn cmd_draft(
    service: Arc<dyn DraftingService>,
    token: CancelToken,
    image: &str,
    out: &mut dyn Write,
) -> anyhow::Result<ProductForm> {
    let mut form = ProductForm {
        image: resolve_image(image)?,
        ..ProductForm::default()
    };
    let assistant = FormAssistant::new(service, token);
    let suggestion = assistant.fill_all(&mut form).await?;

    writeln!(out, "  Name: {}", form.name.bold())?;
    writeln!(out, "  Description: {}", form.description)?;
    write!(out, "  Price: ")?;
    write_price(&suggestion, out)?;
    Ok(form)
}

fn write_price(suggestion: &PriceSuggestion, out: &mut dyn Write) -> anyhow::Result<()> {
    match suggestion {
        PriceSuggestion::Parsed { value } => {
            writeln!(out, "{}", render::price_tag(*value as f64).green())?
        }
        PriceSuggestion::Unparseable { raw } => writeln!(
            out,
            "{} {}",
            "no price found in response:".yellow(),
            raw.trim()
        )?,
    }
    Ok(())
}

/// Validate the form and either add a new product or replace `editing`.
fn save_form(
    catalog: &dyn Catalog,
    form: &ProductForm,
    editing: Option<&ProductId>,
) -> anyhow::Result<Product> {
    match form.submit(editing)? {
        FormSubmission::Create(draft) => Ok(catalog.add(draft)?),
        FormSubmission::Update(product) => {
            if !catalog.update(product.clone())? {
                bail!("no product with id {}", product.id);
            }
            Ok(product)
        }
    }
}

fn report_saved(product: &Product, verb: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} {} {} ({})",
        "✓".green().bold(),
        verb,
        product.name.bold(),
        product.id.as_str().yellow()
    )?;
    Ok(())
}

/// Accept either a data URI or a path to an image file.
fn resolve_image(arg: &str) -> anyhow::Result<String> {
    if arg.starts_with("data:") {
        ImageData::parse(arg)?;
        return Ok(arg.to_string());
    }
    let data = ImageData::from_file(Path::new(arg))
        .with_context(|| format!("reading image {arg}"))?;
    Ok(data.to_data_uri())
}

fn confirm(prompt: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> anyhow::Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
